use crate::error::SerdeErr;

macro_rules! read_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> Result<$ty, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(self.take(std::mem::size_of::<$ty>())?);
                Ok(<$ty>::from_le_bytes(bytes))
            }
        )*
    };
}

/// Consumes a byte payload in FIFO order, mirroring the writes of a Bundle
pub struct BundleReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> BundleReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    read_le! {
        read_u8: u8,
        read_u16: u16,
        read_u32: u32,
        read_u64: u64,
        read_i8: i8,
        read_i16: i16,
        read_i32: i32,
        read_i64: i64,
        read_f32: f32,
        read_f64: f64,
    }

    pub fn read_bool(&mut self) -> Result<bool, SerdeErr> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_blob(&mut self) -> Result<Vec<u8>, SerdeErr> {
        let length = self.read_count()?;
        Ok(self.take(length)?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String, SerdeErr> {
        String::from_utf8(self.read_blob()?).map_err(|_| SerdeErr::InvalidUtf8)
    }

    pub fn read_count(&mut self) -> Result<usize, SerdeErr> {
        let count = self.read_u32()?;
        usize::try_from(count).map_err(|_| SerdeErr::LengthOverflow {
            length: usize::MAX,
        })
    }

    /// Number of bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SerdeErr::UnexpectedEnd { needed, remaining });
        }
        let slice = &self.buffer[self.cursor..self.cursor + needed];
        self.cursor += needed;
        Ok(slice)
    }
}
