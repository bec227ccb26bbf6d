use crate::error::SerdeErr;

macro_rules! write_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self, value: $ty) {
                self.buffer.extend_from_slice(&value.to_le_bytes());
            }
        )*
    };
}

/// An append-only byte buffer holding one outgoing message payload.
///
/// Writes are never reordered or padded: the receiving side decodes fields
/// in the exact order they were appended here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bundle {
    buffer: Vec<u8>,
}

impl Bundle {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    write_le! {
        write_u8: u8,
        write_u16: u16,
        write_u32: u32,
        write_u64: u64,
        write_i8: i8,
        write_i16: i16,
        write_i32: i32,
        write_i64: i64,
        write_f32: f32,
        write_f64: f64,
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes a u32 length prefix followed by the raw bytes
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        let length = u32::try_from(bytes.len())
            .map_err(|_| SerdeErr::LengthOverflow { length: bytes.len() })?;
        self.write_u32(length);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a string as a length-prefixed UTF-8 blob
    pub fn write_string(&mut self, value: &str) -> Result<(), SerdeErr> {
        self.write_blob(value.as_bytes())
    }

    /// Writes a u32 element count, used ahead of array elements
    pub fn write_count(&mut self, count: usize) -> Result<(), SerdeErr> {
        let count = u32::try_from(count).map_err(|_| SerdeErr::LengthOverflow { length: count })?;
        self.write_u32(count);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
