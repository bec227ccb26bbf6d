use crate::{bundle::Bundle, bundle_reader::BundleReader, error::SerdeErr};

/// A type that can be appended to a Bundle and read back in the same layout
pub trait Serde: Sized {
    fn ser(&self, bundle: &mut Bundle) -> Result<(), SerdeErr>;

    fn de(reader: &mut BundleReader) -> Result<Self, SerdeErr>;
}

macro_rules! impl_serde_primitive {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Serde for $ty {
                fn ser(&self, bundle: &mut Bundle) -> Result<(), SerdeErr> {
                    bundle.$write(*self);
                    Ok(())
                }

                fn de(reader: &mut BundleReader) -> Result<Self, SerdeErr> {
                    reader.$read()
                }
            }
        )*
    };
}

impl_serde_primitive! {
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    i8 => write_i8, read_i8;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    bool => write_bool, read_bool;
}

impl Serde for String {
    fn ser(&self, bundle: &mut Bundle) -> Result<(), SerdeErr> {
        bundle.write_string(self)
    }

    fn de(reader: &mut BundleReader) -> Result<Self, SerdeErr> {
        reader.read_string()
    }
}

// Vectors

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, bundle: &mut Bundle) -> Result<(), SerdeErr> {
        bundle.write_count(self.len())?;
        for item in self {
            item.ser(bundle)?;
        }
        Ok(())
    }

    fn de(reader: &mut BundleReader) -> Result<Self, SerdeErr> {
        let count = reader.read_count()?;
        // capacity is bounded by the payload, never by the declared count
        let mut output = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

// Fixed arrays carry no count, their length is part of the type

impl<T: Serde + Default + Copy, const N: usize> Serde for [T; N] {
    fn ser(&self, bundle: &mut Bundle) -> Result<(), SerdeErr> {
        for item in self {
            item.ser(bundle)?;
        }
        Ok(())
    }

    fn de(reader: &mut BundleReader) -> Result<Self, SerdeErr> {
        let mut output = [T::default(); N];
        for slot in output.iter_mut() {
            *slot = T::de(reader)?;
        }
        Ok(output)
    }
}
