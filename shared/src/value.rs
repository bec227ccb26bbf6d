use std::collections::BTreeMap;

use thiserror::Error;

use kbe_serde::{Bundle, BundleReader, Serde, SerdeErr};

/// Errors that can occur while encoding or decoding a typed Value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value's variant does not match the declared type
    #[error("Expected a value of type {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The value has the right variant but does not fit the declared width
    #[error("Value {value} does not fit in {expected}")]
    OutOfRange { expected: &'static str, value: i128 },

    /// A FIXED_DICT value is missing one of the declared fields
    #[error("FIXED_DICT value is missing field '{field}'")]
    MissingField { field: String },

    /// A FIXED_DICT value carries a field that is not declared
    #[error("FIXED_DICT value has undeclared field '{field}'")]
    UnexpectedField { field: String },

    /// The underlying Bundle could not be read or written
    #[error("Bundle error: {0}")]
    Serde(#[from] SerdeErr),
}

/// Type tag of a property or method argument, as declared by the server schema
#[derive(Clone, Debug, PartialEq)]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Bool,
    String,
    Blob,
    Vector2,
    Vector3,
    Vector4,
    Array(Box<DataType>),
    /// Named fields, encoded in declaration order
    FixedDict(Vec<(String, DataType)>),
}

/// A dynamically typed property or argument value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
    Blob(Vec<u8>),
    Vector2([f32; 2]),
    Vector3([f32; 3]),
    Vector4([f32; 4]),
    Array(Vec<Value>),
    FixedDict(BTreeMap<String, Value>),
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int8 => "INT8",
            DataType::Int16 => "INT16",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::UInt8 => "UINT8",
            DataType::UInt16 => "UINT16",
            DataType::UInt32 => "UINT32",
            DataType::UInt64 => "UINT64",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Bool => "BOOL",
            DataType::String => "STRING",
            DataType::Blob => "BLOB",
            DataType::Vector2 => "VECTOR2",
            DataType::Vector3 => "VECTOR3",
            DataType::Vector4 => "VECTOR4",
            DataType::Array(_) => "ARRAY",
            DataType::FixedDict(_) => "FIXED_DICT",
        }
    }

    /// The zero value of this type, used when a property def declares no default
    pub fn default_value(&self) -> Value {
        match self {
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => Value::Int(0),
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
                Value::UInt(0)
            }
            DataType::Float => Value::Float(0.0),
            DataType::Double => Value::Double(0.0),
            DataType::Bool => Value::Bool(false),
            DataType::String => Value::String(String::new()),
            DataType::Blob => Value::Blob(Vec::new()),
            DataType::Vector2 => Value::Vector2([0.0; 2]),
            DataType::Vector3 => Value::Vector3([0.0; 3]),
            DataType::Vector4 => Value::Vector4([0.0; 4]),
            DataType::Array(_) => Value::Array(Vec::new()),
            DataType::FixedDict(fields) => Value::FixedDict(
                fields
                    .iter()
                    .map(|(name, field_type)| (name.clone(), field_type.default_value()))
                    .collect(),
            ),
        }
    }

    /// Appends `value` to the Bundle using this type's layout.
    ///
    /// On error the Bundle may hold a partial write; callers discard it.
    pub fn encode(&self, value: &Value, bundle: &mut Bundle) -> Result<(), ValueError> {
        match (self, value) {
            (DataType::Int8, Value::Int(v)) => bundle.write_i8(self.narrow(*v)?),
            (DataType::Int16, Value::Int(v)) => bundle.write_i16(self.narrow(*v)?),
            (DataType::Int32, Value::Int(v)) => bundle.write_i32(self.narrow(*v)?),
            (DataType::Int64, Value::Int(v)) => bundle.write_i64(*v),
            (DataType::UInt8, Value::UInt(v)) => bundle.write_u8(self.narrow(*v)?),
            (DataType::UInt16, Value::UInt(v)) => bundle.write_u16(self.narrow(*v)?),
            (DataType::UInt32, Value::UInt(v)) => bundle.write_u32(self.narrow(*v)?),
            (DataType::UInt64, Value::UInt(v)) => bundle.write_u64(*v),
            (DataType::Float, Value::Float(v)) => bundle.write_f32(*v),
            (DataType::Double, Value::Double(v)) => bundle.write_f64(*v),
            (DataType::Bool, Value::Bool(v)) => bundle.write_bool(*v),
            (DataType::String, Value::String(v)) => bundle.write_string(v)?,
            (DataType::Blob, Value::Blob(v)) => bundle.write_blob(v)?,
            (DataType::Vector2, Value::Vector2(v)) => v.ser(bundle)?,
            (DataType::Vector3, Value::Vector3(v)) => v.ser(bundle)?,
            (DataType::Vector4, Value::Vector4(v)) => v.ser(bundle)?,
            (DataType::Array(element_type), Value::Array(items)) => {
                bundle.write_count(items.len())?;
                for item in items {
                    element_type.encode(item, bundle)?;
                }
            }
            (DataType::FixedDict(fields), Value::FixedDict(map)) => {
                if let Some(extra) = map
                    .keys()
                    .find(|key| !fields.iter().any(|(name, _)| name == *key))
                {
                    return Err(ValueError::UnexpectedField {
                        field: extra.clone(),
                    });
                }
                for (name, field_type) in fields {
                    let field = map.get(name).ok_or_else(|| ValueError::MissingField {
                        field: name.clone(),
                    })?;
                    field_type.encode(field, bundle)?;
                }
            }
            (_, _) => {
                return Err(ValueError::TypeMismatch {
                    expected: self.name(),
                    found: value.kind(),
                })
            }
        }
        Ok(())
    }

    /// Checks that `value` could be encoded as this type, without keeping any bytes
    pub fn validate(&self, value: &Value) -> Result<(), ValueError> {
        self.encode(value, &mut Bundle::new())
    }

    /// Reads one value of this type from the reader
    pub fn decode(&self, reader: &mut BundleReader) -> Result<Value, ValueError> {
        let value = match self {
            DataType::Int8 => Value::Int(reader.read_i8()?.into()),
            DataType::Int16 => Value::Int(reader.read_i16()?.into()),
            DataType::Int32 => Value::Int(reader.read_i32()?.into()),
            DataType::Int64 => Value::Int(reader.read_i64()?),
            DataType::UInt8 => Value::UInt(reader.read_u8()?.into()),
            DataType::UInt16 => Value::UInt(reader.read_u16()?.into()),
            DataType::UInt32 => Value::UInt(reader.read_u32()?.into()),
            DataType::UInt64 => Value::UInt(reader.read_u64()?),
            DataType::Float => Value::Float(reader.read_f32()?),
            DataType::Double => Value::Double(reader.read_f64()?),
            DataType::Bool => Value::Bool(reader.read_bool()?),
            DataType::String => Value::String(reader.read_string()?),
            DataType::Blob => Value::Blob(reader.read_blob()?),
            DataType::Vector2 => Value::Vector2(<[f32; 2]>::de(reader)?),
            DataType::Vector3 => Value::Vector3(<[f32; 3]>::de(reader)?),
            DataType::Vector4 => Value::Vector4(<[f32; 4]>::de(reader)?),
            DataType::Array(element_type) => {
                let count = reader.read_count()?;
                // every element takes at least one byte, so the count is bounded by the payload
                let needed = count.saturating_mul(element_type.min_encoded_len().max(1));
                if needed > reader.remaining() {
                    return Err(SerdeErr::UnexpectedEnd {
                        needed,
                        remaining: reader.remaining(),
                    }
                    .into());
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(element_type.decode(reader)?);
                }
                Value::Array(items)
            }
            DataType::FixedDict(fields) => {
                let mut map = BTreeMap::new();
                for (name, field_type) in fields {
                    map.insert(name.clone(), field_type.decode(reader)?);
                }
                Value::FixedDict(map)
            }
        };
        Ok(value)
    }

    /// Smallest number of bytes any value of this type occupies on the wire
    pub fn min_encoded_len(&self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 | DataType::Bool => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Double => 8,
            DataType::String | DataType::Blob | DataType::Array(_) => 4,
            DataType::Vector2 => 8,
            DataType::Vector3 => 12,
            DataType::Vector4 => 16,
            DataType::FixedDict(fields) => fields
                .iter()
                .map(|(_, field_type)| field_type.min_encoded_len())
                .sum(),
        }
    }

    /// Whether this type is, or nests, a FIXED_DICT without fields.
    /// Such a type has no wire representation and cannot be declared.
    pub fn has_empty_fixed_dict(&self) -> bool {
        match self {
            DataType::Array(element_type) => element_type.has_empty_fixed_dict(),
            DataType::FixedDict(fields) => {
                fields.is_empty()
                    || fields
                        .iter()
                        .any(|(_, field_type)| field_type.has_empty_fixed_dict())
            }
            _ => false,
        }
    }

    fn narrow<S, T>(&self, value: S) -> Result<T, ValueError>
    where
        S: Copy + Into<i128>,
        T: TryFrom<S>,
    {
        T::try_from(value).map_err(|_| ValueError::OutOfRange {
            expected: self.name(),
            value: value.into(),
        })
    }
}

impl Value {
    /// Name of the value's variant, used in error reports
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::Blob(_) => "Blob",
            Value::Vector2(_) => "Vector2",
            Value::Vector3(_) => "Vector3",
            Value::Vector4(_) => "Vector4",
            Value::Array(_) => "Array",
            Value::FixedDict(_) => "FixedDict",
        }
    }

    pub fn as_vector3(&self) -> Option<[f32; 3]> {
        match self {
            Value::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view used for scalar spatial fields
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Double(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Truthiness of a flag stored either as BOOL or as an integer
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            Value::UInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_value_from! {
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    String => String,
    &str => String,
    [f32; 2] => Vector2,
    [f32; 3] => Vector3,
    [f32; 4] => Vector4,
}
