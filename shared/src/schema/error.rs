use thiserror::Error;

use crate::value::ValueError;

/// Errors that can occur while registering or looking up class schemas
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No schema has been registered for this class
    #[error("Class '{class_type}' is not registered. Must call `register_class()` before constructing its entities")]
    UnknownClass { class_type: String },

    /// A schema for this class was already registered
    #[error("Class '{class_type}' is already registered and cannot be registered again")]
    DuplicateClass { class_type: String },

    /// Two defs inside one table of a class share a key
    #[error("Class '{class_type}' declares {table} '{key}' more than once")]
    SchemaConflict {
        class_type: String,
        table: &'static str,
        key: String,
    },

    /// A property's declared default does not match its declared type
    #[error("Default value of property '{property}' on class '{class_type}' is invalid: {source}")]
    InvalidDefault {
        class_type: String,
        property: String,
        source: ValueError,
    },

    /// A property or method argument declares a FIXED_DICT without fields
    #[error("Class '{class_type}' declares {owner} with a FIXED_DICT that has no fields")]
    EmptyFixedDict { class_type: String, owner: String },

    /// The registry was frozen and no further classes may be added
    #[error("Schema registry is already locked and cannot be modified. `lock()` has been called and no further changes are allowed")]
    RegistryLocked,

    /// The registry must be frozen before entities can be built from it
    #[error("Schema registry must be locked before it is used to construct entities")]
    RegistryNotLocked,
}
