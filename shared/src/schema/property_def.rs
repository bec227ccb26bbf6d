use crate::{types::PropertyId, value::DataType, value::Value};

/// Definition of one replicated property of an entity class
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub id: PropertyId,
    pub data_type: DataType,
    pub default: Value,
    /// Name of the hook run when the server updates this property
    pub hook: Option<String>,
}

impl PropertyDef {
    /// Creates a def whose default is the zero value of `data_type`
    pub fn new(name: impl Into<String>, id: PropertyId, data_type: DataType) -> Self {
        let default = data_type.default_value();
        Self {
            name: name.into(),
            id,
            data_type,
            default,
            hook: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_hook(mut self, hook: impl Into<String>) -> Self {
        self.hook = Some(hook.into());
        self
    }
}
