use std::collections::HashMap;

use crate::{
    schema::error::SchemaError,
    types::{CallContext, MethodId},
    value::DataType,
};

/// Definition of one remotely callable method
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub id: MethodId,
    /// Argument types, in the order they are encoded
    pub args: Vec<DataType>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, id: MethodId, args: Vec<DataType>) -> Self {
        Self {
            name: name.into(),
            id,
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// The methods one class exposes in one execution context, indexed by name and id
#[derive(Clone, Debug, Default)]
pub struct MethodTable {
    defs: Vec<MethodDef>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<MethodId, usize>,
}

impl MethodTable {
    pub(crate) fn new(
        class_type: &str,
        context: CallContext,
        defs: Vec<MethodDef>,
    ) -> Result<Self, SchemaError> {
        let mut by_name = HashMap::with_capacity(defs.len());
        let mut by_id = HashMap::with_capacity(defs.len());

        for (index, def) in defs.iter().enumerate() {
            if by_id.insert(def.id, index).is_some() {
                return Err(SchemaError::SchemaConflict {
                    class_type: class_type.to_string(),
                    table: method_table_name(context, true),
                    key: def.id.to_string(),
                });
            }
            if let Some(position) = def.args.iter().position(DataType::has_empty_fixed_dict) {
                return Err(SchemaError::EmptyFixedDict {
                    class_type: class_type.to_string(),
                    owner: format!("argument {} of {} method '{}'", position, context, def.name),
                });
            }
            if by_name.insert(def.name.clone(), index).is_some() {
                return Err(SchemaError::SchemaConflict {
                    class_type: class_type.to_string(),
                    table: method_table_name(context, false),
                    key: def.name.clone(),
                });
            }
        }

        Ok(Self {
            defs,
            by_name,
            by_id,
        })
    }

    pub fn get(&self, name: &str) -> Option<&MethodDef> {
        self.by_name.get(name).map(|index| &self.defs[*index])
    }

    pub fn get_by_id(&self, id: MethodId) -> Option<&MethodDef> {
        self.by_id.get(&id).map(|index| &self.defs[*index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MethodDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn method_table_name(context: CallContext, id: bool) -> &'static str {
    match (context, id) {
        (CallContext::Base, true) => "base method id",
        (CallContext::Base, false) => "base method name",
        (CallContext::Cell, true) => "cell method id",
        (CallContext::Cell, false) => "cell method name",
    }
}
