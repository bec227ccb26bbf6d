use std::collections::HashMap;

use crate::{
    schema::{
        error::SchemaError,
        method_def::{MethodDef, MethodTable},
        property_def::PropertyDef,
    },
    types::{CallContext, PropertyId},
};

/// The frozen definition of one entity class: its properties and the
/// methods it exposes on the base and the cell.
///
/// Property names and ids are interned to slot indices here, once, so an
/// instance only has to store one value per slot.
#[derive(Clone, Debug)]
pub struct ClassSchema {
    class_type: String,
    properties: Vec<PropertyDef>,
    slot_by_name: HashMap<String, usize>,
    slot_by_id: HashMap<PropertyId, usize>,
    base_methods: MethodTable,
    cell_methods: MethodTable,
}

impl ClassSchema {
    pub fn new(
        class_type: impl Into<String>,
        properties: Vec<PropertyDef>,
        base_methods: Vec<MethodDef>,
        cell_methods: Vec<MethodDef>,
    ) -> Result<Self, SchemaError> {
        let class_type = class_type.into();

        let mut slot_by_name = HashMap::with_capacity(properties.len());
        let mut slot_by_id = HashMap::with_capacity(properties.len());
        for (slot, def) in properties.iter().enumerate() {
            if slot_by_id.insert(def.id, slot).is_some() {
                return Err(SchemaError::SchemaConflict {
                    class_type,
                    table: "property id",
                    key: def.id.to_string(),
                });
            }
            if slot_by_name.insert(def.name.clone(), slot).is_some() {
                return Err(SchemaError::SchemaConflict {
                    class_type,
                    table: "property name",
                    key: def.name.clone(),
                });
            }
            if def.data_type.has_empty_fixed_dict() {
                return Err(SchemaError::EmptyFixedDict {
                    class_type,
                    owner: format!("property '{}'", def.name),
                });
            }
            if let Err(source) = def.data_type.validate(&def.default) {
                return Err(SchemaError::InvalidDefault {
                    class_type,
                    property: def.name.clone(),
                    source,
                });
            }
        }

        let base_methods = MethodTable::new(&class_type, CallContext::Base, base_methods)?;
        let cell_methods = MethodTable::new(&class_type, CallContext::Cell, cell_methods)?;

        Ok(Self {
            class_type,
            properties,
            slot_by_name,
            slot_by_id,
            base_methods,
            cell_methods,
        })
    }

    pub fn class_type(&self) -> &str {
        &self.class_type
    }

    /// Property defs in slot order
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slot_by_name.get(name).copied()
    }

    pub fn slot_by_id(&self, id: PropertyId) -> Option<usize> {
        self.slot_by_id.get(&id).copied()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.slot(name).map(|slot| &self.properties[slot])
    }

    pub fn property_by_id(&self, id: PropertyId) -> Option<&PropertyDef> {
        self.slot_by_id(id).map(|slot| &self.properties[slot])
    }

    pub fn methods(&self, context: CallContext) -> &MethodTable {
        match context {
            CallContext::Base => &self.base_methods,
            CallContext::Cell => &self.cell_methods,
        }
    }

    pub fn method(&self, context: CallContext, name: &str) -> Option<&MethodDef> {
        self.methods(context).get(name)
    }
}
