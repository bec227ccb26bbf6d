use std::{collections::HashMap, sync::Arc};

use log::info;

use crate::schema::{class_schema::ClassSchema, method_def::MethodDef, property_def::PropertyDef};

pub mod class_schema;
pub mod error;
pub mod method_def;
pub mod property_def;

pub use error::SchemaError;

/// Process-wide table of class schemas, populated once from the
/// server-provided entity definitions and then locked.
///
/// A locked registry is read-only: every lookup hands out a shared
/// `Arc<ClassSchema>` that never changes afterward.
#[derive(Default)]
pub struct SchemaRegistry {
    classes: HashMap<String, Arc<ClassSchema>>,
    locked: bool,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the property and method tables of one class.
    ///
    /// Fails without touching the registry if the class is already known,
    /// if the registry is locked, or if any of its tables has a duplicate key.
    pub fn register_class(
        &mut self,
        class_type: &str,
        properties: Vec<PropertyDef>,
        base_methods: Vec<MethodDef>,
        cell_methods: Vec<MethodDef>,
    ) -> Result<&mut Self, SchemaError> {
        self.try_check_lock()?;
        if self.classes.contains_key(class_type) {
            return Err(SchemaError::DuplicateClass {
                class_type: class_type.to_string(),
            });
        }

        let schema = ClassSchema::new(class_type, properties, base_methods, cell_methods)?;
        self.classes.insert(class_type.to_string(), Arc::new(schema));
        Ok(self)
    }

    pub fn get_schema(&self, class_type: &str) -> Result<Arc<ClassSchema>, SchemaError> {
        self.classes
            .get(class_type)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownClass {
                class_type: class_type.to_string(),
            })
    }

    pub fn contains(&self, class_type: &str) -> bool {
        self.classes.contains_key(class_type)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassSchema> {
        self.classes.values().map(|schema| schema.as_ref())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Freezes the registry. Locking twice is an error.
    pub fn lock(&mut self) -> Result<(), SchemaError> {
        self.try_check_lock()?;
        self.locked = true;
        info!("Schema registry locked with {} classes", self.classes.len());
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns Err if the registry is locked
    pub fn try_check_lock(&self) -> Result<(), SchemaError> {
        if self.locked {
            Err(SchemaError::RegistryLocked)
        } else {
            Ok(())
        }
    }
}
