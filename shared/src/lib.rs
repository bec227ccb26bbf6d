//! # KBE Shared
//! Entity schema registry and typed values shared by the kbengine client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use kbe_serde::{Bundle, BundleReader, Serde, SerdeErr};

mod schema;
mod types;
mod value;

pub use schema::{
    class_schema::ClassSchema,
    error::SchemaError,
    method_def::{MethodDef, MethodTable},
    property_def::PropertyDef,
    SchemaRegistry,
};
pub use types::{CallContext, EntityId, MethodId, PropertyId};
pub use value::{DataType, Value, ValueError};
