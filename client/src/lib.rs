//! # KBE Client
//! Client-side mirror of server-authoritative kbengine entities: a per-entity
//! property cache with change hooks, an in-process event bus, and remote calls
//! toward the entity's base and cell through its mailboxes.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use kbe_shared::{
    Bundle, BundleReader, CallContext, ClassSchema, DataType, EntityId, MethodDef, MethodId,
    PropertyDef, PropertyId, SchemaError, SchemaRegistry, Value, ValueError,
};

mod client;
mod client_config;
mod entity;
mod error;
mod events;
mod hooks;
mod mailbox;
mod session;

pub use client::Client;
pub use client_config::ClientConfig;
pub use entity::Entity;
pub use error::{ClientError, EntityError, MailboxError};
pub use events::{
    EventArg, EventBus, HandlerId, ON_ENTER_WORLD, ON_LEAVE_WORLD, SET_DIRECTION, SET_POSITION,
};
pub use hooks::{HookContext, HookRegistry, HookTypeCheck, PropertyHook};
pub use mailbox::{Mailbox, Outbox, PostedMail, ResponseHandler};
pub use session::Session;
