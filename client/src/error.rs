use thiserror::Error;

use kbe_shared::{CallContext, EntityId, SchemaError, ValueError};

/// Errors that can occur when a Mailbox is driven out of order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// `new_mail()` was called while a Bundle was still open
    #[error("Mailbox {context} of entity {entity_id} already has an open Bundle. Call `post_mail()` or `discard_mail()` first")]
    AlreadyOpen {
        entity_id: EntityId,
        context: CallContext,
    },

    /// The open Bundle was requested or posted without calling `new_mail()`
    #[error("Mailbox {context} of entity {entity_id} has no open Bundle. Call `new_mail()` first")]
    NotOpen {
        entity_id: EntityId,
        context: CallContext,
    },
}

/// Errors that can occur during entity operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The entity's class has no registered schema
    #[error("Class '{class_type}' is not registered")]
    UnknownClass { class_type: String },

    /// The class declares no property with this name or id
    #[error("Class '{class_type}' has no property '{property}'")]
    UnknownProperty { class_type: String, property: String },

    /// The class declares no method with this name in the given context
    #[error("Class '{class_type}' has no {context} method '{method}'")]
    UnknownMethod {
        class_type: String,
        context: CallContext,
        method: String,
    },

    /// The number of arguments does not match the method's declared arity
    #[error("Method '{method}' takes {expected} arguments but {found} were given")]
    ArgumentCountMismatch {
        method: String,
        expected: usize,
        found: usize,
    },

    /// One argument could not be encoded as its declared type; nothing was sent
    #[error("Argument {index} of method '{method}' could not be encoded: {source}")]
    ArgumentEncodingError {
        method: String,
        index: usize,
        source: ValueError,
    },

    /// The mailbox was used out of protocol order
    #[error("Mailbox misuse: {0}")]
    MailboxMisuse(#[from] MailboxError),

    /// The server did not grant this client a mailbox for the context
    #[error("Entity {entity_id} has no {context} mailbox")]
    NoMailbox {
        entity_id: EntityId,
        context: CallContext,
    },

    /// A property def names a hook that is not registered
    #[error("Hook '{hook}' used by class '{class_type}' is not registered")]
    UnknownHook { class_type: String, hook: String },

    /// A property def attaches a hook that cannot run on the property's type
    #[error("Hook '{hook}' cannot be used on property '{property}' of class '{class_type}' with type {data_type}")]
    HookTypeMismatch {
        class_type: String,
        property: String,
        hook: String,
        data_type: &'static str,
    },

    /// An inbound property payload could not be decoded
    #[error("Update of property '{property}' could not be decoded: {source}")]
    PropertyDecode { property: String, source: ValueError },

    /// A locally set value does not match the property's declared type
    #[error("Value for property '{property}' does not match its type: {source}")]
    TypeMismatch { property: String, source: ValueError },
}

/// Errors that can occur while the Client applies transport notifications
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No entity with this id is known to the session
    #[error("Entity {entity_id} does not exist in this session")]
    UnknownEntity { entity_id: EntityId },

    /// An entity with this id already exists in the session
    #[error("Entity {entity_id} already exists in this session")]
    DuplicateEntity { entity_id: EntityId },

    /// The locally controlled entity can only be chosen once per session
    #[error("Player entity is already set to {current}")]
    PlayerAlreadySet { current: EntityId },

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}
