use std::collections::HashMap;

use log::{debug, warn};

use kbe_shared::{DataType, Value};

use crate::{
    entity::Entity,
    events::{EventArg, EventBus, SET_DIRECTION, SET_POSITION},
    session::Session,
};

/// Session state a hook may read or update besides its own entity
pub struct HookContext<'a> {
    pub events: &'a mut EventBus,
    pub session: &'a mut Session,
}

/// Runs after the server updated `property` on `entity`; `old` is the value it replaced
pub type PropertyHook = fn(entity: &mut Entity, ctx: &mut HookContext<'_>, property: &str, old: &Value);

/// Checks whether a hook can run on a property of the given type
pub type HookTypeCheck = fn(&DataType) -> bool;

#[derive(Clone, Copy)]
struct HookEntry {
    hook: PropertyHook,
    accepts: Option<HookTypeCheck>,
}

/// Data-driven table of property hooks, looked up by the hook name a
/// PropertyDef declares.
///
/// Hooks registered for a specific class take precedence over shared ones.
/// `new()` starts with the built-in spatial hooks registered as shared,
/// each restricted to the property types it can mirror.
pub struct HookRegistry {
    shared: HashMap<String, HookEntry>,
    per_class: HashMap<String, HashMap<String, HookEntry>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_shared_typed("set_position", set_position, is_vector3);
        registry.register_shared_typed("set_direction", set_direction, is_vector3);
        registry.register_shared_typed("set_velocity", set_velocity, is_float);
        registry.register_shared_typed("set_is_on_ground", set_is_on_ground, is_flag);
        registry
    }

    /// A registry without the built-in hooks
    pub fn empty() -> Self {
        Self {
            shared: HashMap::new(),
            per_class: HashMap::new(),
        }
    }

    /// Makes a hook available to every class
    pub fn register_shared(&mut self, name: &str, hook: PropertyHook) -> &mut Self {
        self.shared
            .insert(name.to_string(), HookEntry { hook, accepts: None });
        self
    }

    /// Like `register_shared`, but properties using the hook must pass `accepts`
    pub fn register_shared_typed(
        &mut self,
        name: &str,
        hook: PropertyHook,
        accepts: HookTypeCheck,
    ) -> &mut Self {
        self.shared.insert(
            name.to_string(),
            HookEntry {
                hook,
                accepts: Some(accepts),
            },
        );
        self
    }

    /// Makes a hook available to one class only, shadowing a shared hook of the same name
    pub fn register(&mut self, class_type: &str, name: &str, hook: PropertyHook) -> &mut Self {
        self.per_class
            .entry(class_type.to_string())
            .or_default()
            .insert(name.to_string(), HookEntry { hook, accepts: None });
        self
    }

    pub fn get(&self, class_type: &str, name: &str) -> Option<PropertyHook> {
        self.entry(class_type, name).map(|entry| entry.hook)
    }

    /// Whether the hook resolved for `class_type` can run on a property of
    /// `data_type`. None if the hook is not registered.
    pub fn accepts(&self, class_type: &str, name: &str, data_type: &DataType) -> Option<bool> {
        self.entry(class_type, name)
            .map(|entry| entry.accepts.map_or(true, |accepts| accepts(data_type)))
    }

    fn entry(&self, class_type: &str, name: &str) -> Option<HookEntry> {
        self.per_class
            .get(class_type)
            .and_then(|hooks| hooks.get(name))
            .or_else(|| self.shared.get(name))
            .copied()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Built-in hooks

fn is_vector3(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Vector3)
}

fn is_float(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Float | DataType::Double)
}

fn is_flag(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Bool
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn set_position(entity: &mut Entity, ctx: &mut HookContext<'_>, property: &str, old: &Value) {
    let Some(position) = entity.get_property(property).ok().and_then(Value::as_vector3) else {
        warn!("{}::set_position: '{}' is not a VECTOR3", entity.class_type(), property);
        return;
    };
    entity.set_position(position);
    debug!("{}::set_position: {:?} => {:?}", entity.class_type(), old, position);

    if entity.is_locally_controlled() {
        ctx.session.set_server_position(position);
    }

    ctx.events
        .fire(SET_POSITION, &[EventArg::Entity(entity), EventArg::Value(old)]);
}

fn set_direction(entity: &mut Entity, ctx: &mut HookContext<'_>, property: &str, old: &Value) {
    let Some(radians) = entity.get_property(property).ok().and_then(Value::as_vector3) else {
        warn!("{}::set_direction: '{}' is not a VECTOR3", entity.class_type(), property);
        return;
    };
    let degrees = radians.map(f32::to_degrees);
    entity.set_direction(degrees);
    debug!("{}::set_direction: {:?} => {:?}", entity.class_type(), old, degrees);

    ctx.events
        .fire(SET_DIRECTION, &[EventArg::Entity(entity), EventArg::Value(old)]);
}

fn set_velocity(entity: &mut Entity, _: &mut HookContext<'_>, property: &str, _: &Value) {
    if let Some(velocity) = entity.get_property(property).ok().and_then(Value::as_f32) {
        entity.set_velocity(velocity);
    }
}

fn set_is_on_ground(entity: &mut Entity, _: &mut HookContext<'_>, property: &str, _: &Value) {
    if let Some(grounded) = entity.get_property(property).ok().and_then(Value::as_flag) {
        entity.set_on_ground(grounded);
    }
}
