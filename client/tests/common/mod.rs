#![allow(dead_code)]

use kbe_client::{
    Bundle, CallContext, Client, ClientConfig, DataType, HookRegistry, MethodDef, PropertyDef,
    SchemaRegistry, Value,
};

pub const POSITION: u16 = 1;
pub const DIRECTION: u16 = 2;
pub const NAME: u16 = 3;
pub const HP: u16 = 4;

/// `Avatar` with hooked spatial properties, `say`/`equip` on the base and `jump` on the cell
pub fn avatar_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry
        .register_class(
            "Avatar",
            vec![
                PropertyDef::new("position", POSITION, DataType::Vector3).with_hook("set_position"),
                PropertyDef::new("direction", DIRECTION, DataType::Vector3)
                    .with_hook("set_direction"),
                PropertyDef::new("name", NAME, DataType::String).with_default("nobody"),
                PropertyDef::new("hp", HP, DataType::Int32).with_default(100i32),
            ],
            vec![
                MethodDef::new("say", 10, vec![DataType::String]),
                MethodDef::new("equip", 11, vec![DataType::UInt8, DataType::String]),
            ],
            vec![MethodDef::new("jump", 20, vec![DataType::Float])],
        )
        .unwrap();
    registry
}

pub fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

pub fn client() -> Client {
    init_logging();
    let mut registry = avatar_registry();
    registry.lock().unwrap();
    Client::new(ClientConfig::default(), registry, HookRegistry::new()).unwrap()
}

pub fn client_with_avatar(entity_id: i32) -> Client {
    let mut client = client();
    client
        .on_entity_created(
            entity_id,
            "Avatar",
            &[CallContext::Base, CallContext::Cell],
            &[],
        )
        .unwrap();
    client
}

pub fn encode(data_type: &DataType, value: impl Into<Value>) -> Vec<u8> {
    let mut bundle = Bundle::new();
    data_type.encode(&value.into(), &mut bundle).unwrap();
    bundle.to_bytes()
}
