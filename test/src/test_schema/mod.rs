//! Schema shared by the integration tests

use kbe_shared::{DataType, MethodDef, PropertyDef, SchemaRegistry};

pub const AVATAR: &str = "Avatar";

pub const POSITION: u16 = 1;
pub const DIRECTION: u16 = 2;
pub const NAME: u16 = 3;
pub const HP: u16 = 4;

pub const SAY: u16 = 10;
pub const EQUIP: u16 = 11;
pub const JUMP: u16 = 20;

/// Locked registry holding `Avatar`:
///
/// * properties `position`, `direction` (hooked), `name`, `hp`
/// * base methods `say(STRING)`, `equip(UINT8, STRING)`
/// * cell method `jump(FLOAT)`
pub fn avatar_schema() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry
        .register_class(
            AVATAR,
            vec![
                PropertyDef::new("position", POSITION, DataType::Vector3).with_hook("set_position"),
                PropertyDef::new("direction", DIRECTION, DataType::Vector3)
                    .with_hook("set_direction"),
                PropertyDef::new("name", NAME, DataType::String).with_default("nobody"),
                PropertyDef::new("hp", HP, DataType::Int32).with_default(100i32),
            ],
            vec![
                MethodDef::new("say", SAY, vec![DataType::String]),
                MethodDef::new("equip", EQUIP, vec![DataType::UInt8, DataType::String]),
            ],
            vec![MethodDef::new("jump", JUMP, vec![DataType::Float])],
        )
        .expect("Avatar schema is valid");
    registry.lock().expect("fresh registry locks");
    registry
}
