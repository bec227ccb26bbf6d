pub mod helpers;
pub mod test_schema;

pub use helpers::*;
pub use test_schema::{avatar_schema, AVATAR, DIRECTION, HP, NAME, POSITION};
