use kbe_client::{
    Bundle, CallContext, Client, ClientConfig, ClientError, DataType, Entity, HookRegistry,
    PostedMail, Value,
};

use crate::test_schema::avatar_schema;

/// Test harness around a `Client` over the Avatar schema
pub struct TestClient {
    pub client: Client,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::new(config, avatar_schema(), HookRegistry::new())
            .expect("Avatar schema only names built-in hooks");
        Self { client }
    }

    pub fn entity(&self, entity_id: i32) -> &Entity {
        self.client
            .entity(entity_id)
            .unwrap_or_else(|| panic!("entity {} does not exist", entity_id))
    }

    /// Encodes `value` as the declared type of `property` and feeds it in as
    /// a server update
    pub fn server_update(
        &mut self,
        entity_id: i32,
        property: &str,
        value: impl Into<Value>,
    ) -> Result<(), ClientError> {
        let (id, raw) = self.encode_property(entity_id, property, value.into());
        self.client.on_property_update(entity_id, id, &raw)
    }

    pub fn encode_property(&self, entity_id: i32, property: &str, value: Value) -> (u16, Vec<u8>) {
        let def = self
            .entity(entity_id)
            .schema()
            .property(property)
            .unwrap_or_else(|| panic!("no property '{}'", property))
            .clone();
        (def.id, encode(&def.data_type, &value))
    }

    /// Drains the outbox, keeping only what was posted for `entity_id` through `context`
    pub fn drain_for(&mut self, entity_id: i32, context: CallContext) -> Vec<PostedMail> {
        self.client
            .take_outgoing()
            .into_iter()
            .filter(|mail| mail.entity_id == entity_id && mail.context == context)
            .collect()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn encode(data_type: &DataType, value: &Value) -> Vec<u8> {
    let mut bundle = Bundle::new();
    data_type
        .encode(value, &mut bundle)
        .expect("test value matches its declared type");
    bundle.to_bytes()
}
