use kbe_client::{CallContext, ClientError, Value};

use super::TestClient;
use crate::test_schema::AVATAR;

/// Fluent builder for entities announced to a `TestClient`
pub struct TestEntityBuilder {
    id: i32,
    class_type: String,
    granted: Vec<CallContext>,
    initial: Vec<(String, Value)>,
    in_world: bool,
}

impl TestEntityBuilder {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            class_type: AVATAR.to_string(),
            granted: Vec::new(),
            initial: Vec::new(),
            in_world: false,
        }
    }

    pub fn class_type(mut self, class_type: &str) -> Self {
        self.class_type = class_type.to_string();
        self
    }

    pub fn with_base(mut self) -> Self {
        self.granted.push(CallContext::Base);
        self
    }

    pub fn with_cell(mut self) -> Self {
        self.granted.push(CallContext::Cell);
        self
    }

    pub fn with_property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.initial.push((name.to_string(), value.into()));
        self
    }

    pub fn in_world(mut self) -> Self {
        self.in_world = true;
        self
    }

    /// Announces the entity to `test_client`
    pub fn spawn(self, test_client: &mut TestClient) -> Result<i32, ClientError> {
        let schema = test_client
            .client
            .registry()
            .get_schema(&self.class_type)?;
        let encoded: Vec<(u16, Vec<u8>)> = self
            .initial
            .into_iter()
            .map(|(name, value)| {
                let def = schema
                    .property(&name)
                    .unwrap_or_else(|| panic!("no property '{}'", name));
                (def.id, super::test_client::encode(&def.data_type, &value))
            })
            .collect();
        let initial: Vec<(u16, &[u8])> = encoded
            .iter()
            .map(|(id, raw)| (*id, raw.as_slice()))
            .collect();

        test_client
            .client
            .on_entity_created(self.id, &self.class_type, &self.granted, &initial)?;
        if self.in_world {
            test_client.client.on_entity_enter_world(self.id)?;
        }
        Ok(self.id)
    }
}

impl Default for TestEntityBuilder {
    fn default() -> Self {
        Self::new(1)
    }
}
