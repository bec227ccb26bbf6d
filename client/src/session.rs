use log::info;

use kbe_shared::EntityId;

use crate::error::ClientError;

/// Per-connection state that outlives individual entities
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Session {
    player_id: Option<EntityId>,
    server_position: Option<[f32; 3]>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses the locally controlled entity. Can only happen once per session.
    pub fn set_player_id(&mut self, entity_id: EntityId) -> Result<(), ClientError> {
        if let Some(current) = self.player_id {
            return Err(ClientError::PlayerAlreadySet { current });
        }
        info!("Session: player entity is {}", entity_id);
        self.player_id = Some(entity_id);
        Ok(())
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    pub fn is_player(&self, entity_id: EntityId) -> bool {
        self.player_id == Some(entity_id)
    }

    /// Last position of the player entity as reported by the server, used for reconciliation
    pub fn server_position(&self) -> Option<[f32; 3]> {
        self.server_position
    }

    pub(crate) fn set_server_position(&mut self, position: [f32; 3]) {
        self.server_position = Some(position);
    }
}
