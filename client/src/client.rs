use std::collections::HashMap;

use log::{debug, info, warn};

use kbe_shared::{
    BundleReader, CallContext, EntityId, PropertyId, SchemaError, SchemaRegistry, Value, ValueError,
};

use crate::{
    client_config::ClientConfig,
    entity::Entity,
    error::{ClientError, EntityError},
    events::EventBus,
    hooks::{HookContext, HookRegistry},
    mailbox::{Outbox, PostedMail, ResponseHandler},
    session::Session,
};

/// The entity side of one client session.
///
/// The transport feeds inbound notifications in through the `on_*`
/// methods and drains outbound mail with `take_outgoing()`, once per tick,
/// on the same thread that issues remote calls.
pub struct Client {
    config: ClientConfig,
    registry: SchemaRegistry,
    hooks: HookRegistry,
    events: EventBus,
    session: Session,
    entities: HashMap<EntityId, Entity>,
    outbox: Outbox,
    outbox_warned: bool,
}

impl Client {
    /// Creates a Client over a locked schema registry. Every hook named by a
    /// property def must be resolvable in `hooks` and accept the property's type.
    pub fn new(
        config: ClientConfig,
        registry: SchemaRegistry,
        hooks: HookRegistry,
    ) -> Result<Self, ClientError> {
        if !registry.is_locked() {
            return Err(SchemaError::RegistryNotLocked.into());
        }
        for schema in registry.classes() {
            for def in schema.properties() {
                let Some(hook) = def.hook.as_deref() else {
                    continue;
                };
                match hooks.accepts(schema.class_type(), hook, &def.data_type) {
                    None => {
                        return Err(EntityError::UnknownHook {
                            class_type: schema.class_type().to_string(),
                            hook: hook.to_string(),
                        }
                        .into())
                    }
                    Some(false) => {
                        return Err(EntityError::HookTypeMismatch {
                            class_type: schema.class_type().to_string(),
                            property: def.name.clone(),
                            hook: hook.to_string(),
                            data_type: def.data_type.name(),
                        }
                        .into())
                    }
                    Some(true) => {}
                }
            }
        }

        Ok(Self {
            config,
            registry,
            hooks,
            events: EventBus::new(),
            session: Session::new(),
            entities: HashMap::new(),
            outbox: Outbox::new(),
            outbox_warned: false,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // Player

    /// Chooses the locally controlled entity, once per session
    pub fn set_player_id(&mut self, entity_id: EntityId) -> Result<(), ClientError> {
        self.session.set_player_id(entity_id)?;
        if let Some(entity) = self.entities.get_mut(&entity_id) {
            entity.set_locally_controlled(true);
        }
        Ok(())
    }

    pub fn player(&self) -> Option<&Entity> {
        self.session
            .player_id()
            .and_then(|entity_id| self.entities.get(&entity_id))
    }

    /// Last server-confirmed position of the player entity
    pub fn entity_server_position(&self) -> Option<[f32; 3]> {
        self.session.server_position()
    }

    // Entities

    pub fn entity(&self, entity_id: EntityId) -> Option<&Entity> {
        self.entities.get(&entity_id)
    }

    pub fn entity_mut(&mut self, entity_id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&entity_id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // Inbound

    /// The server announced a new entity. `granted` lists the contexts this
    /// client may call into; `initial` holds encoded property values.
    ///
    /// All initial values are decoded before the entity is created, so a bad
    /// payload creates nothing.
    pub fn on_entity_created(
        &mut self,
        entity_id: EntityId,
        class_type: &str,
        granted: &[CallContext],
        initial: &[(PropertyId, &[u8])],
    ) -> Result<(), ClientError> {
        if self.entities.contains_key(&entity_id) {
            return Err(ClientError::DuplicateEntity { entity_id });
        }

        let mut entity = Entity::new(&self.registry, entity_id, class_type)?;

        let mut decoded = Vec::with_capacity(initial.len());
        for (property_id, raw) in initial {
            let mut reader = BundleReader::new(raw);
            decoded.push(entity.decode_update(*property_id, &mut reader)?);
        }

        for context in granted {
            entity.grant_mailbox(*context, &self.outbox);
        }
        entity.set_locally_controlled(self.session.is_player(entity_id));

        let hooks = self.config.apply_hooks_on_create.then_some(&self.hooks);
        let mut ctx = HookContext {
            events: &mut self.events,
            session: &mut self.session,
        };
        for (slot, value) in decoded {
            entity.apply_decoded(&mut ctx, hooks, slot, value)?;
        }

        debug!("Client: created {}({})", class_type, entity_id);
        self.entities.insert(entity_id, entity);
        Ok(())
    }

    /// The server removed an entity: it leaves the world if needed and is destroyed
    pub fn on_entity_removed(&mut self, entity_id: EntityId) -> Result<(), ClientError> {
        let Some(mut entity) = self.entities.remove(&entity_id) else {
            warn!("Client: removal of unknown entity {}", entity_id);
            return Err(ClientError::UnknownEntity { entity_id });
        };
        entity.leave_world(&mut self.events);
        entity.destroy();
        debug!("Client: removed {}({})", entity.class_type(), entity_id);
        Ok(())
    }

    pub fn on_entity_enter_world(&mut self, entity_id: EntityId) -> Result<bool, ClientError> {
        let entity = self
            .entities
            .get_mut(&entity_id)
            .ok_or(ClientError::UnknownEntity { entity_id })?;
        Ok(entity.enter_world(&mut self.events))
    }

    pub fn on_entity_leave_world(&mut self, entity_id: EntityId) -> Result<bool, ClientError> {
        let entity = self
            .entities
            .get_mut(&entity_id)
            .ok_or(ClientError::UnknownEntity { entity_id })?;
        Ok(entity.leave_world(&mut self.events))
    }

    /// One server update of one property
    pub fn on_property_update(
        &mut self,
        entity_id: EntityId,
        property_id: PropertyId,
        raw: &[u8],
    ) -> Result<(), ClientError> {
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            warn!("Client: property update for unknown entity {}", entity_id);
            return Err(ClientError::UnknownEntity { entity_id });
        };
        let mut ctx = HookContext {
            events: &mut self.events,
            session: &mut self.session,
        };
        entity.apply_network_update(&mut ctx, &self.hooks, property_id, raw)?;
        Ok(())
    }

    /// A batch of updates for one entity: `(u16 property id, value)` pairs
    /// until the payload is exhausted. Returns the number applied.
    ///
    /// Updates before a failing one stay applied.
    pub fn on_property_updates(
        &mut self,
        entity_id: EntityId,
        payload: &[u8],
    ) -> Result<usize, ClientError> {
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            warn!("Client: property updates for unknown entity {}", entity_id);
            return Err(ClientError::UnknownEntity { entity_id });
        };
        let mut ctx = HookContext {
            events: &mut self.events,
            session: &mut self.session,
        };

        let mut reader = BundleReader::new(payload);
        let mut applied = 0;
        while !reader.is_exhausted() {
            let property_id = reader
                .read_u16()
                .map_err(|err| EntityError::PropertyDecode {
                    property: "<property id>".to_string(),
                    source: ValueError::Serde(err),
                })?;
            entity.read_network_update(&mut ctx, &self.hooks, property_id, &mut reader)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// The connection ended: every entity leaves the world and is destroyed,
    /// undelivered mail is dropped and the session starts over.
    pub fn on_disconnect(&mut self) {
        for (_, mut entity) in self.entities.drain() {
            entity.leave_world(&mut self.events);
            entity.destroy();
        }
        let dropped = self.outbox.drain().len();
        self.outbox_warned = false;
        self.session = Session::new();
        info!("Client: disconnected, dropped {} undelivered mails", dropped);
    }

    // Outbound

    pub fn base_call(
        &mut self,
        entity_id: EntityId,
        method_name: &str,
        args: &[Value],
    ) -> Result<(), ClientError> {
        self.remote_call(entity_id, CallContext::Base, method_name, args)
    }

    pub fn cell_call(
        &mut self,
        entity_id: EntityId,
        method_name: &str,
        args: &[Value],
    ) -> Result<(), ClientError> {
        self.remote_call(entity_id, CallContext::Cell, method_name, args)
    }

    pub fn remote_call(
        &mut self,
        entity_id: EntityId,
        context: CallContext,
        method_name: &str,
        args: &[Value],
    ) -> Result<(), ClientError> {
        self.remote_call_with_response(entity_id, context, method_name, args, None)
    }

    pub fn remote_call_with_response(
        &mut self,
        entity_id: EntityId,
        context: CallContext,
        method_name: &str,
        args: &[Value],
        response_handler: Option<ResponseHandler>,
    ) -> Result<(), ClientError> {
        let entity = self
            .entities
            .get_mut(&entity_id)
            .ok_or(ClientError::UnknownEntity { entity_id })?;
        entity.remote_call_with_response(context, method_name, args, response_handler)?;

        let pending = self.outbox.len();
        if pending >= self.config.outbox_warning_threshold && !self.outbox_warned {
            warn!("Client: {} mails waiting for the transport", pending);
            self.outbox_warned = true;
        }
        Ok(())
    }

    /// Hands every posted mail to the transport, in post order
    pub fn take_outgoing(&mut self) -> Vec<PostedMail> {
        self.outbox_warned = false;
        self.outbox.drain()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }
}
