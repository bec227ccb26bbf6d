use std::{any::Any, fmt, sync::Arc};

use log::{debug, warn};

use kbe_shared::{
    Bundle, BundleReader, CallContext, ClassSchema, EntityId, MethodDef, PropertyDef, PropertyId,
    SchemaRegistry, Value,
};

use crate::{
    error::EntityError,
    events::{EventArg, EventBus, ON_ENTER_WORLD, ON_LEAVE_WORLD},
    hooks::{HookContext, HookRegistry},
    mailbox::{Mailbox, Outbox, ResponseHandler},
};

/// Client-side mirror of one server entity.
///
/// The class schema is shared and frozen; the property values are private
/// to this instance and stored once per slot, so the name view and the id
/// view of the cache can never disagree.
pub struct Entity {
    id: EntityId,
    schema: Arc<ClassSchema>,
    values: Vec<Value>,

    position: [f32; 3],
    direction: [f32; 3],
    velocity: f32,
    is_on_ground: bool,

    in_world: bool,
    locally_controlled: bool,
    destroyed: bool,
    render_binding: Option<Box<dyn Any>>,

    base_mailbox: Option<Mailbox>,
    cell_mailbox: Option<Mailbox>,
}

impl Entity {
    /// Builds an instance of `class_type` with every property at its default value
    pub fn new(
        registry: &SchemaRegistry,
        id: EntityId,
        class_type: &str,
    ) -> Result<Self, EntityError> {
        let schema = registry
            .get_schema(class_type)
            .map_err(|_| EntityError::UnknownClass {
                class_type: class_type.to_string(),
            })?;
        Ok(Self::from_schema(id, schema))
    }

    pub fn from_schema(id: EntityId, schema: Arc<ClassSchema>) -> Self {
        let values = schema
            .properties()
            .iter()
            .map(|def| def.default.clone())
            .collect();

        Self {
            id,
            schema,
            values,
            position: [0.0; 3],
            direction: [0.0; 3],
            velocity: 0.0,
            is_on_ground: true,
            in_world: false,
            locally_controlled: false,
            destroyed: false,
            render_binding: None,
            base_mailbox: None,
            cell_mailbox: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn class_type(&self) -> &str {
        self.schema.class_type()
    }

    pub fn schema(&self) -> &ClassSchema {
        &self.schema
    }

    // Mailboxes

    /// Gives this entity a mailbox for `context`, as granted by the server
    pub fn grant_mailbox(&mut self, context: CallContext, outbox: &Outbox) {
        let mailbox = Some(Mailbox::new(self.id, context, outbox.clone()));
        match context {
            CallContext::Base => self.base_mailbox = mailbox,
            CallContext::Cell => self.cell_mailbox = mailbox,
        }
    }

    pub fn mailbox(&self, context: CallContext) -> Option<&Mailbox> {
        match context {
            CallContext::Base => self.base_mailbox.as_ref(),
            CallContext::Cell => self.cell_mailbox.as_ref(),
        }
    }

    pub fn mailbox_mut(&mut self, context: CallContext) -> Option<&mut Mailbox> {
        match context {
            CallContext::Base => self.base_mailbox.as_mut(),
            CallContext::Cell => self.cell_mailbox.as_mut(),
        }
    }

    // Properties

    pub fn get_property(&self, name: &str) -> Result<&Value, EntityError> {
        let slot = self.slot(name)?;
        Ok(&self.values[slot])
    }

    pub fn get_property_by_id(&self, id: PropertyId) -> Result<&Value, EntityError> {
        let slot = self.slot_by_id(id)?;
        Ok(&self.values[slot])
    }

    /// Sets a property from application code and returns the replaced value.
    ///
    /// Hooks do not run on this path; they are reserved for server updates.
    pub fn set_property(&mut self, name: &str, value: impl Into<Value>) -> Result<Value, EntityError> {
        let slot = self.slot(name)?;
        self.write_checked(slot, value.into())
    }

    pub fn set_property_by_id(
        &mut self,
        id: PropertyId,
        value: impl Into<Value>,
    ) -> Result<Value, EntityError> {
        let slot = self.slot_by_id(id)?;
        self.write_checked(slot, value.into())
    }

    /// Every property def with its current value, in slot order
    pub fn properties(&self) -> impl Iterator<Item = (&PropertyDef, &Value)> {
        self.schema.properties().iter().zip(self.values.iter())
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.schema.properties().iter().map(|def| def.name.as_str())
    }

    /// Applies one server update of property `id`, encoded in `raw`.
    ///
    /// The value is decoded and the hook resolved before anything is
    /// written, so a failure leaves the cache untouched.
    pub fn apply_network_update(
        &mut self,
        ctx: &mut HookContext<'_>,
        hooks: &HookRegistry,
        id: PropertyId,
        raw: &[u8],
    ) -> Result<(), EntityError> {
        let mut reader = BundleReader::new(raw);
        self.read_network_update(ctx, hooks, id, &mut reader)?;
        if !reader.is_exhausted() {
            warn!(
                "{}({}): {} trailing bytes after update of property #{}",
                self.class_type(),
                self.id,
                reader.remaining(),
                id
            );
        }
        Ok(())
    }

    /// Like `apply_network_update`, reading the value from a shared reader
    pub fn read_network_update(
        &mut self,
        ctx: &mut HookContext<'_>,
        hooks: &HookRegistry,
        id: PropertyId,
        reader: &mut BundleReader,
    ) -> Result<(), EntityError> {
        let (slot, value) = self.decode_update(id, reader)?;
        self.apply_decoded(ctx, Some(hooks), slot, value)
    }

    pub(crate) fn decode_update(
        &self,
        id: PropertyId,
        reader: &mut BundleReader,
    ) -> Result<(usize, Value), EntityError> {
        let slot = self.slot_by_id(id)?;
        let def = &self.schema.properties()[slot];
        let value = def
            .data_type
            .decode(reader)
            .map_err(|source| EntityError::PropertyDecode {
                property: def.name.clone(),
                source,
            })?;
        Ok((slot, value))
    }

    /// Stores an already decoded server value, then runs the property's hook
    /// with the old value. Passing no hook registry writes silently.
    pub(crate) fn apply_decoded(
        &mut self,
        ctx: &mut HookContext<'_>,
        hooks: Option<&HookRegistry>,
        slot: usize,
        value: Value,
    ) -> Result<(), EntityError> {
        let schema = Arc::clone(&self.schema);
        let def = &schema.properties()[slot];

        let hook = match (hooks, def.hook.as_deref()) {
            (Some(hooks), Some(name)) => Some(hooks.get(schema.class_type(), name).ok_or_else(
                || EntityError::UnknownHook {
                    class_type: schema.class_type().to_string(),
                    hook: name.to_string(),
                },
            )?),
            _ => None,
        };

        let old = std::mem::replace(&mut self.values[slot], value);
        if let Some(hook) = hook {
            hook(self, ctx, &def.name, &old);
        }
        Ok(())
    }

    fn write_checked(&mut self, slot: usize, value: Value) -> Result<Value, EntityError> {
        let def = &self.schema.properties()[slot];
        def.data_type
            .validate(&value)
            .map_err(|source| EntityError::TypeMismatch {
                property: def.name.clone(),
                source,
            })?;
        Ok(std::mem::replace(&mut self.values[slot], value))
    }

    fn slot(&self, name: &str) -> Result<usize, EntityError> {
        self.schema
            .slot(name)
            .ok_or_else(|| EntityError::UnknownProperty {
                class_type: self.class_type().to_string(),
                property: name.to_string(),
            })
    }

    fn slot_by_id(&self, id: PropertyId) -> Result<usize, EntityError> {
        self.schema
            .slot_by_id(id)
            .ok_or_else(|| EntityError::UnknownProperty {
                class_type: self.class_type().to_string(),
                property: format!("#{}", id),
            })
    }

    // Spatial state

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Facing, in degrees per axis
    pub fn direction(&self) -> [f32; 3] {
        self.direction
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_on_ground(&self) -> bool {
        self.is_on_ground
    }

    pub(crate) fn set_position(&mut self, position: [f32; 3]) {
        self.position = position;
    }

    pub(crate) fn set_direction(&mut self, direction: [f32; 3]) {
        self.direction = direction;
    }

    pub(crate) fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    pub(crate) fn set_on_ground(&mut self, is_on_ground: bool) {
        self.is_on_ground = is_on_ground;
    }

    /// Whether this is the entity the local player controls
    pub fn is_locally_controlled(&self) -> bool {
        self.locally_controlled
    }

    pub(crate) fn set_locally_controlled(&mut self, locally_controlled: bool) {
        self.locally_controlled = locally_controlled;
    }

    // World membership

    pub fn is_in_world(&self) -> bool {
        self.in_world
    }

    /// Marks the entity as in the world and fires `onEnterWorld`.
    /// Does nothing and returns false if it already is.
    pub fn enter_world(&mut self, events: &mut EventBus) -> bool {
        if self.in_world {
            debug!("{}::enterWorld: {} is already in world", self.class_type(), self.id);
            return false;
        }
        self.in_world = true;
        debug!("{}::enterWorld: {}", self.class_type(), self.id);
        events.fire(ON_ENTER_WORLD, &[EventArg::Entity(self)]);
        true
    }

    /// Marks the entity as out of the world and fires `onLeaveWorld`.
    /// Does nothing and returns false if it was not in the world.
    pub fn leave_world(&mut self, events: &mut EventBus) -> bool {
        if !self.in_world {
            debug!("{}::leaveWorld: {} is not in world", self.class_type(), self.id);
            return false;
        }
        self.in_world = false;
        debug!("{}::leaveWorld: {}", self.class_type(), self.id);
        events.fire(ON_LEAVE_WORLD, &[EventArg::Entity(self)]);
        true
    }

    // Render binding

    /// Stores the view layer's handle for this entity. It is never inspected here.
    pub fn set_render_binding(&mut self, binding: Box<dyn Any>) {
        self.render_binding = Some(binding);
    }

    pub fn render_binding(&self) -> Option<&dyn Any> {
        self.render_binding.as_deref()
    }

    pub fn clear_render_binding(&mut self) -> Option<Box<dyn Any>> {
        self.render_binding.take()
    }

    pub fn has_render_binding(&self) -> bool {
        self.render_binding.is_some()
    }

    // Lifecycle

    /// Releases the render binding and both mailboxes. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            debug!("{}::destroy: {}", self.class_type(), self.id);
        }
        self.render_binding = None;
        self.base_mailbox = None;
        self.cell_mailbox = None;
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // Remote calls

    pub fn base_call(&mut self, method_name: &str, args: &[Value]) -> Result<(), EntityError> {
        self.remote_call(CallContext::Base, method_name, args)
    }

    pub fn cell_call(&mut self, method_name: &str, args: &[Value]) -> Result<(), EntityError> {
        self.remote_call(CallContext::Cell, method_name, args)
    }

    pub fn remote_call(
        &mut self,
        context: CallContext,
        method_name: &str,
        args: &[Value],
    ) -> Result<(), EntityError> {
        self.remote_call_with_response(context, method_name, args, None)
    }

    /// Encodes a call to `method_name` and posts it through the mailbox of `context`.
    ///
    /// Either the whole call is posted or nothing is: on any error the
    /// mailbox is left closed and the Outbox unchanged.
    pub fn remote_call_with_response(
        &mut self,
        context: CallContext,
        method_name: &str,
        args: &[Value],
        response_handler: Option<ResponseHandler>,
    ) -> Result<(), EntityError> {
        let Some(method) = self.schema.method(context, method_name) else {
            warn!(
                "{}::{}Call: unknown method '{}'",
                self.schema.class_type(),
                context,
                method_name
            );
            return Err(EntityError::UnknownMethod {
                class_type: self.schema.class_type().to_string(),
                context,
                method: method_name.to_string(),
            });
        };

        if args.len() != method.arity() {
            warn!(
                "{}::{}Call: args({} != {}) size is error!",
                self.schema.class_type(),
                context,
                args.len(),
                method.arity()
            );
            return Err(EntityError::ArgumentCountMismatch {
                method: method.name.clone(),
                expected: method.arity(),
                found: args.len(),
            });
        }

        let mailbox = match context {
            CallContext::Base => self.base_mailbox.as_mut(),
            CallContext::Cell => self.cell_mailbox.as_mut(),
        };
        let Some(mailbox) = mailbox else {
            return Err(EntityError::NoMailbox {
                entity_id: self.id,
                context,
            });
        };

        let encoded = encode_call(mailbox.new_mail()?, method, args);
        if let Err(err) = encoded {
            mailbox.discard_mail();
            warn!("{}::{}Call: {}", self.schema.class_type(), context, err);
            return Err(err);
        }

        mailbox.post_mail(response_handler)?;
        Ok(())
    }
}

fn encode_call(bundle: &mut Bundle, method: &MethodDef, args: &[Value]) -> Result<(), EntityError> {
    bundle.write_u16(method.id);
    for (index, (arg_type, arg)) in method.args.iter().zip(args).enumerate() {
        arg_type
            .encode(arg, bundle)
            .map_err(|source| EntityError::ArgumentEncodingError {
                method: method.name.clone(),
                index,
                source,
            })?;
    }
    Ok(())
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("class_type", &self.class_type())
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("in_world", &self.in_world)
            .field("base_mailbox", &self.base_mailbox.is_some())
            .field("cell_mailbox", &self.cell_mailbox.is_some())
            .finish()
    }
}
