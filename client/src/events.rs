use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::warn;

use kbe_shared::Value;

use crate::entity::Entity;

pub const ON_ENTER_WORLD: &str = "onEnterWorld";
pub const ON_LEAVE_WORLD: &str = "onLeaveWorld";
pub const SET_POSITION: &str = "set_position";
pub const SET_DIRECTION: &str = "set_direction";

/// One positional argument of a fired event
#[derive(Clone, Copy, Debug)]
pub enum EventArg<'a> {
    Entity(&'a Entity),
    Value(&'a Value),
}

impl<'a> EventArg<'a> {
    pub fn as_entity(&self) -> Option<&'a Entity> {
        match self {
            EventArg::Entity(entity) => Some(entity),
            EventArg::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            EventArg::Value(value) => Some(value),
            EventArg::Entity(_) => None,
        }
    }
}

/// Handle returned by `subscribe()`, used to unsubscribe later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Rc<RefCell<Box<dyn FnMut(&mut EventBus, &[EventArg<'_>])>>>;

struct Subscription {
    id: HandlerId,
    handler: Handler,
}

/// Synchronous, same-thread publish/subscribe keyed by event name.
///
/// Handlers receive the bus itself, so they may subscribe, unsubscribe or
/// fire further events while being invoked.
#[derive(Default)]
pub struct EventBus {
    subscriptions: HashMap<String, Vec<Subscription>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler; handlers of one name run in subscription order
    pub fn subscribe<F>(&mut self, event_name: &str, handler: F) -> HandlerId
    where
        F: FnMut(&mut EventBus, &[EventArg<'_>]) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        self.subscriptions
            .entry(event_name.to_string())
            .or_default()
            .push(Subscription {
                id,
                handler: Rc::new(RefCell::new(Box::new(handler))),
            });
        id
    }

    /// Returns whether the handler was subscribed to this name
    pub fn unsubscribe(&mut self, event_name: &str, id: HandlerId) -> bool {
        let Some(subscriptions) = self.subscriptions.get_mut(event_name) else {
            return false;
        };
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        let removed = subscriptions.len() != before;
        if subscriptions.is_empty() {
            self.subscriptions.remove(event_name);
        }
        removed
    }

    /// Invokes every handler subscribed to `event_name` when the call starts,
    /// each exactly once. Returns the number of handlers invoked.
    ///
    /// Handlers added during the call run from the next `fire()` on.
    pub fn fire(&mut self, event_name: &str, args: &[EventArg<'_>]) -> usize {
        let snapshot: Vec<Handler> = match self.subscriptions.get(event_name) {
            Some(subscriptions) => subscriptions
                .iter()
                .map(|subscription| subscription.handler.clone())
                .collect(),
            None => return 0,
        };

        let mut invoked = 0;
        for handler in snapshot {
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut **handler)(self, args);
                    invoked += 1;
                }
                Err(_) => {
                    // a handler that fires its own event
                    warn!("EventBus: skipping re-entrant handler for '{}'", event_name);
                }
            }
        }
        invoked
    }

    pub fn handler_count(&self, event_name: &str) -> usize {
        self.subscriptions
            .get(event_name)
            .map_or(0, |subscriptions| subscriptions.len())
    }
}
