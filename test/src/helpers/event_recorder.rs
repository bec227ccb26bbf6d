use std::{cell::RefCell, rc::Rc};

use kbe_client::{EventArg, EventBus, HandlerId, Value};

/// One recorded firing: the entity argument (if any) and every value argument
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub entity_id: Option<i32>,
    pub values: Vec<Value>,
}

/// Collects the firings of one event name
pub struct EventRecorder {
    event_name: String,
    handler_id: HandlerId,
    fired: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl EventRecorder {
    pub fn attach(events: &mut EventBus, event_name: &str) -> Self {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let fired_in_handler = fired.clone();
        let handler_id = events.subscribe(event_name, move |_, args: &[EventArg<'_>]| {
            let entity_id = args.iter().find_map(|arg| arg.as_entity()).map(|entity| entity.id());
            let values = args.iter().filter_map(|arg| arg.as_value()).cloned().collect();
            fired_in_handler
                .borrow_mut()
                .push(RecordedEvent { entity_id, values });
        });
        Self {
            event_name: event_name.to_string(),
            handler_id,
            fired,
        }
    }

    pub fn count(&self) -> usize {
        self.fired.borrow().len()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.fired.borrow().clone()
    }

    pub fn detach(self, events: &mut EventBus) -> bool {
        events.unsubscribe(&self.event_name, self.handler_id)
    }
}
