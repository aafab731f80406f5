//! Nullable event log: keeps every observation in memory.

use quorum_host::{Event, EventSink, SinkError};
use std::cell::RefCell;
use std::rc::Rc;

/// Clones share one log, so a test can inspect what a component emitted
/// after handing it a boxed sink.
#[derive(Clone, Default)]
pub struct NullEventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl NullEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Names of the recorded events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(Event::name).collect()
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.events.borrow().contains(event)
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for NullEventLog {
    fn emit(&mut self, event: &Event) -> Result<(), SinkError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}
