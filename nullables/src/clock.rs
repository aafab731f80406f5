//! Nullable clock: deterministic time for testing.

use quorum_host::Clock;
use quorum_types::Timestamp;
use std::cell::Cell;
use std::rc::Rc;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Clones share the same time, so a
/// test can keep a handle after giving the clock away.
#[derive(Clone)]
pub struct NullClock {
    current: Rc<Cell<u64>>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Rc::new(Cell::new(initial_secs)),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }
}
