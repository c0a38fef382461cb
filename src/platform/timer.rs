//! Cooperative deadline timers
//!
//! A `TimerSlot` holds at most one pending deadline. Nothing runs on its own:
//! the owner polls `fire` with the current time and acts when it returns true.
//! Repeating timers re-arm themselves from inside the handler.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimerSlot {
    deadline_ms: Option<f64>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { deadline_ms: None }
    }

    /// Arm the slot to fire `delay_ms` after `now_ms`, replacing any pending deadline
    pub fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline_ms = Some(now_ms + delay_ms.max(0.0));
    }

    /// Drop the pending deadline, if any
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// Milliseconds until the deadline (zero once due)
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.deadline_ms.map(|at| (at - now_ms).max(0.0))
    }

    /// Disarm and return true if the deadline has passed
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(at) if now_ms >= at => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
