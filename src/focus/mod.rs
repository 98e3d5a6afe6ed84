//! Focus and z-order management
//!
//! A single counter hands out stacking values in strictly increasing
//! order; the most recently raised window is the one active window.

/// Tracks the stacking counter and the active window id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusManager {
    counter: u64,
    active: Option<String>,
}

impl FocusManager {
    pub fn new(base: u64) -> Self {
        Self {
            counter: base,
            active: None,
        }
    }

    /// Allocate the next stacking value for `id` and make it active
    pub fn raise(&mut self, id: &str) -> u64 {
        self.counter += 1;
        self.active = Some(id.to_string());
        self.counter
    }

    /// Active window id, if any window was ever focused
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Highest stacking value handed out so far
    pub fn top(&self) -> u64 {
        self.counter
    }
}
