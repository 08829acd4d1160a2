//! Session engine configuration.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables shared by every session a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct SessionConfig {
    /// Events buffered per player before a slow observer starts losing them.
    event_capacity: usize,

    /// Milliseconds before an error notification is followed by a clear.
    error_clear_ms: u64,

    /// Length of generated game identifiers.
    id_length: usize,
}

impl SessionConfig {
    /// Delay before an error notification is cleared.
    pub fn error_clear_delay(&self) -> Duration {
        Duration::from_millis(self.error_clear_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            error_clear_ms: 2_000,
            id_length: 8,
        }
    }
}
