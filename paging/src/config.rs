//! Core configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables owned by the decision core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// How long an incident may sit unacknowledged before the escalation
    /// timer fires and the incident is re-examined.
    pub ack_timeout: Duration,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_secs(15 * 60),
        }
    }
}
