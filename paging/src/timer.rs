//! Escalation timer contract.
//!
//! The scheduling mechanism is an external collaborator; the core only
//! requires "fire a one-shot callback for this incident after `delay`".
//! Cancellation is not part of the contract: the escalation engine re-reads
//! incident state when a timer fires, so a stale firing is harmless.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from arming an escalation timer.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("could not arm escalation timer for incident {incident_id}: {reason}")]
    Schedule {
        incident_id: String,
        reason: String,
    },
}

/// Schedules a one-shot escalation callback keyed by incident id.
#[async_trait]
pub trait EscalationTimer: Send + Sync {
    async fn schedule(&self, incident_id: &str, delay: Duration) -> Result<(), TimerError>;
}
