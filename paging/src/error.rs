//! Failure surface of the four public operations.

use thiserror::Error;

use crate::policy::PolicyError;
use crate::store::StoreError;
use crate::timer::TimerError;

/// Errors surfaced by `process_alert`, `process_escalation_request`,
/// `acknowledge` and `resolve`.
///
/// "No matching incident" during intake lookups is not represented here: it
/// is a decision input, not a failure (store queries return `Option`). Each
/// variant names the operation that failed; the low-level cause travels as
/// `source` and is logged, not matched on by callers.
#[derive(Debug, Error)]
pub enum PagingError {
    /// Store failure while processing an alert.
    #[error("failed to process alert for service {service_id} ({alert_type})")]
    AlertIntake {
        service_id: String,
        alert_type: String,
        #[source]
        source: StoreError,
    },

    /// The escalation policy for a service could not be resolved.
    #[error("failed to resolve escalation policy for service {service_id}")]
    PolicyLookup {
        service_id: String,
        #[source]
        source: PolicyError,
    },

    /// The escalation timer could not be armed.
    #[error("failed to arm escalation timer for incident {incident_id}")]
    TimerSchedule {
        incident_id: String,
        #[source]
        source: TimerError,
    },

    /// A timer fired for an incident the store does not know. Indicates
    /// store/timer desynchronization; never dropped silently.
    #[error("escalation requested for unknown incident {incident_id}")]
    UnknownIncident { incident_id: String },

    /// Store failure while escalating an incident.
    #[error("failed to escalate incident {incident_id}")]
    Escalation {
        incident_id: String,
        #[source]
        source: StoreError,
    },

    /// The policy level advanced concurrently; the losing update was
    /// dropped rather than blindly overwritten.
    #[error("policy level of incident {incident_id} changed concurrently")]
    PolicyLevelRace { incident_id: String },

    /// One or more contacts in a tier could not be paged. Surfaced after
    /// state changes (incident creation, level persistence, timer arming)
    /// have been applied.
    #[error("{failed} of {attempted} contacts in tier {tier} could not be paged")]
    Notification {
        tier: u32,
        failed: usize,
        attempted: usize,
    },

    #[error("failed to acknowledge incident {incident_id}")]
    Acknowledge {
        incident_id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to resolve incident {incident_id}")]
    Resolve {
        incident_id: String,
        #[source]
        source: StoreError,
    },
}
