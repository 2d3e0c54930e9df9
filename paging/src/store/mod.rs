//! Incident storage contract shared by both decision engines.
//!
//! The durable backend is an external collaborator. This module defines the
//! lookup/update contract the engines depend on, plus the in-memory
//! reference backend used by tests and embedding hosts.

pub mod memory;

pub use memory::InMemoryIncidentStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Incident, IncidentStatus, NewIncident};

/// Errors from incident store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted incident does not exist.
    #[error("no incident with id {0}")]
    NotFound(String),

    /// Resolved incidents can no longer change.
    #[error("incident {0} is resolved and can no longer be mutated")]
    TerminalIncident(String),

    #[error("invalid status transition {from} -> {to} for incident {id}")]
    InvalidTransition {
        id: String,
        from: IncidentStatus,
        to: IncidentStatus,
    },

    /// Optimistic policy-level update lost a race.
    #[error("policy level of incident {id} is {actual}, expected {expected}")]
    LevelConflict {
        id: String,
        expected: u32,
        actual: u32,
    },

    #[error("incident store lock poisoned")]
    LockPoisoned,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Create/read/update contract for incidents.
///
/// Lookup queries return `Ok(None)` when nothing matches; absence is a
/// decision input for the engines, not a failure.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Persist a new incident, stamping its creation time.
    async fn create_incident(&self, incident: NewIncident) -> StoreResult<Incident>;

    async fn incident_by_id(&self, incident_id: &str) -> StoreResult<Option<Incident>>;

    /// Most recent incident for a (service, alert type) pair, any status.
    async fn latest_incident_by_service_and_type(
        &self,
        service_id: &str,
        alert_type: &str,
    ) -> StoreResult<Option<Incident>>;

    /// Most recent incident for the service currently in `status`.
    async fn latest_incident_by_status(
        &self,
        service_id: &str,
        status: IncidentStatus,
    ) -> StoreResult<Option<Incident>>;

    /// Apply a status transition. Same-status updates are idempotent no-ops;
    /// transitions out of `Resolved` and backwards transitions are rejected.
    async fn update_incident_status(
        &self,
        incident_id: &str,
        status: IncidentStatus,
    ) -> StoreResult<Incident>;

    /// Set the policy level if and only if it still equals `expected_prior`.
    async fn update_incident_policy_level(
        &self,
        incident_id: &str,
        level: u32,
        expected_prior: u32,
    ) -> StoreResult<Incident>;
}

/// A service is attended while any of its incidents is acknowledged,
/// regardless of alert type.
pub async fn service_attended(store: &dyn IncidentStore, service_id: &str) -> StoreResult<bool> {
    let latest = store
        .latest_incident_by_status(service_id, IncidentStatus::Acknowledged)
        .await?;
    Ok(latest.is_some())
}
