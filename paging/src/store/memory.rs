//! In-memory incident store.
//!
//! Reference backend for tests and single-process hosts. Insertion order
//! doubles as recency order for the "latest" queries.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::model::{Incident, IncidentStatus, NewIncident};
use crate::store::{IncidentStore, StoreError, StoreResult};

/// Incident store backed by a process-local vector.
pub struct InMemoryIncidentStore {
    incidents: RwLock<Vec<Incident>>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self {
            incidents: RwLock::new(Vec::new()),
        }
    }

    /// Create a shared reference to this store.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// All incidents in creation order.
    pub fn snapshot(&self) -> StoreResult<Vec<Incident>> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Incident>>> {
        self.incidents.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Incident>>> {
        self.incidents.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryIncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn create_incident(&self, incident: NewIncident) -> StoreResult<Incident> {
        let incident = Incident {
            id: incident.id,
            service_id: incident.service_id,
            alert_type: incident.alert_type,
            message: incident.message,
            created_at: chrono::Utc::now(),
            policy_level: incident.policy_level,
            status: incident.status,
        };
        self.write()?.push(incident.clone());
        Ok(incident)
    }

    async fn incident_by_id(&self, incident_id: &str) -> StoreResult<Option<Incident>> {
        Ok(self.read()?.iter().find(|i| i.id == incident_id).cloned())
    }

    async fn latest_incident_by_service_and_type(
        &self,
        service_id: &str,
        alert_type: &str,
    ) -> StoreResult<Option<Incident>> {
        Ok(self
            .read()?
            .iter()
            .rev()
            .find(|i| i.service_id == service_id && i.alert_type == alert_type)
            .cloned())
    }

    async fn latest_incident_by_status(
        &self,
        service_id: &str,
        status: IncidentStatus,
    ) -> StoreResult<Option<Incident>> {
        Ok(self
            .read()?
            .iter()
            .rev()
            .find(|i| i.service_id == service_id && i.status == status)
            .cloned())
    }

    async fn update_incident_status(
        &self,
        incident_id: &str,
        status: IncidentStatus,
    ) -> StoreResult<Incident> {
        let mut incidents = self.write()?;
        let incident = incidents
            .iter_mut()
            .find(|i| i.id == incident_id)
            .ok_or_else(|| StoreError::NotFound(incident_id.to_string()))?;

        // Same-status updates are idempotent no-ops.
        if incident.status == status {
            return Ok(incident.clone());
        }
        match (incident.status, status) {
            (IncidentStatus::Resolved, _) => {
                return Err(StoreError::TerminalIncident(incident_id.to_string()));
            }
            (IncidentStatus::Acknowledged, IncidentStatus::NotAcknowledged) => {
                return Err(StoreError::InvalidTransition {
                    id: incident_id.to_string(),
                    from: incident.status,
                    to: status,
                });
            }
            _ => {}
        }
        incident.status = status;
        Ok(incident.clone())
    }

    async fn update_incident_policy_level(
        &self,
        incident_id: &str,
        level: u32,
        expected_prior: u32,
    ) -> StoreResult<Incident> {
        let mut incidents = self.write()?;
        let incident = incidents
            .iter_mut()
            .find(|i| i.id == incident_id)
            .ok_or_else(|| StoreError::NotFound(incident_id.to_string()))?;

        if incident.status == IncidentStatus::Resolved {
            return Err(StoreError::TerminalIncident(incident_id.to_string()));
        }
        if incident.policy_level != expected_prior {
            return Err(StoreError::LevelConflict {
                id: incident_id.to_string(),
                expected: expected_prior,
                actual: incident.policy_level,
            });
        }
        incident.policy_level = level;
        Ok(incident.clone())
    }
}
