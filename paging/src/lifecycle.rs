//! Incident lifecycle API: the externally driven status transitions.

use std::sync::Arc;

use tracing::{error, info};

use crate::error::PagingError;
use crate::model::{Incident, IncidentStatus};
use crate::store::IncidentStore;

/// Acknowledge/resolve endpoints. The store is the source of truth for the
/// status state machine; this layer only scopes failures to the operation.
pub struct IncidentLifecycle {
    store: Arc<dyn IncidentStore>,
}

impl IncidentLifecycle {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    /// Mark an incident acknowledged: a human has taken ownership.
    pub async fn acknowledge(&self, incident_id: &str) -> Result<Incident, PagingError> {
        match self
            .store
            .update_incident_status(incident_id, IncidentStatus::Acknowledged)
            .await
        {
            Ok(incident) => {
                info!(incident_id = %incident.id, "incident acknowledged");
                Ok(incident)
            }
            Err(source) => {
                error!(incident_id, error = %source, "failed to acknowledge incident");
                Err(PagingError::Acknowledge {
                    incident_id: incident_id.to_string(),
                    source,
                })
            }
        }
    }

    /// Mark an incident resolved. Terminal; resolving an already resolved
    /// incident is a no-op.
    pub async fn resolve(&self, incident_id: &str) -> Result<Incident, PagingError> {
        match self
            .store
            .update_incident_status(incident_id, IncidentStatus::Resolved)
            .await
        {
            Ok(incident) => {
                info!(incident_id = %incident.id, "incident resolved");
                Ok(incident)
            }
            Err(source) => {
                error!(incident_id, error = %source, "failed to resolve incident");
                Err(PagingError::Resolve {
                    incident_id: incident_id.to_string(),
                    source,
                })
            }
        }
    }
}
