//! Escalation timer expiry handling.
//!
//! When a timer fires, the incident and its service are re-read and the
//! request takes exactly one of three paths:
//!
//! ```text
//! (not_acknowledged, unattended) -> climb one tier, re-arm the timer
//! (not_acknowledged, attended)   -> snooze: re-arm the timer only
//! (acknowledged | resolved, _)   -> terminate: no action
//! ```
//!
//! Re-reading state at firing time makes late timers harmless, so timer
//! cancellation is never required for correctness.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PagingConfig;
use crate::error::PagingError;
use crate::model::{EscalationRequest, Incident, IncidentStatus};
use crate::notify::ContactNotifier;
use crate::policy::PolicyResolver;
use crate::store::{service_attended, IncidentStore, StoreError};
use crate::timer::EscalationTimer;

/// Reacts to escalation timer expiry: climbs the policy ladder, snoozes, or
/// terminates the chain.
pub struct EscalationEngine {
    store: Arc<dyn IncidentStore>,
    policies: Arc<dyn PolicyResolver>,
    notifier: Arc<dyn ContactNotifier>,
    timer: Arc<dyn EscalationTimer>,
    config: PagingConfig,
}

impl EscalationEngine {
    pub fn new(
        store: Arc<dyn IncidentStore>,
        policies: Arc<dyn PolicyResolver>,
        notifier: Arc<dyn ContactNotifier>,
        timer: Arc<dyn EscalationTimer>,
        config: PagingConfig,
    ) -> Self {
        Self {
            store,
            policies,
            notifier,
            timer,
            config,
        }
    }

    /// Process one fired escalation timer.
    ///
    /// A request naming an incident the store does not know is a hard
    /// failure: it means the store and the timer have desynchronized.
    pub async fn process_escalation_request(
        &self,
        request: EscalationRequest,
    ) -> Result<(), PagingError> {
        let incident = self
            .store
            .incident_by_id(&request.incident_id)
            .await
            .map_err(|source| PagingError::Escalation {
                incident_id: request.incident_id.clone(),
                source,
            })?
            .ok_or_else(|| PagingError::UnknownIncident {
                incident_id: request.incident_id.clone(),
            })?;

        let attended = service_attended(self.store.as_ref(), &incident.service_id)
            .await
            .map_err(|source| PagingError::Escalation {
                incident_id: incident.id.clone(),
                source,
            })?;

        match (incident.status, attended) {
            (IncidentStatus::NotAcknowledged, false) => self.escalate(&incident).await,
            (IncidentStatus::NotAcknowledged, true) => self.snooze(&incident).await,
            (IncidentStatus::Acknowledged | IncidentStatus::Resolved, _) => {
                debug!(
                    incident_id = %incident.id,
                    status = %incident.status,
                    "escalation chain ended by incident status"
                );
                Ok(())
            }
        }
    }

    /// Advance exactly one tier: page the next contact group, persist the
    /// level with an optimistic check against the level just read, re-arm.
    async fn escalate(&self, incident: &Incident) -> Result<(), PagingError> {
        let policy = self
            .policies
            .escalation_policy(&incident.service_id)
            .await
            .map_err(|source| PagingError::PolicyLookup {
                service_id: incident.service_id.clone(),
                source,
            })?;

        let next = incident.policy_level + 1;
        let Some(contacts) = policy.tier_contacts(next) else {
            // The policy defines the ceiling of automated escalation; the
            // top tier stays paged and the chain stops here.
            info!(
                incident_id = %incident.id,
                policy_level = incident.policy_level,
                "escalation policy exhausted"
            );
            return Ok(());
        };

        let report = self.notifier.notify(contacts).await;
        info!(
            incident_id = %incident.id,
            tier = next,
            attempted = report.attempted(),
            failed = report.failed(),
            "paged escalation tier"
        );

        self.store
            .update_incident_policy_level(&incident.id, next, incident.policy_level)
            .await
            .map_err(|source| match source {
                StoreError::LevelConflict { .. } => PagingError::PolicyLevelRace {
                    incident_id: incident.id.clone(),
                },
                other => PagingError::Escalation {
                    incident_id: incident.id.clone(),
                    source: other,
                },
            })?;

        self.rearm(incident).await?;

        if !report.all_delivered() {
            return Err(PagingError::Notification {
                tier: next,
                failed: report.failed(),
                attempted: report.attempted(),
            });
        }
        Ok(())
    }

    /// A human is engaged with the service through another incident; keep
    /// watching in case that engagement does not cover this one.
    async fn snooze(&self, incident: &Incident) -> Result<(), PagingError> {
        debug!(
            incident_id = %incident.id,
            "service attended elsewhere, snoozing escalation"
        );
        self.rearm(incident).await
    }

    async fn rearm(&self, incident: &Incident) -> Result<(), PagingError> {
        self.timer
            .schedule(&incident.id, self.config.ack_timeout)
            .await
            .map_err(|source| PagingError::TimerSchedule {
                incident_id: incident.id.clone(),
                source,
            })?;
        debug!(incident_id = %incident.id, "re-armed escalation timer");
        Ok(())
    }
}
