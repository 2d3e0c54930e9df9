//! Alert intake: turns raw service alerts into incidents.
//!
//! An alert only opens an incident when its (service, alert type) pair is
//! clear, that is, no unresolved incident of the same pair exists. Paging is
//! suppressed while the service is attended (some incident of the service is
//! acknowledged), but the incident is still created and its escalation timer
//! is still armed, so a silently opened incident is re-examined later.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::config::PagingConfig;
use crate::error::PagingError;
use crate::model::{IncidentStatus, NewIncident, ServiceAlert, STARTING_POLICY_LEVEL};
use crate::notify::ContactNotifier;
use crate::policy::PolicyResolver;
use crate::store::{service_attended, IncidentStore, StoreError};
use crate::timer::EscalationTimer;

type IntakeKey = (String, String);

/// Consumes service alerts and decides whether to open an incident, page the
/// first escalation tier, and arm the escalation timer.
pub struct AlertIntakeEngine {
    store: Arc<dyn IncidentStore>,
    policies: Arc<dyn PolicyResolver>,
    notifier: Arc<dyn ContactNotifier>,
    timer: Arc<dyn EscalationTimer>,
    config: PagingConfig,
    /// One serialization slot per (service, alert type). Two concurrent
    /// alerts for the same pair must not both observe a clear state and
    /// open two incidents.
    intake_slots: Mutex<HashMap<IntakeKey, Arc<AsyncMutex<()>>>>,
}

impl AlertIntakeEngine {
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
            intake_slots: Mutex::new(HashMap::new()),
        }
    }

    /// Process one service alert.
    ///
    /// Completes silently both when an incident was opened and when the
    /// alert was suppressed as a duplicate. Store and policy failures
    /// propagate wrapped; notification failures are surfaced only after the
    /// incident exists and its timer is armed.
    pub async fn process_alert(&self, alert: ServiceAlert) -> Result<(), PagingError> {
        let slot = self.intake_slot(&alert);
        let _intake_guard = slot.lock().await;

        let latest = self
            .store
            .latest_incident_by_service_and_type(&alert.service_id, &alert.alert_type)
            .await
            .map_err(|source| self.store_failure(&alert, source))?;

        if let Some(existing) = latest {
            if existing.status != IncidentStatus::Resolved {
                debug!(
                    service_id = %alert.service_id,
                    alert_type = %alert.alert_type,
                    incident_id = %existing.id,
                    "suppressing duplicate alert for active incident"
                );
                return Ok(());
            }
        }

        let attended = service_attended(self.store.as_ref(), &alert.service_id)
            .await
            .map_err(|source| self.store_failure(&alert, source))?;

        let incident = self
            .store
            .create_incident(NewIncident::opened_by(&alert))
            .await
            .map_err(|source| self.store_failure(&alert, source))?;
        info!(
            incident_id = %incident.id,
            service_id = %incident.service_id,
            alert_type = %incident.alert_type,
            "opened incident"
        );

        let mut notification_failure = None;
        if attended {
            debug!(
                incident_id = %incident.id,
                "service already attended, skipping page"
            );
        } else {
            let policy = self
                .policies
                .escalation_policy(&alert.service_id)
                .await
                .map_err(|source| PagingError::PolicyLookup {
                    service_id: alert.service_id.clone(),
                    source,
                })?;
            match policy.tier_contacts(STARTING_POLICY_LEVEL) {
                Some(contacts) if !contacts.is_empty() => {
                    let report = self.notifier.notify(contacts).await;
                    info!(
                        incident_id = %incident.id,
                        attempted = report.attempted(),
                        failed = report.failed(),
                        "paged first escalation tier"
                    );
                    if !report.all_delivered() {
                        notification_failure = Some(PagingError::Notification {
                            tier: STARTING_POLICY_LEVEL,
                            failed: report.failed(),
                            attempted: report.attempted(),
                        });
                    }
                }
                _ => warn!(
                    service_id = %alert.service_id,
                    "escalation policy has no contacts at tier 0"
                ),
            }
        }

        // Armed even when nobody was paged: a silently opened incident must
        // still be re-examined.
        self.timer
            .schedule(&incident.id, self.config.ack_timeout)
            .await
            .map_err(|source| PagingError::TimerSchedule {
                incident_id: incident.id.clone(),
                source,
            })?;
        debug!(incident_id = %incident.id, "armed escalation timer");

        match notification_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn intake_slot(&self, alert: &ServiceAlert) -> Arc<AsyncMutex<()>> {
        let key = (alert.service_id.clone(), alert.alert_type.clone());
        let mut slots = match self.intake_slots.lock() {
            Ok(guard) => guard,
            // Entries are never removed; a poisoned guard still holds a
            // usable map.
            Err(poisoned) => poisoned.into_inner(),
        };
        slots
            .entry(key)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn store_failure(&self, alert: &ServiceAlert, source: StoreError) -> PagingError {
        PagingError::AlertIntake {
            service_id: alert.service_id.clone(),
            alert_type: alert.alert_type.clone(),
            source,
        }
    }
}
