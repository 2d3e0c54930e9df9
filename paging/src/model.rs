//! Shared data model: alerts, incidents, escalation policies and contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Policy level assigned to every newly opened incident. Paging is gated
/// separately, so an incident opened silently still starts at tier zero.
pub const STARTING_POLICY_LEVEL: u32 = 0;

/// A raw health alert emitted by a monitored service.
///
/// Transient input; the core never persists it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAlert {
    pub service_id: String,
    /// Alert category within the service. Incidents deduplicate per
    /// (service_id, alert_type) pair.
    pub alert_type: String,
    pub message: String,
}

/// Lifecycle status of an incident.
///
/// `Resolved` is terminal: neither status nor policy level may change
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    NotAcknowledged,
    Acknowledged,
    Resolved,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAcknowledged => write!(f, "not_acknowledged"),
            Self::Acknowledged => write!(f, "acknowledged"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// A tracked, stateful record of an ongoing or past problem for one
/// (service, alert type) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    pub service_id: String,
    /// Alert category that opened this incident.
    pub alert_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Index into the service's escalation tiers. Non-decreasing over the
    /// incident's life; advanced only by the escalation engine.
    pub policy_level: u32,
    pub status: IncidentStatus,
}

/// Creation payload for an incident. The store stamps `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
    pub id: String,
    pub service_id: String,
    pub alert_type: String,
    pub message: String,
    pub policy_level: u32,
    pub status: IncidentStatus,
}

impl NewIncident {
    /// Payload for the incident a fresh alert opens: tier zero, not yet
    /// acknowledged.
    pub fn opened_by(alert: &ServiceAlert) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            service_id: alert.service_id.clone(),
            alert_type: alert.alert_type.clone(),
            message: alert.message.clone(),
            policy_level: STARTING_POLICY_LEVEL,
            status: IncidentStatus::NotAcknowledged,
        }
    }
}

/// Delivery method for paging a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
}

impl std::fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

/// An on-call human reachable through one or more delivery methods.
///
/// Owned and mutated by an external contact-management collaborator; the
/// core only reads contact identity to hand to the notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingContact {
    pub phone_number: String,
    pub email: String,
    pub notify_via: Vec<ContactMethod>,
}

/// Ordered escalation tiers for one service. Tier index equals policy level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationPolicy {
    pub service_id: String,
    /// `tiers[i]` is the contact group to page when an incident reaches
    /// policy level `i`.
    pub tiers: Vec<Vec<PagingContact>>,
}

impl EscalationPolicy {
    /// Contacts at the given policy level, `None` once the ladder is
    /// exhausted.
    pub fn tier_contacts(&self, level: u32) -> Option<&[PagingContact]> {
        self.tiers.get(level as usize).map(|tier| tier.as_slice())
    }
}

/// Correlates a fired escalation timer back to its incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRequest {
    pub incident_id: String,
}
