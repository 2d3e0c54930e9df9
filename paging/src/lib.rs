//! Decision core of an alert paging and escalation service.
//!
//! Two engines share a set of constructor-injected collaborator contracts:
//!
//! - [`AlertIntakeEngine`] turns raw service alerts into incidents,
//!   deduplicating against unresolved incidents of the same (service, alert
//!   type) pair and suppressing pages while a human is already engaged with
//!   the service;
//! - [`EscalationEngine`] reacts to escalation timer expiry and either
//!   climbs the policy ladder one tier, snoozes, or terminates the chain.
//!
//! ```text
//! ServiceAlert ──▶ AlertIntakeEngine ──▶ {IncidentStore, PolicyResolver,
//!                                          ContactNotifier, EscalationTimer}
//! timer fires ───▶ EscalationEngine ───▶ {IncidentStore, PolicyResolver,
//!                                          ContactNotifier, EscalationTimer}
//! acknowledge / resolve ──▶ IncidentLifecycle ──▶ IncidentStore
//! ```
//!
//! The crate is a library: no wire protocol, no CLI. Hosts construct the
//! engines with their own store/policy/notifier/timer implementations;
//! in-memory reference backends are provided for tests and single-process
//! embedding.

pub mod config;
pub mod error;
pub mod escalation;
pub mod intake;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod policy;
pub mod store;
pub mod timer;

// Re-export the public surface at the crate root.
pub use config::PagingConfig;
pub use error::PagingError;
pub use escalation::EscalationEngine;
pub use intake::AlertIntakeEngine;
pub use lifecycle::IncidentLifecycle;
pub use model::{
    ContactMethod, EscalationPolicy, EscalationRequest, Incident, IncidentStatus, NewIncident,
    PagingContact, ServiceAlert, STARTING_POLICY_LEVEL,
};
pub use notify::{
    ContactNotifier, ContactPager, FanOutNotifier, NotificationReport, PageError, PageOutcome,
};
pub use policy::{InMemoryPolicyResolver, PolicyError, PolicyResolver};
pub use store::{service_attended, InMemoryIncidentStore, IncidentStore, StoreError, StoreResult};
pub use timer::{EscalationTimer, TimerError};
