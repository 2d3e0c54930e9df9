//! Escalation policy lookup contract.
//!
//! Policies are owned by an external policy-management collaborator and are
//! read-only from the core's perspective.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::EscalationPolicy;

/// Errors from policy lookups.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("no escalation policy registered for service {0}")]
    UnknownService(String),

    #[error("policy lookup failed: {0}")]
    Backend(String),
}

/// Resolves the ordered escalation tiers for a service.
#[async_trait]
pub trait PolicyResolver: Send + Sync {
    async fn escalation_policy(&self, service_id: &str) -> Result<EscalationPolicy, PolicyError>;
}

/// Resolver backed by a fixed in-process policy table.
pub struct InMemoryPolicyResolver {
    policies: HashMap<String, EscalationPolicy>,
}

impl InMemoryPolicyResolver {
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// Register a policy under its service id.
    pub fn with_policy(mut self, policy: EscalationPolicy) -> Self {
        self.policies.insert(policy.service_id.clone(), policy);
        self
    }
}

impl Default for InMemoryPolicyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyResolver for InMemoryPolicyResolver {
    async fn escalation_policy(&self, service_id: &str) -> Result<EscalationPolicy, PolicyError> {
        self.policies
            .get(service_id)
            .cloned()
            .ok_or_else(|| PolicyError::UnknownService(service_id.to_string()))
    }
}
