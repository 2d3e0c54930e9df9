//! Contact notification: concurrent tier fan-out with per-contact outcomes.
//!
//! A page to a tier is dispatched to every contact concurrently but awaited
//! as a unit, and every contact's outcome is kept. Callers decide what a
//! partial failure means; nothing is lost in the fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::warn;

use crate::model::{ContactMethod, PagingContact};

/// Errors from paging a single contact.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("{method} delivery failed: {reason}")]
    Delivery {
        method: ContactMethod,
        reason: String,
    },

    #[error("contact has no delivery methods configured")]
    NoDeliveryMethods,
}

/// Dispatch result for one contact in a tier.
#[derive(Debug)]
pub struct PageOutcome {
    pub contact: PagingContact,
    pub result: Result<(), PageError>,
}

/// Aggregated result of a tier fan-out: one outcome per contact.
#[derive(Debug, Default)]
pub struct NotificationReport {
    pub outcomes: Vec<PageOutcome>,
}

impl NotificationReport {
    /// Number of contacts a dispatch was attempted for.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of contacts that could not be reached.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn all_delivered(&self) -> bool {
        self.failed() == 0
    }

    /// Outcomes for the contacts that could not be reached.
    pub fn failures(&self) -> impl Iterator<Item = &PageOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Fans a page out to every contact in a tier.
///
/// Dispatch is attempted for each contact; ordering and synchronous
/// completion are not part of the contract, the aggregated report is.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, contacts: &[PagingContact]) -> NotificationReport;
}

/// Per-contact delivery transport (phone/email gateways). External
/// collaborator seam below the notifier.
#[async_trait]
pub trait ContactPager: Send + Sync {
    async fn page(&self, contact: &PagingContact) -> Result<(), PageError>;
}

/// `ContactNotifier` over any `ContactPager`: concurrent fan-out, awaited as
/// a unit, with per-contact outcome aggregation.
pub struct FanOutNotifier {
    pager: Arc<dyn ContactPager>,
}

impl FanOutNotifier {
    pub fn new(pager: Arc<dyn ContactPager>) -> Self {
        Self { pager }
    }
}

#[async_trait]
impl ContactNotifier for FanOutNotifier {
    async fn notify(&self, contacts: &[PagingContact]) -> NotificationReport {
        let dispatches = contacts.iter().map(|contact| async move {
            let result = self.pager.page(contact).await;
            if let Err(ref error) = result {
                warn!(email = %contact.email, error = %error, "page dispatch failed");
            }
            PageOutcome {
                contact: contact.clone(),
                result,
            }
        });
        NotificationReport {
            outcomes: join_all(dispatches).await,
        }
    }
}
