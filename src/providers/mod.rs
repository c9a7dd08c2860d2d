//! DNS provider publishing.

mod route53;


pub use route53::Route53Publisher;

use crate::error::Result;
use crate::record::{RecordSet, RecordType};
use async_trait::async_trait;

/// What a change does to its record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// Create the record set, or replace it if it exists.
    Upsert,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

/// One record set change inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub action: ChangeAction,
    pub name: String,
    pub record_type: RecordType,
    pub ttl: i64,
    pub value: String,
}

/// Changes submitted to a hosted zone as a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    hosted_zone_id: String,
    changes: Vec<Change>,
}

impl ChangeBatch {
    /// One upsert per name, all sharing the set's type, TTL and value.
    pub fn upsert(record_set: &RecordSet) -> Self {
        let changes = record_set
            .names()
            .iter()
            .map(|name| Change {
                action: ChangeAction::Upsert,
                name: name.clone(),
                record_type: record_set.record_type(),
                ttl: record_set.ttl(),
                value: record_set.value().to_string(),
            })
            .collect();

        Self {
            hosted_zone_id: record_set.hosted_zone_id().to_string(),
            changes,
        }
    }

    pub fn hosted_zone_id(&self) -> &str {
        &self.hosted_zone_id
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }
}

/// Provider acknowledgement of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Provider-assigned change id.
    pub change_id: String,
    /// Change status as reported by the provider (e.g. PENDING).
    pub status: String,
    /// When the batch was accepted.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Capability to submit a change batch to a DNS provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// Submit the batch as one atomic request.
    async fn publish(&self, batch: &ChangeBatch) -> Result<PublishReceipt>;
}
