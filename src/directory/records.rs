// ABOUTME: DNS record operations trait for the resource directory.
// ABOUTME: Zone lookup, record lookup, atomic batch changes, and status polling.

use super::types::{ChangeBatch, ChangeHandle, ChangeStatus, WeightedRecord, Zone};
use crate::types::{ChangeId, RecordName};
use async_trait::async_trait;

/// DNS record operations.
///
/// `submit_change` applies a whole batch atomically; the directory processes
/// it asynchronously and callers poll `change_status` until it leaves
/// `Pending`.
#[async_trait]
pub trait RecordOps: Send + Sync {
    /// Find the hosted zone with the given DNS name.
    async fn find_zone(&self, name: &RecordName) -> Result<Option<Zone>, RecordError>;

    /// Find the weighted record with the given name in a zone.
    async fn find_record(
        &self,
        zone: &Zone,
        name: &RecordName,
    ) -> Result<Option<WeightedRecord>, RecordError>;

    /// Submit an atomic batch of record mutations.
    async fn submit_change(
        &self,
        zone: &Zone,
        batch: &ChangeBatch,
    ) -> Result<ChangeHandle, RecordError>;

    /// Query the lifecycle status of a previously submitted change.
    async fn change_status(&self, id: &ChangeId) -> Result<ChangeStatus, RecordError>;

    /// Delete a record from a zone.
    async fn delete_record(
        &self,
        zone: &Zone,
        record: &WeightedRecord,
    ) -> Result<(), RecordError>;
}

/// Errors from record operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record exists but carries no weight or set identifier, so it
    /// cannot take part in a weighted migration.
    #[error("record {0} is not a weighted record")]
    NotWeighted(String),

    #[error("invalid change input: {0}")]
    InvalidInput(String),

    #[error("directory request failed: {0}")]
    Transport(String),
}
