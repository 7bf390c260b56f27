// ABOUTME: Error types for cutover operations.
// ABOUTME: Covers replication, readiness, change submission, and teardown failures.

use crate::directory::{ChangeStatus, RecordError, ResourceError};

/// Errors that can occur while driving a cutover session.
#[derive(Debug, thiserror::Error)]
pub enum CutoverError {
    /// The source load balancer could not be described.
    #[error("source load balancer not found: {0}")]
    SourceNotFound(String),

    /// No security-group mapping exists for the replica's target network.
    #[error("no security-group mapping for environment {environment}, region {region}, vpc {vpc}")]
    UnmappedNetwork {
        environment: String,
        region: String,
        vpc: String,
    },

    /// Resource replication failed.
    #[error("replication failed: {0}")]
    ReplicationFailed(String),

    /// The replica's members never all entered service.
    #[error("members failed to enter service after {tries} health checks")]
    ReadinessTimeout { tries: u32 },

    /// The directory rejected a change batch outright.
    #[error("change submission rejected: {0}")]
    ChangeRejected(String),

    /// A submitted change never converged.
    #[error("change failed to converge (last observed status {status})")]
    ConvergenceStalled { status: ChangeStatus },

    /// Blue and green records do not form a valid weighted pair.
    #[error("blue and green records must share a name and differ in set identifier")]
    RecordPairMismatch,

    /// Creating the green record failed.
    #[error("failed to create green record: {0}")]
    RecordCreateFailed(String),

    /// Deleting the blue resource failed.
    #[error("failed to delete resource: {0}")]
    ResourceDeleteFailed(String),

    /// Deleting the blue record failed.
    #[error("failed to delete record: {0}")]
    RecordDeleteFailed(String),
}

impl From<RecordError> for CutoverError {
    fn from(err: RecordError) -> Self {
        CutoverError::ChangeRejected(err.to_string())
    }
}

impl From<ResourceError> for CutoverError {
    fn from(err: ResourceError) -> Self {
        CutoverError::ReplicationFailed(err.to_string())
    }
}
