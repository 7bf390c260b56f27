// ABOUTME: Shared data types crossing the directory-service boundary.
// ABOUTME: Weighted records, change batches, member health, and resource shapes.

use crate::types::{ChangeId, InstanceId, RecordName, ZoneId};
use nonempty::NonEmpty;
use std::collections::HashMap;
use std::fmt;

/// A hosted DNS zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    pub name: RecordName,
}

/// One variant of a weighted DNS alias.
///
/// Blue and green share the same `name`; the `set_id` tells them apart.
/// While both exist, their weights sum to 100 and resolvers split traffic
/// proportionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedRecord {
    pub name: RecordName,
    pub set_id: String,
    pub weight: i64,
    pub value: String,
    pub ttl: i64,
}

impl WeightedRecord {
    /// Copy of this record with a different weight, for building change batches.
    #[must_use]
    pub fn with_weight(&self, weight: i64) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }
}

/// Action applied to a record inside a change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Create,
    Upsert,
    Delete,
}

/// A single record mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub action: ChangeAction,
    pub record: WeightedRecord,
}

impl RecordChange {
    pub fn create(record: WeightedRecord) -> Self {
        Self {
            action: ChangeAction::Create,
            record,
        }
    }

    pub fn upsert(record: WeightedRecord) -> Self {
        Self {
            action: ChangeAction::Upsert,
            record,
        }
    }

    pub fn delete(record: WeightedRecord) -> Self {
        Self {
            action: ChangeAction::Delete,
            record,
        }
    }
}

/// An atomic batch of record mutations. The directory applies the whole
/// batch or none of it, which is what keeps the blue/green weight sum at
/// 100 at every observable point.
pub type ChangeBatch = NonEmpty<RecordChange>;

/// Lifecycle state of a submitted change, tracked by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Pending,
    InSync,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Pending => write!(f, "PENDING"),
            ChangeStatus::InSync => write!(f, "INSYNC"),
        }
    }
}

/// Handle to a submitted change: its ID plus the status observed at
/// submission time.
#[derive(Debug, Clone)]
pub struct ChangeHandle {
    pub id: ChangeId,
    pub status: ChangeStatus,
}

/// Health classification of a load-balanced member. Anything other than
/// in-service counts as unhealthy, whatever the reason string says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthState {
    InService,
    Other(String),
}

impl HealthState {
    pub fn from_state(state: &str) -> Self {
        if state == "InService" {
            HealthState::InService
        } else {
            HealthState::Other(state.to_string())
        }
    }

    pub fn is_in_service(&self) -> bool {
        matches!(self, HealthState::InService)
    }
}

/// One member of a load-balanced resource and its observed health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHealth {
    pub member: InstanceId,
    pub state: HealthState,
}

/// A traffic listener on a load-balanced resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub protocol: String,
    pub port: i32,
    pub member_protocol: Option<String>,
    pub member_port: i32,
    pub certificate: Option<String>,
}

/// Health-check probe configuration carried over during replication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckSpec {
    pub target: String,
    pub interval: i32,
    pub timeout: i32,
    pub healthy_threshold: i32,
    pub unhealthy_threshold: i32,
}

/// Full description of an existing load-balanced resource.
#[derive(Debug, Clone)]
pub struct ResourceDescription {
    pub name: String,
    pub dns_name: String,
    pub vpc_id: Option<String>,
    pub subnets: Vec<String>,
    pub listeners: Vec<Listener>,
    pub members: Vec<InstanceId>,
    pub health_check: Option<HealthCheckSpec>,
    pub tags: HashMap<String, String>,
}

/// Creation request for a replica resource.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub name: String,
    pub scheme: String,
    pub listeners: Vec<Listener>,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub tags: HashMap<String, String>,
    pub health_check: Option<HealthCheckSpec>,
}

/// Handle to a created resource: its name and public DNS name, which
/// becomes the green record's target value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    pub name: String,
    pub dns_name: String,
}
