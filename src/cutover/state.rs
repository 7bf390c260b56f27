// ABOUTME: Cutover state types for the type state pattern.
// ABOUTME: Each state carries the data later steps need, enforced at compile time.

use crate::directory::{ResourceHandle, WeightedRecord};

/// Initial state: zone, blue record, and source resource identified.
/// Available actions: `replicate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Replica created and members registered.
/// Available actions: `wait_ready()`
#[derive(Debug, Clone)]
pub struct Replicated {
    pub(crate) replica: ResourceHandle,
}

/// Replica members all in service, safe to receive traffic.
/// Available actions: `publish_green()`
#[derive(Debug, Clone)]
pub struct Ready {
    pub(crate) replica: ResourceHandle,
}

/// Green record published at weight 0, pointing at the replica.
/// Available actions: `shift_traffic()`
#[derive(Debug, Clone)]
pub struct GreenPublished {
    pub(crate) replica: ResourceHandle,
    pub(crate) green: WeightedRecord,
}

/// Traffic fully shifted: green carries 100, blue carries 0.
/// Available actions: `retire_blue_resource()`
#[derive(Debug, Clone)]
pub struct Shifted {
    pub(crate) replica: ResourceHandle,
    pub(crate) green: WeightedRecord,
}

/// Blue resource deleted; its record still exists at weight 0.
/// Available actions: `delete_blue_record()`
#[derive(Debug, Clone)]
pub struct ResourceRetired {
    pub(crate) replica: ResourceHandle,
}

/// Terminal state: blue fully decommissioned, green serving all traffic.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Decommissioned {
    pub(crate) replica: ResourceHandle,
}
