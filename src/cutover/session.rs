// ABOUTME: Generic cutover session parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::Config;
use crate::directory::{ResourceHandle, WeightedRecord, Zone};

use super::state::{Decommissioned, GreenPublished, Initialized, Ready, Replicated, Shifted};

/// A cutover in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (like the
/// replica handle or the green record) directly in the state type. This
/// enables compile-time enforcement of the step ordering: traffic cannot
/// shift before the green record exists, and the blue record cannot be
/// deleted before the blue resource is retired.
#[derive(Debug)]
pub struct Session<S> {
    pub(crate) config: Config,
    pub(crate) zone: Zone,
    pub(crate) source: String,
    pub(crate) blue: WeightedRecord,
    pub(crate) state: S,
}

impl Session<Initialized> {
    /// Start a cutover session for the given blue record and its backing
    /// resource.
    pub fn new(config: Config, zone: Zone, blue: WeightedRecord, source: String) -> Self {
        Session {
            config,
            zone,
            source,
            blue,
            state: Initialized,
        }
    }
}

impl<S> Session<S> {
    /// The hosted zone the records live in.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Name of the blue (source) resource.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The blue record, reflecting the last applied weight.
    pub fn blue(&self) -> &WeightedRecord {
        &self.blue
    }

    /// Name the replica resource will get (or got).
    pub fn replica_name(&self) -> String {
        format!("{}{}", self.source, self.config.replica_suffix)
    }
}

// State-specific accessors

impl Session<Replicated> {
    pub fn replica(&self) -> &ResourceHandle {
        &self.state.replica
    }
}

impl Session<Ready> {
    pub fn replica(&self) -> &ResourceHandle {
        &self.state.replica
    }
}

impl Session<GreenPublished> {
    pub fn replica(&self) -> &ResourceHandle {
        &self.state.replica
    }

    pub fn green(&self) -> &WeightedRecord {
        &self.state.green
    }
}

impl Session<Shifted> {
    pub fn green(&self) -> &WeightedRecord {
        &self.state.green
    }
}

impl Session<Decommissioned> {
    pub fn replica(&self) -> &ResourceHandle {
        &self.state.replica
    }
}
