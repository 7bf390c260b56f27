// ABOUTME: State transition methods for cutover orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use nonempty::nonempty;

use crate::directory::{ChangeStatus, RecordChange, RecordOps, ResourceHandle, ResourceOps, WeightedRecord};

use super::Session;
use super::convergence::await_convergence;
use super::engine::run_cutover;
use super::error::CutoverError;
use super::readiness::wait_until_ready;
use super::replicate::replicate;
use super::state::{
    Decommissioned, GreenPublished, Initialized, Ready, Replicated, ResourceRetired, Shifted,
};

/// TTL for the freshly published green record. Kept short so resolvers
/// pick up weight changes quickly during the bleed.
const GREEN_RECORD_TTL: i64 = 60;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Session<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Session<T> {
        Session {
            config: self.config,
            zone: self.zone,
            source: self.source,
            blue: self.blue,
            state,
        }
    }
}

// =============================================================================
// Initialized -> Replicated
// =============================================================================

impl Session<Initialized> {
    /// Clone the blue resource under the replica name and register the
    /// source's members with it.
    ///
    /// # Errors
    ///
    /// Returns `CutoverError::SourceNotFound` if the blue resource cannot
    /// be described, `UnmappedNetwork` if configuration carries no
    /// security groups for its VPC, or `ReplicationFailed` on directory
    /// errors.
    #[must_use = "cutover state must be used"]
    pub async fn replicate<R: ResourceOps>(
        self,
        directory: &R,
    ) -> Result<Session<Replicated>, CutoverError> {
        let replica_name = self.replica_name();
        let replica = replicate(
            directory,
            &self.source,
            &replica_name,
            &self.config.environment,
            &self.config.region,
            &self.config.networks,
        )
        .await?;

        Ok(self.transition(Replicated { replica }))
    }
}

// =============================================================================
// Replicated -> Ready
// =============================================================================

impl Session<Replicated> {
    /// Block until every replica member is in service.
    ///
    /// On retry exhaustion the poller has already deleted the replica;
    /// the session cannot continue and there is nothing left to clean up.
    ///
    /// # Errors
    ///
    /// Returns `CutoverError::ReadinessTimeout` when the members never all
    /// enter service.
    #[must_use = "cutover state must be used"]
    pub async fn wait_ready<R: ResourceOps>(
        self,
        directory: &R,
    ) -> Result<Session<Ready>, CutoverError> {
        wait_until_ready(directory, &self.state.replica.name, &self.config.readiness).await?;

        let replica = self.state.replica.clone();
        Ok(self.transition(Ready { replica }))
    }
}

// =============================================================================
// Ready -> GreenPublished
// =============================================================================

impl Session<Ready> {
    /// Create the green record at weight 0, pointing at the replica.
    ///
    /// Publishing at weight 0 makes the record visible to resolvers
    /// without moving any traffic yet; the bleed owns every weight change
    /// after this point.
    ///
    /// # Errors
    ///
    /// Returns `RecordCreateFailed` if the directory rejects the change,
    /// or `ConvergenceStalled` if it never converges.
    #[must_use = "cutover state must be used"]
    pub async fn publish_green<R: RecordOps>(
        self,
        directory: &R,
    ) -> Result<Session<GreenPublished>, CutoverError> {
        let green = WeightedRecord {
            name: self.blue.name.clone(),
            set_id: format!("{}{}", self.blue.set_id, self.config.replica_suffix),
            weight: 0,
            value: self.state.replica.dns_name.clone(),
            ttl: GREEN_RECORD_TTL,
        };

        let batch = nonempty![RecordChange::create(green.clone())];
        let handle = directory
            .submit_change(&self.zone, &batch)
            .await
            .map_err(|e| CutoverError::RecordCreateFailed(e.to_string()))?;

        let status = await_convergence(directory, &handle, &self.config.convergence).await;
        if status != ChangeStatus::InSync {
            return Err(CutoverError::ConvergenceStalled { status });
        }
        tracing::info!(record = %green.name, set_id = %green.set_id, "green record published");

        let replica = self.state.replica.clone();
        Ok(self.transition(GreenPublished { replica, green }))
    }
}

// =============================================================================
// GreenPublished -> Shifted
// =============================================================================

impl Session<GreenPublished> {
    /// Run the weighted bleed until green carries all traffic.
    ///
    /// # Errors
    ///
    /// Returns the engine's error on a rejected or stalled step. The
    /// weights stay at the last applied split; no rollback is attempted.
    #[must_use = "cutover state must be used"]
    pub async fn shift_traffic<R: RecordOps>(
        mut self,
        directory: &R,
    ) -> Result<Session<Shifted>, CutoverError> {
        let mut green = self.state.green.clone();
        run_cutover(
            directory,
            &self.zone,
            &mut self.blue,
            &mut green,
            &self.config.bleed,
            &self.config.convergence,
        )
        .await?;

        let replica = self.state.replica.clone();
        Ok(self.transition(Shifted { replica, green }))
    }
}

// =============================================================================
// Shifted -> ResourceRetired
// =============================================================================

impl Session<Shifted> {
    /// Delete the blue resource. The blue record must outlive it: the
    /// record is deleted only in the next step, so a resolver holding a
    /// cached blue answer never sees the record vanish while the bleed's
    /// final change is still propagating.
    ///
    /// # Errors
    ///
    /// Returns `ResourceDeleteFailed` if the directory refuses.
    #[must_use = "cutover state must be used"]
    pub async fn retire_blue_resource<R: ResourceOps>(
        self,
        directory: &R,
    ) -> Result<Session<ResourceRetired>, CutoverError> {
        directory
            .delete(&self.source)
            .await
            .map_err(|e| CutoverError::ResourceDeleteFailed(e.to_string()))?;
        tracing::info!(resource = %self.source, "blue resource deleted");

        let replica = self.state.replica.clone();
        Ok(self.transition(ResourceRetired { replica }))
    }
}

// =============================================================================
// ResourceRetired -> Decommissioned
// =============================================================================

impl Session<ResourceRetired> {
    /// Delete the blue record, completing the cutover.
    ///
    /// # Errors
    ///
    /// Returns `RecordDeleteFailed` if the directory refuses.
    #[must_use = "cutover state must be used"]
    pub async fn delete_blue_record<R: RecordOps>(
        self,
        directory: &R,
    ) -> Result<Session<Decommissioned>, CutoverError> {
        directory
            .delete_record(&self.zone, &self.blue)
            .await
            .map_err(|e| CutoverError::RecordDeleteFailed(e.to_string()))?;
        tracing::info!(record = %self.blue.name, set_id = %self.blue.set_id, "blue record deleted");

        let replica = self.state.replica.clone();
        Ok(self.transition(Decommissioned { replica }))
    }
}

// =============================================================================
// Decommissioned - Terminal State
// =============================================================================

impl Session<Decommissioned> {
    /// Consume the session and return the handle of the resource now
    /// serving all traffic.
    pub fn finish(self) -> ResourceHandle {
        self.state.replica
    }
}
