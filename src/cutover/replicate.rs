// ABOUTME: Resource replication: clone a load balancer's shape under a new name.
// ABOUTME: Carries listeners, subnets, tags, and health check; security groups come from config.

use crate::config::NetworkMap;
use crate::directory::{ResourceHandle, ResourceOps, ResourceSpec};

use super::error::CutoverError;

/// Create a replica of `source` named `replica`.
///
/// The replica copies the source's listeners, subnets, tags, and health
/// check. Security groups are not copied: the replica gets the groups the
/// network map assigns to the source's VPC in this environment and region.
/// The source's members are registered with the replica so it can pass
/// health checks before any traffic moves.
pub async fn replicate<R: ResourceOps>(
    directory: &R,
    source: &str,
    replica: &str,
    environment: &str,
    region: &str,
    networks: &NetworkMap,
) -> Result<ResourceHandle, CutoverError> {
    let description = directory
        .describe(source)
        .await
        .map_err(|e| CutoverError::ReplicationFailed(e.to_string()))?
        .ok_or_else(|| CutoverError::SourceNotFound(source.to_string()))?;

    let vpc = description.vpc_id.clone().unwrap_or_default();
    let security_groups = networks
        .security_groups(environment, region, &vpc)
        .ok_or_else(|| CutoverError::UnmappedNetwork {
            environment: environment.to_string(),
            region: region.to_string(),
            vpc: vpc.clone(),
        })?;

    let spec = ResourceSpec {
        name: replica.to_string(),
        scheme: "internet-facing".to_string(),
        listeners: description.listeners.clone(),
        subnets: description.subnets.clone(),
        security_groups: security_groups.to_vec(),
        tags: description.tags.clone(),
        health_check: description.health_check.clone(),
    };

    let handle = directory
        .create(&spec)
        .await
        .map_err(|e| CutoverError::ReplicationFailed(e.to_string()))?;
    tracing::info!(source, replica, dns = %handle.dns_name, "replica created");

    if !description.members.is_empty() {
        directory
            .register_members(replica, &description.members)
            .await
            .map_err(|e| CutoverError::ReplicationFailed(e.to_string()))?;
        tracing::info!(
            replica,
            members = description.members.len(),
            "members registered"
        );
    }

    Ok(handle)
}
