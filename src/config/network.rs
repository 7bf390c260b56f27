// ABOUTME: Immutable environment/region network mapping used during replication.
// ABOUTME: Resolves the security groups a replica gets in a given VPC.

use serde::Deserialize;
use std::collections::HashMap;

/// Mapping of environment → region → VPC → security groups.
///
/// Replication needs to know which security groups a replica should carry
/// in the target VPC; that assignment is deployment-site policy, not
/// something the source resource can tell us. The map is parsed once from
/// configuration and passed by reference into the replication call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct NetworkMap(HashMap<String, HashMap<String, HashMap<String, Vec<String>>>>);

impl NetworkMap {
    /// Security groups for a VPC in the given environment and region, or
    /// `None` if the site has no mapping for it.
    pub fn security_groups(&self, environment: &str, region: &str, vpc: &str) -> Option<&[String]> {
        self.0
            .get(environment)?
            .get(region)?
            .get(vpc)
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
