// ABOUTME: Load-balanced resource operations trait for the resource directory.
// ABOUTME: Describe, create, register members, query health, and delete resources.

use super::types::{MemberHealth, ResourceDescription, ResourceHandle, ResourceSpec};
use crate::types::InstanceId;
use async_trait::async_trait;

/// Load-balanced resource operations.
#[async_trait]
pub trait ResourceOps: Send + Sync {
    /// Describe an existing resource, or `None` if no such resource exists.
    async fn describe(&self, name: &str) -> Result<Option<ResourceDescription>, ResourceError>;

    /// Create a resource from the given spec.
    async fn create(&self, spec: &ResourceSpec) -> Result<ResourceHandle, ResourceError>;

    /// Register backend members with a resource.
    async fn register_members(
        &self,
        name: &str,
        members: &[InstanceId],
    ) -> Result<(), ResourceError>;

    /// Query the health of every member of a resource.
    async fn member_health(&self, name: &str) -> Result<Vec<MemberHealth>, ResourceError>;

    /// Delete a resource.
    async fn delete(&self, name: &str) -> Result<(), ResourceError>;

    /// Find the name of the resource whose public DNS name matches the
    /// given value, if any.
    async fn find_by_dns_name(&self, dns_name: &str) -> Result<Option<String>, ResourceError>;
}

/// Errors from resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("invalid resource input: {0}")]
    InvalidInput(String),

    #[error("directory request failed: {0}")]
    Transport(String),
}

/// Resolve the backend resource a record points at.
///
/// The directory's own metadata is authoritative: we ask it which resource
/// owns the record's target DNS name. Parsing the name out of the DNS value
/// is kept only as a compatibility shim for directories that cannot answer
/// the lookup.
pub async fn resolve_backend_name<R: ResourceOps>(
    directory: &R,
    dns_value: &str,
) -> Result<Option<String>, ResourceError> {
    if let Some(name) = directory.find_by_dns_name(dns_value).await? {
        return Ok(Some(name));
    }
    Ok(backend_name_from_dns_value(dns_value).map(str::to_string))
}

/// Fallback shim: extract a resource name from its public DNS value.
///
/// Matches the `[internal-]<name>-<digits>.<region>.elb.amazonaws.com`
/// shape. Anything else yields `None` rather than a guess.
pub fn backend_name_from_dns_value(value: &str) -> Option<&str> {
    let host = value.strip_suffix('.').unwrap_or(value);
    if !host.ends_with(".elb.amazonaws.com") {
        return None;
    }

    let first_label = host.split('.').next()?;
    let label = first_label.strip_prefix("internal-").unwrap_or(first_label);

    let idx = label.rfind('-')?;
    let (name, suffix) = label.split_at(idx);
    let digits = &suffix[1..];
    if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(name)
}
