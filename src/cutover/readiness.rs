// ABOUTME: Readiness poller for newly created load-balanced resources.
// ABOUTME: Blocks until every member is in service, or deletes the resource on timeout.

use crate::config::ReadinessConfig;
use crate::directory::{MemberHealth, ResourceOps};

use super::error::CutoverError;

/// Wait until every member of `resource` reports in-service.
///
/// Issues at most `max_tries` health queries, `interval` apart. A transient
/// query error consumes a try like any other not-ready observation. When
/// the tries are exhausted the resource is considered unrecoverable: it is
/// deleted (best effort) so no unhealthy infrastructure is left behind,
/// and `ReadinessTimeout` is returned.
pub async fn wait_until_ready<R: ResourceOps>(
    directory: &R,
    resource: &str,
    settings: &ReadinessConfig,
) -> Result<(), CutoverError> {
    for attempt in 1..=settings.max_tries {
        match directory.member_health(resource).await {
            Ok(members) if all_in_service(&members) => {
                tracing::info!(resource, attempt, "all members in service");
                return Ok(());
            }
            Ok(members) => {
                tracing::debug!(
                    resource,
                    attempt,
                    members = members.len(),
                    in_service = members.iter().filter(|m| m.state.is_in_service()).count(),
                    "members not in service yet"
                );
            }
            Err(e) => {
                tracing::warn!(resource, attempt, error = %e, "health query failed");
            }
        }

        if attempt < settings.max_tries {
            tokio::time::sleep(settings.interval).await;
        }
    }

    tracing::warn!(
        resource,
        tries = settings.max_tries,
        "readiness retries exhausted, deleting resource"
    );
    if let Err(e) = directory.delete(resource).await {
        tracing::warn!(resource, error = %e, "failed to delete unhealthy resource");
    }

    Err(CutoverError::ReadinessTimeout {
        tries: settings.max_tries,
    })
}

/// A resource is ready only when it has members and every one of them is
/// in service. An empty member list is explicitly not ready: a resource
/// nobody is registered with cannot take traffic, however vacuously
/// healthy it looks.
fn all_in_service(members: &[MemberHealth]) -> bool {
    !members.is_empty() && members.iter().all(|m| m.state.is_in_service())
}
