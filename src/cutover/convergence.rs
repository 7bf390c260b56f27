// ABOUTME: Shared wait primitive for asynchronous directory changes.
// ABOUTME: Polls a change's status until it leaves PENDING or the bound is hit.

use crate::config::ConvergenceConfig;
use crate::directory::{ChangeHandle, ChangeStatus, RecordOps};

/// Wait for a submitted change to converge.
///
/// Polls the change's status every `interval` while it reports `Pending`,
/// up to `max_polls` queries. Returns the last observed status rather than
/// an error: a transient status-query failure ends the wait with whatever
/// was last known, and a change still pending at the bound is returned
/// as-is. Callers decide whether a non-`InSync` result is fatal.
pub async fn await_convergence<R: RecordOps>(
    directory: &R,
    handle: &ChangeHandle,
    settings: &ConvergenceConfig,
) -> ChangeStatus {
    let mut status = handle.status;
    let mut polls = 0u32;

    while status == ChangeStatus::Pending && polls < settings.max_polls {
        match directory.change_status(&handle.id).await {
            Ok(next) => status = next,
            Err(e) => {
                tracing::warn!(
                    change = %handle.id,
                    error = %e,
                    "status query failed, returning last known status"
                );
                return status;
            }
        }
        polls += 1;
        tracing::debug!(change = %handle.id, %status, polls, "change status");

        if status == ChangeStatus::Pending {
            tokio::time::sleep(settings.interval).await;
        }
    }

    if status == ChangeStatus::Pending {
        tracing::warn!(
            change = %handle.id,
            polls,
            "change still pending after poll bound"
        );
    }

    status
}
