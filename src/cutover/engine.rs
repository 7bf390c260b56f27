// ABOUTME: Weighted cutover engine driving the blue/green traffic bleed.
// ABOUTME: Shifts DNS weight in atomic clamped steps until green carries 100.

use nonempty::nonempty;

use crate::config::{BleedConfig, ConvergenceConfig};
use crate::directory::{ChangeStatus, RecordChange, RecordOps, WeightedRecord, Zone};

use super::convergence::await_convergence;
use super::error::CutoverError;
use super::weights::next_weights;

/// Bleed traffic from `blue` to `green` until green carries all of it.
///
/// Each step moves `bleed.step` percentage points and submits both record
/// mutations as one atomic batch, so the directory never observes the pair
/// summing to anything but 100. The step's change must converge before the
/// next step starts; a rejected submission or a stalled change aborts the
/// whole cutover, leaving the weights at the last applied split. No
/// rollback is attempted: the split is durable in the directory and the
/// operator decides whether to resume or revert.
///
/// Restart-safe: resuming from any intermediate weight pair converges to
/// (0, 100) in at most `ceil(blue / step)` further steps.
pub async fn run_cutover<R: RecordOps>(
    directory: &R,
    zone: &Zone,
    blue: &mut WeightedRecord,
    green: &mut WeightedRecord,
    bleed: &BleedConfig,
    convergence: &ConvergenceConfig,
) -> Result<(), CutoverError> {
    if blue.name != green.name || blue.set_id == green.set_id {
        return Err(CutoverError::RecordPairMismatch);
    }

    // A non-positive step would never terminate; config validation
    // enforces 1..=100, this guards direct callers.
    let step = bleed.step.max(1);

    loop {
        let (next_blue, next_green) = next_weights(blue.weight, green.weight, step);

        let batch = nonempty![
            RecordChange::upsert(blue.with_weight(next_blue)),
            RecordChange::upsert(green.with_weight(next_green))
        ];

        let handle = directory
            .submit_change(zone, &batch)
            .await
            .map_err(|e| CutoverError::ChangeRejected(e.to_string()))?;

        let status = await_convergence(directory, &handle, convergence).await;
        if status != ChangeStatus::InSync {
            return Err(CutoverError::ConvergenceStalled { status });
        }

        blue.weight = next_blue;
        green.weight = next_green;
        tracing::info!(
            alias = %blue.name,
            blue = blue.weight,
            green = green.weight,
            "weight step applied"
        );

        if blue.weight == 0 && green.weight == 100 {
            return Ok(());
        }

        tokio::time::sleep(bleed.interval).await;
    }
}
