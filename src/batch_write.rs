//!
//! Batch-write coordination: unprocessed-item folding, capacity-driven
//! splitting, and failure aggregation.
//!
//! The coordinator issues physical batch writes until every request has
//! been accepted or has landed in a [`FailedBatch`]. It never sleeps or
//! backs off; throttling is surfaced through [`contains_throttling`]
//! so the caller can drive its own retry policy.

use crate::request::{request_count, FailedBatch, WriteBatch};
use crate::store::Store;
use tracing::{debug, warn};

/// Issue the given write batches, honoring unprocessed items and
/// splitting on capacity errors.
///
/// Each round re-issues only what the backend reported as unprocessed.
/// A batch that triggers the entity-too-large signal is split in half by
/// request count (original request order preserved within each half) and
/// each half is processed independently under the same policy. Any other
/// store failure is terminal for its batch and is recorded, not thrown.
///
/// Returns the `FailedBatch` records for batches that could not be fully
/// committed; an empty vector means everything was accepted.
///
/// The store call count is not bounded a priori: a pathological input
/// where every sub-batch is still oversized degrades to one call per
/// request, so callers should treat this as potentially slow.
pub fn write_batches(store: &mut dyn Store, batches: WriteBatch) -> Vec<FailedBatch> {
    let mut failed = Vec::new();
    // Sub-batches produced by splitting wait here; the first half of a
    // split is pushed last so it is processed first.
    let mut backlog = vec![batches];

    while let Some(batch) = backlog.pop() {
        if request_count(&batch) == 0 {
            continue;
        }

        let mut pending = batch;
        loop {
            match store.batch_write(&pending) {
                Ok(output) => {
                    if output.unprocessed_items.is_empty() {
                        break;
                    }
                    debug!(
                        remaining = request_count(&output.unprocessed_items),
                        "retrying unprocessed write requests"
                    );
                    pending = output.unprocessed_items;
                }
                Err(err) if err.is_capacity_exceeded() && request_count(&pending) > 1 => {
                    let (first, second) = split_batch(pending);
                    debug!(
                        first = request_count(&first),
                        second = request_count(&second),
                        "batch exceeded the size limit, splitting"
                    );
                    backlog.push(second);
                    backlog.push(first);
                    break;
                }
                Err(err) => {
                    warn!(code = err.code(), "write batch failed: {}", err.message());
                    failed.push(FailedBatch::new(pending, err));
                    break;
                }
            }
        }
    }

    failed
}

/// Split a batch into two halves at the midpoint of its total request
/// count, preserving per-table request order.
fn split_batch(batch: WriteBatch) -> (WriteBatch, WriteBatch) {
    let midpoint = request_count(&batch) / 2;

    let mut first = WriteBatch::new();
    let mut second = WriteBatch::new();
    let mut taken = 0;

    for (table, requests) in batch {
        for request in requests {
            let target = if taken < midpoint {
                &mut first
            } else {
                &mut second
            };
            target.entry(table.clone()).or_default().push(request);
            taken += 1;
        }
    }

    (first, second)
}

/// Whether any failed batch captured the throttling error signal.
///
/// True iff at least one entry's error code equals the throttling
/// identifier; the caller can then back off and retry the failed
/// requests itself.
pub fn contains_throttling(failed_batches: &[FailedBatch]) -> bool {
    failed_batches
        .iter()
        .any(|batch| batch.error().is_throttling())
}
