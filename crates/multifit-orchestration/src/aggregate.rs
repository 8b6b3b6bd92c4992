//! Merge of per-worker results into the final keyed collection.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use multifit_core::error::ForecastError;
use multifit_core::series::GroupId;
use multifit_core::GroupOutcome;

use crate::worker::WorkerOutput;

/// Merge worker outputs, in any order, into one map keyed by group.
///
/// A group reported by two workers is an invariant violation and fails
/// with `DuplicateGroupResult`.
pub fn aggregate<I>(outputs: I) -> Result<BTreeMap<GroupId, GroupOutcome>, ForecastError>
where
    I: IntoIterator<Item = WorkerOutput>,
{
    let mut merged = BTreeMap::new();
    for output in outputs {
        for (id, outcome) in output.results {
            match merged.entry(id) {
                Entry::Vacant(slot) => {
                    slot.insert(outcome);
                }
                Entry::Occupied(existing) => {
                    return Err(ForecastError::DuplicateGroupResult(existing.key().clone()));
                }
            }
        }
    }
    Ok(merged)
}
