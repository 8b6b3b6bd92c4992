//! Balanced split of the input groups into per-worker partitions.

use std::collections::HashSet;

use tracing::debug;

use multifit_core::error::ForecastError;
use multifit_core::series::{GroupId, Series};

/// The ordered groups assigned to one worker slot.
#[derive(Debug, Clone)]
pub struct WorkPartition {
    slot: usize,
    groups: Vec<Series>,
}

impl WorkPartition {
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Number of jobs in this partition.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn groups(&self) -> &[Series] {
        &self.groups
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.iter().map(|s| &s.id)
    }

    #[must_use]
    pub fn into_groups(self) -> Vec<Series> {
        self.groups
    }
}

/// Split `series` into `workers` partitions whose sizes differ by at most one.
///
/// Groups keep their input order and are cut into contiguous chunks; the
/// first `len % workers` partitions get one extra group. With fewer groups
/// than workers the trailing partitions are empty.
pub fn partition(series: Vec<Series>, workers: usize) -> Result<Vec<WorkPartition>, ForecastError> {
    if workers == 0 || series.is_empty() {
        return Err(ForecastError::InvalidPartitionCount {
            workers,
            groups: series.len(),
        });
    }

    if let Some(id) = first_duplicate(&series) {
        return Err(ForecastError::DuplicateGroup(id.clone()));
    }

    let base = series.len() / workers;
    let extra = series.len() % workers;
    let mut groups = series.into_iter();

    let partitions: Vec<WorkPartition> = (0..workers)
        .map(|slot| {
            let size = base + usize::from(slot < extra);
            WorkPartition {
                slot,
                groups: groups.by_ref().take(size).collect(),
            }
        })
        .collect();

    debug!(sizes = ?job_counts(&partitions), "partitioned groups");
    Ok(partitions)
}

fn first_duplicate(series: &[Series]) -> Option<&GroupId> {
    let mut seen = HashSet::with_capacity(series.len());
    series.iter().map(|s| &s.id).find(|id| !seen.insert(*id))
}

/// Job count of each partition, indexed by slot.
#[must_use]
pub fn job_counts(partitions: &[WorkPartition]) -> Vec<usize> {
    partitions.iter().map(WorkPartition::job_count).collect()
}
