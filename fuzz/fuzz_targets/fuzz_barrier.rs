#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use std::sync::Arc;

use multifit_orchestration::interfaces::NullReporter;
use multifit_orchestration::tracker::ProgressTracker;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // First byte picks the slot count, the next slots bytes their job counts,
    // the rest is a sequence of (slot, job) completions.
    let workers = usize::from(data[0] % 8) + 1;
    if data.len() < 1 + workers {
        return;
    }
    let counts: Vec<usize> = data[1..=workers].iter().map(|b| usize::from(b % 16)).collect();
    let tracker = ProgressTracker::new(counts.clone(), Arc::new(NullReporter));
    tracker.begin();

    let mut fired = HashSet::new();
    for pair in data[1 + workers..].chunks_exact(2) {
        let slot = usize::from(pair[0] % 10);
        let job = usize::from(pair[1] % 20);
        // Out-of-range and repeated cells must be rejected, never panic.
        if let Ok(true) = tracker.record_completion(slot, job) {
            assert!(fired.insert(job), "row {job} reported twice");
        }
    }
    tracker.finish();

    assert_eq!(tracker.reported_rows().len(), fired.len());
});
