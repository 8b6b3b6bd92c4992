//! # multifit-orchestration
//!
//! Work partitioning, parallel workers, barrier-synchronized progress
//! tracking, and result aggregation.

pub mod aggregate;
pub mod interfaces;
pub mod orchestrator;
pub mod partition;
pub mod tracker;
pub mod worker;

pub use aggregate::aggregate;
pub use interfaces::{BarrierReport, BarrierReporter, RunLayout};
pub use orchestrator::{run_fit_predict, run_with_watchdog, RunOutput, RunPlan, RunSummary};
pub use partition::{partition, WorkPartition};
pub use tracker::ProgressTracker;
pub use worker::{Worker, WorkerContext, WorkerOutput};
