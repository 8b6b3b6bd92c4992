//! multifit library: application logic for the per-group forecaster.

pub mod app;
pub mod config;
pub mod errors;
pub mod input;
pub mod logging;
