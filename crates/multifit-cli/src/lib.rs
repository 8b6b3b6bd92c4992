//! # multifit-cli
//!
//! Progress table, run notifications, prediction output, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod table;
pub mod ui;

pub use presenter::SummaryPresenter;
pub use table::{TableLayout, TableReporter};
