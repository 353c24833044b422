//! Output module for run summaries
//!
//! The folder tree is the only durable record of a run; this module only
//! aggregates and prints what the run reported.

mod summary;

pub use summary::{print_summary, RunSummary};
