//! Output module for reporting on the index
//!
//! This module handles:
//! - Loading index statistics from the store
//! - Printing statistics and run reports

pub mod stats;

pub use stats::{load_statistics, print_run_report, print_statistics, IndexStatistics};
