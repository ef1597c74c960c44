//! Report rendering for check results
//!
//! This module provides:
//! - ReportOptions: display configuration from CLI flags
//! - TextReporter: grouped, sorted, optionally styled report output

mod report;

pub use report::{ReportOptions, TextReporter};
