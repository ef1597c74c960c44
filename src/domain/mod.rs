//! Core domain types
//!
//! This module provides:
//! - Requirement: one declared dependency from the requirements file
//! - Specifier: the supported version constraint forms
//! - Resolution: the per-requirement outcome of an index lookup
//! - CheckSummary: aggregated results for a whole run

mod requirement;
mod resolution;
mod summary;

pub use requirement::{Requirement, Specifier, SpecifierKind};
pub use resolution::{ChangeKind, Resolution, ResolutionStatus};
pub use summary::{CheckSummary, ParseWarning, SkippedLine};
