//! Aggregated results for a whole check run

use super::{Resolution, ResolutionStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A line the parser could not make sense of; reported, never fatal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line number in the source manifest
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A requirement line that was recognized but not checked
/// (unsupported operator, package URL, local path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the source manifest
    pub line: usize,
    /// Package name when one could be extracted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Why the line was skipped
    pub reason: String,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}: {}", name, self.reason),
            None => write!(f, "line {}: {}", self.line, self.reason),
        }
    }
}

/// All per-requirement results for one manifest
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    /// Path of the checked manifest
    pub path: PathBuf,
    /// One resolution per requirement line, in manifest order
    pub resolutions: Vec<Resolution>,
    /// Lines that failed to parse
    pub warnings: Vec<ParseWarning>,
    /// Recognized but unchecked lines
    pub skipped: Vec<SkippedLine>,
}

impl CheckSummary {
    /// Creates an empty summary for the given manifest
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Records a resolution
    pub fn add_resolution(&mut self, resolution: Resolution) {
        self.resolutions.push(resolution);
    }

    /// Records a parse warning
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Records a skipped line
    pub fn add_skipped(&mut self, skipped: SkippedLine) {
        self.skipped.push(skipped);
    }

    /// Resolutions in report order: grouped by severity, alphabetical
    /// within each group (see Resolution::sort_rank)
    pub fn sorted_resolutions(&self) -> Vec<&Resolution> {
        let mut sorted: Vec<&Resolution> = self.resolutions.iter().collect();
        sorted.sort_by(|a, b| {
            a.sort_rank()
                .cmp(&b.sort_rank())
                .then_with(|| a.requirement.normalized_name().cmp(&b.requirement.normalized_name()))
        });
        sorted
    }

    /// Outdated resolutions in manifest order, for the update loop
    pub fn outdated(&self) -> Vec<&Resolution> {
        self.resolutions.iter().filter(|r| r.is_outdated()).collect()
    }

    /// Number of requirements with a newer version available
    pub fn outdated_count(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_outdated()).count()
    }

    /// Number of unpinned requirements
    pub fn unpinned_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| matches!(r.status, ResolutionStatus::Unpinned))
            .count()
    }

    /// Number of failed lookups
    pub fn failure_count(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of up-to-date requirements
    pub fn up_to_date_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| matches!(r.status, ResolutionStatus::UpToDate))
            .count()
    }

    /// Returns true when nothing at all was found in the manifest
    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty() && self.warnings.is_empty() && self.skipped.is_empty()
    }
}
