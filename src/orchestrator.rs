//! Check workflow coordination
//!
//! This module provides:
//! - Workflow coordination: read → classify lines → look up → resolve
//! - Per-package error downgrading: lookup failures become a status,
//!   never abort the run
//! - Only file-level failures (manifest unreadable) are returned as
//!   errors

use crate::domain::{CheckSummary, ParseWarning, Requirement, Resolution, SkippedLine};
use crate::error::ManifestError;
use crate::manifest::{self, LineKind};
use crate::progress::Progress;
use crate::registry::IndexClient;
use crate::resolve;
use std::fs;
use std::path::Path;

/// Coordinates a full check of one requirements file
pub struct Orchestrator {
    index: Box<dyn IndexClient>,
    /// Also look up the latest version for unpinned requirements
    /// (--pin-warn in check mode, --pin in update mode)
    pin_latest: bool,
    /// Show a progress bar during lookups
    show_progress: bool,
}

impl Orchestrator {
    /// Create a new orchestrator over the given index client
    pub fn new(index: Box<dyn IndexClient>, pin_latest: bool, show_progress: bool) -> Self {
        Self {
            index,
            pin_latest,
            show_progress,
        }
    }

    /// Run the check: parse the manifest and resolve every requirement.
    ///
    /// Returns an error only when the manifest itself cannot be read;
    /// everything else degrades to per-line results in the summary.
    pub async fn check(&self, path: &Path) -> Result<CheckSummary, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::not_found(path));
        }
        let content =
            fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

        Ok(self.check_content(path, &content).await)
    }

    /// Run the check over already-loaded manifest content
    pub async fn check_content(&self, path: &Path, content: &str) -> CheckSummary {
        let mut summary = CheckSummary::new(path);
        let lines = manifest::parse(content);

        let requirements: Vec<&Requirement> =
            lines.iter().filter_map(|line| line.requirement()).collect();
        let lookups = requirements
            .iter()
            .filter(|req| !req.is_unpinned() || self.pin_latest)
            .count();

        let mut progress = Progress::start(self.show_progress, lookups as u64);

        for line in &lines {
            match &line.kind {
                LineKind::Blank | LineKind::Comment | LineKind::Directive => {}
                LineKind::Invalid { message } => summary.add_warning(ParseWarning {
                    line: line.number,
                    message: message.clone(),
                }),
                LineKind::Unsupported { name, reason } => summary.add_skipped(SkippedLine {
                    line: line.number,
                    name: name.clone(),
                    reason: reason.clone(),
                }),
                LineKind::Requirement(req) => {
                    summary.add_resolution(self.resolve_requirement(req, &progress).await);
                }
            }
        }

        progress.finish_and_clear();
        summary
    }

    /// Resolves one requirement, consulting the index unless the
    /// requirement is unpinned and no latest version was asked for
    async fn resolve_requirement(&self, req: &Requirement, progress: &Progress) -> Resolution {
        if req.is_unpinned() && !self.pin_latest {
            return Resolution::unpinned(req.clone(), None);
        }

        progress.set_package(&req.name);
        let lookup = self.index.fetch_versions(&req.normalized_name()).await;
        progress.inc();

        resolve::resolve(req.clone(), lookup)
    }
}
