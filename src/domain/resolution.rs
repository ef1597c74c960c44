//! Per-requirement resolution result types

use super::Requirement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude of an available update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// First release component differs (breaking)
    Major,
    /// Second release component differs (features)
    Minor,
    /// Any lower-order difference, including pre-release-only deltas
    Patch,
}

impl ChangeKind {
    /// Plain display label
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Major => "major",
            ChangeKind::Minor => "minor",
            ChangeKind::Patch => "patch",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of resolving one requirement against the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Declared version matches the latest available
    UpToDate,
    /// A newer version is available
    Outdated {
        /// Magnitude of the available update
        change: ChangeKind,
    },
    /// The requirement carries no version constraint
    Unpinned,
    /// The index lookup failed; the requirement is still reported
    LookupFailed {
        /// Why the lookup failed
        reason: String,
    },
}

/// Resolution of a single requirement
///
/// One is produced for every requirement line, whatever happened during
/// the lookup. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// The requirement this resolution belongs to
    pub requirement: Requirement,
    /// Latest available version, absent when the lookup failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latest: Option<String>,
    /// Release timestamp of the latest version (JSON API only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub released_at: Option<DateTime<Utc>>,
    /// Changelog/homepage link when resolvable from index metadata
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub info_url: Option<String>,
    /// Classification of this requirement
    pub status: ResolutionStatus,
}

impl Resolution {
    /// Creates an up-to-date resolution
    pub fn up_to_date(requirement: Requirement, latest: impl Into<String>) -> Self {
        Self {
            requirement,
            latest: Some(latest.into()),
            released_at: None,
            info_url: None,
            status: ResolutionStatus::UpToDate,
        }
    }

    /// Creates an outdated resolution
    pub fn outdated(
        requirement: Requirement,
        latest: impl Into<String>,
        change: ChangeKind,
    ) -> Self {
        Self {
            requirement,
            latest: Some(latest.into()),
            released_at: None,
            info_url: None,
            status: ResolutionStatus::Outdated { change },
        }
    }

    /// Creates an unpinned resolution; `latest` is present only when the
    /// index was consulted for it (`--pin-warn` / `update --pin`)
    pub fn unpinned(requirement: Requirement, latest: Option<String>) -> Self {
        Self {
            requirement,
            latest,
            released_at: None,
            info_url: None,
            status: ResolutionStatus::Unpinned,
        }
    }

    /// Creates a lookup-failed resolution
    pub fn lookup_failed(requirement: Requirement, reason: impl Into<String>) -> Self {
        Self {
            requirement,
            latest: None,
            released_at: None,
            info_url: None,
            status: ResolutionStatus::LookupFailed {
                reason: reason.into(),
            },
        }
    }

    /// Attaches a release timestamp (builder pattern)
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }

    /// Attaches an info URL (builder pattern)
    pub fn with_info_url(mut self, url: impl Into<String>) -> Self {
        self.info_url = Some(url.into());
        self
    }

    /// Returns true when a newer version is available
    pub fn is_outdated(&self) -> bool {
        matches!(self.status, ResolutionStatus::Outdated { .. })
    }

    /// Returns true when the lookup failed
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ResolutionStatus::LookupFailed { .. })
    }

    /// Group rank for report ordering: outdated-major, outdated-minor,
    /// outdated-patch, unpinned, up-to-date, then lookup failures
    pub fn sort_rank(&self) -> u8 {
        match &self.status {
            ResolutionStatus::Outdated {
                change: ChangeKind::Major,
            } => 0,
            ResolutionStatus::Outdated {
                change: ChangeKind::Minor,
            } => 1,
            ResolutionStatus::Outdated {
                change: ChangeKind::Patch,
            } => 2,
            ResolutionStatus::Unpinned => 3,
            ResolutionStatus::UpToDate => 4,
            ResolutionStatus::LookupFailed { .. } => 5,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ResolutionStatus::UpToDate => {
                write!(f, "{}: up to date", self.requirement.name)
            }
            ResolutionStatus::Outdated { change } => write!(
                f,
                "{}: {} available ({})",
                self.requirement.name,
                self.latest.as_deref().unwrap_or("?"),
                change
            ),
            ResolutionStatus::Unpinned => write!(f, "{}: unpinned", self.requirement.name),
            ResolutionStatus::LookupFailed { reason } => {
                write!(f, "{}: lookup failed ({})", self.requirement.name, reason)
            }
        }
    }
}
