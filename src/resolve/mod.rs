//! Version resolution for checked requirements
//!
//! This module provides:
//! - VersionInfo: one published version with its release date
//! - PyVersion: version parsing and ordering rules
//! - resolve(): classifies a requirement against the fetched version set
//!   (up to date, outdated with change magnitude, unpinned, lookup failed)

mod version;

pub use version::PyVersion;

use crate::domain::{ChangeKind, Requirement, Resolution};
use crate::error::RegistryError;
use crate::registry::PackageVersions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published version of a package, as reported by an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// The version string (e.g. "2.31.0")
    pub version: String,
    /// When this version was uploaded; the Simple API does not provide this
    pub released_at: Option<DateTime<Utc>>,
}

impl VersionInfo {
    /// Creates a new VersionInfo
    pub fn new(version: impl Into<String>, released_at: Option<DateTime<Utc>>) -> Self {
        Self {
            version: version.into(),
            released_at,
        }
    }

    /// Parses the version string, if it follows the standard form
    pub fn parsed(&self) -> Option<PyVersion> {
        PyVersion::parse(&self.version)
    }
}

/// Classifies the magnitude of the difference between two versions:
/// major when the leading release component differs, minor when the
/// second differs, patch for anything smaller (including pre-release-only
/// differences)
pub fn classify_change(current: &PyVersion, latest: &PyVersion) -> ChangeKind {
    if latest.release_component(0) != current.release_component(0) {
        ChangeKind::Major
    } else if latest.release_component(1) != current.release_component(1) {
        ChangeKind::Minor
    } else {
        ChangeKind::Patch
    }
}

/// Resolves a requirement from the outcome of an index lookup.
///
/// Lookup errors are downgraded to a lookup-failed resolution here; they
/// never abort the run.
pub fn resolve(
    requirement: Requirement,
    lookup: Result<PackageVersions, RegistryError>,
) -> Resolution {
    match lookup {
        Ok(pkg) => resolve_versions(requirement, pkg),
        Err(err) => Resolution::lookup_failed(requirement, err.to_string()),
    }
}

/// Resolves a requirement against a fetched version set
pub fn resolve_versions(requirement: Requirement, pkg: PackageVersions) -> Resolution {
    if pkg.versions.is_empty() {
        return Resolution::lookup_failed(requirement, "index listed no versions");
    }

    let parsed: Vec<(&VersionInfo, PyVersion)> = pkg
        .versions
        .iter()
        .filter_map(|info| info.parsed().map(|py| (info, py)))
        .collect();

    // Versions that fail to parse are excluded from comparison; with no
    // parseable version at all there is nothing to compare against
    if parsed.is_empty() {
        return Resolution::lookup_failed(requirement, "no parseable release versions");
    }

    let current = requirement.version().map(PyVersion::parse);
    let current_is_prerelease =
        matches!(&current, Some(Some(ver)) if ver.is_prerelease());

    // Stable releases only, unless the pin itself is a pre-release or the
    // package has never published a stable version
    let stable: Vec<&(&VersionInfo, PyVersion)> =
        parsed.iter().filter(|(_, py)| !py.is_prerelease()).collect();
    let pool: Vec<&(&VersionInfo, PyVersion)> = if current_is_prerelease || stable.is_empty() {
        parsed.iter().collect()
    } else {
        stable
    };

    let (latest_info, latest_py) = pool
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1))
        .expect("pool is non-empty");

    let resolution = match current {
        None => Resolution::unpinned(requirement, Some(latest_info.version.clone())),
        Some(None) => {
            let declared = requirement.version().unwrap_or_default().to_string();
            return Resolution::lookup_failed(
                requirement,
                format!("declared version '{}' is not a valid version", declared),
            );
        }
        Some(Some(current_py)) => {
            if current_py >= *latest_py {
                Resolution::up_to_date(requirement, latest_info.version.clone())
            } else {
                let change = classify_change(&current_py, latest_py);
                Resolution::outdated(requirement, latest_info.version.clone(), change)
            }
        }
    };

    let resolution = match latest_info.released_at {
        Some(at) => resolution.with_released_at(at),
        None => resolution,
    };
    match pkg.info_url {
        Some(url) => resolution.with_info_url(url),
        None => resolution,
    }
}
