//! PEP 503 Simple API client
//!
//! The Simple API serves one page per project listing its uploaded files
//! as HTML anchors. Version strings have to be recovered from the file
//! names; the page offers no metadata beyond that, so no release dates
//! and no info URL.

use crate::error::RegistryError;
use crate::registry::{HttpClient, IndexClient, PackageVersions};
use crate::resolve::VersionInfo;
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Default base URL for the Simple API
pub const DEFAULT_SIMPLE_REPO: &str = "https://pypi.org/simple";

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a[^>]*>([^<]+)</a>").expect("anchor regex is valid"));

/// Simple API client
pub struct SimpleIndexClient {
    client: HttpClient,
    base_url: String,
}

impl SimpleIndexClient {
    /// Create a new Simple API client against the given base URL
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the project page URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/", self.base_url, package)
    }
}

/// Extracts the version from an uploaded file name.
///
/// Wheels and eggs follow `distribution-version-...` with a normalized
/// distribution name, so the version is the second dash-separated field.
/// Sdists are `name-version.<ext>` where the name itself may contain
/// dashes, so the version is everything after the last dash.
fn version_from_filename(filename: &str) -> Option<String> {
    let filename = filename.trim();
    let lower = filename.to_ascii_lowercase();

    if lower.ends_with(".whl") || lower.ends_with(".egg") {
        let stem = &filename[..filename.len() - 4];
        let mut parts = stem.split('-');
        let _distribution = parts.next()?;
        return parts.next().filter(|v| !v.is_empty()).map(str::to_string);
    }

    for ext in [".tar.gz", ".tgz", ".tar.bz2", ".tar.xz", ".zip"] {
        if lower.ends_with(ext) {
            let stem = &filename[..filename.len() - ext.len()];
            let (_, version) = stem.rsplit_once('-')?;
            if version.is_empty() {
                return None;
            }
            return Some(version.to_string());
        }
    }

    None
}

#[async_trait]
impl IndexClient for SimpleIndexClient {
    fn index_name(&self) -> &'static str {
        "PyPI Simple API"
    }

    async fn fetch_versions(&self, package: &str) -> Result<PackageVersions, RegistryError> {
        let url = self.build_url(package);
        let page = self
            .client
            .get_text(&url, package, self.index_name())
            .await?;

        // File listing order is not meaningful; dedupe and keep the set
        // deterministic
        let versions: BTreeSet<String> = ANCHOR_RE
            .captures_iter(&page)
            .filter_map(|caps| version_from_filename(&caps[1]))
            .collect();

        if versions.is_empty() {
            return Err(RegistryError::no_usable_versions(package, self.index_name()));
        }

        Ok(PackageVersions {
            versions: versions
                .into_iter()
                .map(|v| VersionInfo::new(v, None))
                .collect(),
            info_url: None,
        })
    }
}
