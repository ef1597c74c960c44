//! PyPI JSON API client
//!
//! A single request returns the full package metadata.
//! API endpoint: `{json_repo}/{package}/json`

use crate::error::RegistryError;
use crate::registry::{HttpClient, IndexClient, PackageVersions};
use crate::resolve::VersionInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Default base URL for the JSON API
pub const DEFAULT_JSON_REPO: &str = "https://pypi.org/pypi";

/// JSON API client
pub struct JsonIndexClient {
    client: HttpClient,
    base_url: String,
}

/// Package metadata response
#[derive(Debug, Deserialize)]
struct JsonResponse {
    info: PackageInfo,
    /// Release files keyed by version
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

/// The `info` block of the metadata response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageInfo {
    version: Option<String>,
    project_urls: Option<HashMap<String, Option<String>>>,
    docs_url: Option<String>,
    project_url: Option<String>,
    home_page: Option<String>,
    package_url: Option<String>,
}

/// One uploaded file of a release
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time_iso_8601: Option<String>,
}

impl JsonIndexClient {
    /// Create a new JSON API client against the given base URL
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the metadata URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package)
    }
}

/// Picks the most useful project link: an explicit changelog when listed,
/// otherwise the docs or project page
fn resolve_info_url(info: &PackageInfo) -> Option<String> {
    if let Some(urls) = &info.project_urls {
        for key in ["Changelog", "Changes"] {
            if let Some(Some(url)) = urls.get(key) {
                if !url.is_empty() {
                    return Some(url.clone());
                }
            }
        }
    }

    [
        &info.docs_url,
        &info.project_url,
        &info.home_page,
        &info.package_url,
    ]
    .into_iter()
    .flatten()
    .find(|url| !url.is_empty())
    .cloned()
}

#[async_trait]
impl IndexClient for JsonIndexClient {
    fn index_name(&self) -> &'static str {
        "PyPI JSON API"
    }

    async fn fetch_versions(&self, package: &str) -> Result<PackageVersions, RegistryError> {
        let url = self.build_url(package);
        let response: JsonResponse = self
            .client
            .get_json(&url, package, self.index_name())
            .await?;

        let mut versions = Vec::new();

        for (version, release_files) in response.releases {
            // Earliest upload time across the release's files
            let mut earliest: Option<DateTime<Utc>> = None;
            for file in release_files {
                if let Some(time_str) = &file.upload_time_iso_8601 {
                    if let Ok(time) = time_str.parse::<DateTime<Utc>>() {
                        earliest = Some(match earliest {
                            Some(current) if current < time => current,
                            _ => time,
                        });
                    }
                }
            }
            versions.push(VersionInfo::new(version, earliest));
        }

        // Some mirrors omit the releases map; the advertised latest
        // version still lets a check proceed
        if versions.is_empty() {
            if let Some(version) = response.info.version.clone() {
                versions.push(VersionInfo::new(version, None));
            }
        }

        if versions.is_empty() {
            return Err(RegistryError::no_usable_versions(package, self.index_name()));
        }

        Ok(PackageVersions {
            versions,
            info_url: resolve_info_url(&response.info),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> JsonIndexClient {
        JsonIndexClient::new(HttpClient::new().unwrap(), "https://pypi.org/pypi")
    }

    #[test]
    fn test_index_name() {
        assert_eq!(client().index_name(), "PyPI JSON API");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            client().build_url("requests"),
            "https://pypi.org/pypi/requests/json"
        );
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let client = JsonIndexClient::new(HttpClient::new().unwrap(), "https://pypi.org/pypi/");
        assert_eq!(
            client.build_url("flask-restful"),
            "https://pypi.org/pypi/flask-restful/json"
        );
    }

    #[test]
    fn test_resolve_info_url_prefers_changelog() {
        let mut urls = HashMap::new();
        urls.insert(
            "Changelog".to_string(),
            Some("https://example.com/changelog".to_string()),
        );
        urls.insert(
            "Homepage".to_string(),
            Some("https://example.com".to_string()),
        );
        let info = PackageInfo {
            project_urls: Some(urls),
            home_page: Some("https://example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_info_url(&info).as_deref(),
            Some("https://example.com/changelog")
        );
    }

    #[test]
    fn test_resolve_info_url_changes_key() {
        let mut urls = HashMap::new();
        urls.insert(
            "Changes".to_string(),
            Some("https://example.com/changes".to_string()),
        );
        let info = PackageInfo {
            project_urls: Some(urls),
            ..Default::default()
        };
        assert_eq!(
            resolve_info_url(&info).as_deref(),
            Some("https://example.com/changes")
        );
    }

    #[test]
    fn test_resolve_info_url_falls_back_to_home_page() {
        let info = PackageInfo {
            home_page: Some("https://flask.palletsprojects.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_info_url(&info).as_deref(),
            Some("https://flask.palletsprojects.com")
        );
    }

    #[test]
    fn test_resolve_info_url_skips_empty_strings() {
        let info = PackageInfo {
            home_page: Some(String::new()),
            package_url: Some("https://pypi.org/project/x/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_info_url(&info).as_deref(),
            Some("https://pypi.org/project/x/")
        );
    }

    #[test]
    fn test_resolve_info_url_none_available() {
        assert!(resolve_info_url(&PackageInfo::default()).is_none());
    }

    #[test]
    fn test_parse_response_releases() {
        let raw = r#"{
            "info": {"version": "2.31.0", "home_page": "https://requests.readthedocs.io"},
            "releases": {
                "2.25.0": [{"upload_time_iso_8601": "2020-11-28T15:00:00Z"}],
                "2.31.0": [
                    {"upload_time_iso_8601": "2023-05-22T10:00:00Z"},
                    {"upload_time_iso_8601": "2023-05-22T09:00:00Z"}
                ]
            }
        }"#;
        let response: JsonResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.releases.len(), 2);
        assert_eq!(response.info.version.as_deref(), Some("2.31.0"));
    }

    #[test]
    fn test_parse_response_null_project_urls() {
        // PyPI serves "project_urls": null for some packages
        let raw = r#"{"info": {"version": "1.0", "project_urls": null}, "releases": {}}"#;
        let response: JsonResponse = serde_json::from_str(raw).unwrap();
        assert!(response.info.project_urls.is_none());
    }
}
