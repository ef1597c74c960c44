//! Package index clients
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - PyPI JSON API client (full metadata in one request)
//! - PEP 503 Simple API client (versions recovered from file names)
//! - Fallback composition: JSON first, Simple on failure

mod client;
mod fallback;
mod json_api;
mod simple_api;

pub use client::HttpClient;
pub use fallback::FallbackIndex;
pub use json_api::{JsonIndexClient, DEFAULT_JSON_REPO};
pub use simple_api::{SimpleIndexClient, DEFAULT_SIMPLE_REPO};

use crate::error::RegistryError;
use crate::resolve::VersionInfo;
use async_trait::async_trait;

/// The versions published for one package, as returned by an index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersions {
    /// All published versions; order is not guaranteed by any index
    pub versions: Vec<VersionInfo>,
    /// Changelog/homepage link, when the index exposes one (JSON API only)
    pub info_url: Option<String>,
}

/// Trait for package index clients
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Human-readable name of the index, used in error messages
    fn index_name(&self) -> &'static str;

    /// Fetch the published versions for a package
    async fn fetch_versions(&self, package: &str) -> Result<PackageVersions, RegistryError>;
}

/// Index endpoint selection from CLI options
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL for the JSON API
    pub json_repo: String,
    /// Base URL for the Simple API
    pub simple_repo: String,
    /// Use only the JSON API (no fallback)
    pub json_only: bool,
    /// Use only the Simple API
    pub simple_only: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            json_repo: DEFAULT_JSON_REPO.to_string(),
            simple_repo: DEFAULT_SIMPLE_REPO.to_string(),
            json_only: false,
            simple_only: false,
        }
    }
}

/// Create the index client described by the configuration: a single API
/// when restricted, otherwise JSON with Simple fallback
pub fn build_index(config: &IndexConfig, client: HttpClient) -> Box<dyn IndexClient> {
    let json = JsonIndexClient::new(client.clone(), &config.json_repo);
    let simple = SimpleIndexClient::new(client, &config.simple_repo);

    if config.json_only {
        Box::new(json)
    } else if config.simple_only {
        Box::new(simple)
    } else {
        Box::new(FallbackIndex::new(Box::new(json), Box::new(simple)))
    }
}
