//! Fallback composition over two index clients
//!
//! Wraps a primary and a secondary client behind the same IndexClient
//! contract: the secondary is consulted only when the primary fails, for
//! whatever reason (network error, package missing, malformed response).

use crate::error::RegistryError;
use crate::registry::{IndexClient, PackageVersions};
use async_trait::async_trait;

/// Index client that falls back to a second client on failure
pub struct FallbackIndex {
    primary: Box<dyn IndexClient>,
    secondary: Box<dyn IndexClient>,
}

impl FallbackIndex {
    /// Create a new fallback composition
    pub fn new(primary: Box<dyn IndexClient>, secondary: Box<dyn IndexClient>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl IndexClient for FallbackIndex {
    fn index_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_versions(&self, package: &str) -> Result<PackageVersions, RegistryError> {
        let primary_err = match self.primary.fetch_versions(package).await {
            Ok(versions) => return Ok(versions),
            Err(err) => err,
        };

        // Report the secondary's failure but keep the primary's for
        // context; both endpoints failing is the interesting case
        self.secondary.fetch_versions(package).await.map_err(|err| {
            RegistryError::network_error(
                package,
                self.index_name(),
                format!("{}; after {}", err, primary_err),
            )
        })
    }
}
