//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: requirements file cannot be read or written (fatal)
//! - RegistryError: package index communication failures (per-package,
//!   downgraded to a lookup-failed status by the orchestrator)
//! - ConfigError: conflicting CLI options (fatal)

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Requirements file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package index related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to requirements file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Requirements file not found
    #[error("requirements file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read requirements file
    #[error("failed to read requirements file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write requirements file
    #[error("failed to write requirements file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A confirmed update could not be applied to the stored line
    #[error("could not rewrite line {line} for '{package}': {message}")]
    RewriteError {
        package: String,
        line: usize,
        message: String,
    },
}

/// Errors related to package index communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in the index
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response from the index
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// The index responded but listed no usable release versions
    #[error("no usable release versions for '{package}' in {registry}")]
    NoUsableVersions { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new RewriteError
    pub fn rewrite_error(
        package: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::RewriteError {
            package: package.into(),
            line,
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NoUsableVersions error
    pub fn no_usable_versions(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::NoUsableVersions {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/requirements.txt");
        let msg = format!("{}", err);
        assert!(msg.contains("requirements file not found"));
        assert!(msg.contains("requirements.txt"));
    }

    #[test]
    fn test_manifest_error_rewrite() {
        let err = ManifestError::rewrite_error("requests", 12, "version token not found");
        let msg = format!("{}", err);
        assert!(msg.contains("line 12"));
        assert!(msg.contains("requests"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI JSON API");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("PyPI JSON API"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI JSON API", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("PyPI Simple API");
        let msg = format!("{}", err);
        assert!(msg.contains("rate limit exceeded"));
        assert!(msg.contains("PyPI Simple API"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("flask", "PyPI JSON API");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("flask"));
    }

    #[test]
    fn test_registry_error_no_usable_versions() {
        let err = RegistryError::no_usable_versions("leftpad", "PyPI Simple API");
        let msg = format!("{}", err);
        assert!(msg.contains("no usable release versions"));
        assert!(msg.contains("leftpad"));
    }

    #[test]
    fn test_config_error_conflicting_options() {
        let err = ConfigError::ConflictingOptions {
            message: "--simple-only and --json-only cannot both be set".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("conflicting options"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let manifest_err = ManifestError::not_found("/path");
        let app_err: AppError = manifest_err.into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("requirements file not found"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let registry_err = RegistryError::package_not_found("pkg", "PyPI JSON API");
        let app_err: AppError = registry_err.into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("package 'pkg' not found"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
