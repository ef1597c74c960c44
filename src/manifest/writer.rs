//! In-place requirements file rewriting
//!
//! Rewrites confirmed version updates back into the manifest. Only the
//! version token of the targeted line changes; comments, extras, markers,
//! spacing and every untouched line survive byte-for-byte.

use crate::domain::{Requirement, Specifier};
use crate::error::ManifestError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writer that applies version updates to a requirements file
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    path: PathBuf,
    /// File content split on '\n'; joining restores the input exactly
    lines: Vec<String>,
}

impl ManifestWriter {
    /// Load the manifest from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ManifestError::not_found(path));
        }
        let content =
            fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Ok(Self::from_content(path, &content))
    }

    /// Create a writer over in-memory content
    pub fn from_content(path: impl AsRef<Path>, content: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lines: content.split('\n').map(String::from).collect(),
        }
    }

    /// The manifest content in its current (possibly rewritten) state
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Rewrites the requirement's line to pin `new_version`.
    ///
    /// Pinned requirements get their version token replaced; unpinned
    /// requirements get `==new_version` inserted after the package name
    /// (and extras, when present).
    pub fn apply(&mut self, requirement: &Requirement, new_version: &str) -> Result<(), ManifestError> {
        let index = requirement
            .line
            .checked_sub(1)
            .filter(|i| *i < self.lines.len())
            .ok_or_else(|| {
                ManifestError::rewrite_error(
                    &requirement.name,
                    requirement.line,
                    "line number out of range",
                )
            })?;

        let rewritten = match &requirement.specifier {
            Some(specifier) => {
                rewrite_pinned(&self.lines[index], requirement, specifier, new_version)?
            }
            None => pin_unpinned(&self.lines[index], requirement, new_version)?,
        };

        self.lines[index] = rewritten;
        Ok(())
    }

    /// Writes the current content back to the manifest path
    pub fn write(&self) -> Result<(), ManifestError> {
        fs::write(&self.path, self.content())
            .map_err(|e| ManifestError::write_error(&self.path, e))
    }
}

/// Replaces the version token after the specifier operator, leaving all
/// surrounding bytes untouched
fn rewrite_pinned(
    line: &str,
    requirement: &Requirement,
    specifier: &Specifier,
    new_version: &str,
) -> Result<String, ManifestError> {
    let operator = specifier.kind.operator();
    let op_pos = line.find(operator).ok_or_else(|| {
        ManifestError::rewrite_error(
            &requirement.name,
            requirement.line,
            format!("specifier '{}' not found on line", operator),
        )
    })?;

    let after_op = op_pos + operator.len();
    let version_rel = line[after_op..].find(&specifier.version).ok_or_else(|| {
        ManifestError::rewrite_error(
            &requirement.name,
            requirement.line,
            format!("version '{}' not found on line", specifier.version),
        )
    })?;

    let start = after_op + version_rel;
    let end = start + specifier.version.len();
    Ok(format!("{}{}{}", &line[..start], new_version, &line[end..]))
}

/// Inserts `==new_version` directly after the package name (and extras)
fn pin_unpinned(
    line: &str,
    requirement: &Requirement,
    new_version: &str,
) -> Result<String, ManifestError> {
    let name_pos = line.find(&requirement.name).ok_or_else(|| {
        ManifestError::rewrite_error(
            &requirement.name,
            requirement.line,
            "package name not found on line",
        )
    })?;

    let mut insert_at = name_pos + requirement.name.len();
    if !requirement.extras.is_empty() {
        if let Some(close_rel) = line[insert_at..].find(']') {
            insert_at += close_rel + 1;
        }
    }

    Ok(format!(
        "{}=={}{}",
        &line[..insert_at],
        new_version,
        &line[insert_at..]
    ))
}
