//! Requirement and version specifier types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of version specifier attached to a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecifierKind {
    /// Exact pin (`==1.2.3`)
    Exact,
    /// Lower bound (`>=1.2.3`)
    AtLeast,
}

impl SpecifierKind {
    /// Returns the operator as it appears in the requirements file
    pub fn operator(&self) -> &'static str {
        match self {
            SpecifierKind::Exact => "==",
            SpecifierKind::AtLeast => ">=",
        }
    }
}

/// A version constraint with its original string representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifier {
    /// The kind of constraint
    pub kind: SpecifierKind,
    /// The raw specifier text as it appears in the manifest (e.g. `==1.2.3`)
    pub raw: String,
    /// The declared version (without the operator)
    pub version: String,
}

impl Specifier {
    /// Creates a new Specifier
    pub fn new(kind: SpecifierKind, raw: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            version: version.into(),
        }
    }

    /// Creates an exact pin specifier for the given version
    pub fn exact(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            kind: SpecifierKind::Exact,
            raw: format!("=={}", version),
            version,
        }
    }

    /// Formats this specifier with a new version, keeping the operator
    pub fn format_updated(&self, new_version: &str) -> String {
        format!("{}{}", self.kind.operator(), new_version)
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Represents one dependency declared in the requirements file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Package name as written in the manifest
    pub name: String,
    /// Extras listed in brackets (e.g. `requests[socks]`)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extras: Vec<String>,
    /// Version constraint, or None when the requirement is unpinned
    pub specifier: Option<Specifier>,
    /// Environment marker following `;`, preserved verbatim
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub marker: Option<String>,
    /// 1-based line number in the source manifest
    pub line: usize,
}

impl Requirement {
    /// Creates a new requirement
    pub fn new(name: impl Into<String>, specifier: Option<Specifier>, line: usize) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            specifier,
            marker: None,
            line,
        }
    }

    /// Sets the extras list (builder pattern)
    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    /// Sets the environment marker (builder pattern)
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Package name normalized for index lookups (PEP 503: lowercase,
    /// runs of `-`, `_`, `.` collapsed to a single `-`)
    pub fn normalized_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut prev_sep = false;
        for c in self.name.chars() {
            if c == '-' || c == '_' || c == '.' {
                if !prev_sep {
                    out.push('-');
                }
                prev_sep = true;
            } else {
                out.push(c.to_ascii_lowercase());
                prev_sep = false;
            }
        }
        out
    }

    /// Returns the declared version, if any
    pub fn version(&self) -> Option<&str> {
        self.specifier.as_ref().map(|s| s.version.as_str())
    }

    /// Returns true when the requirement carries no version constraint
    pub fn is_unpinned(&self) -> bool {
        self.specifier.is_none()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            Some(spec) => write!(f, "{}{}", self.name, spec),
            None => write!(f, "{}", self.name),
        }
    }
}
