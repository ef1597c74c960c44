//! Requirements file parsing and rewriting
//!
//! This module provides:
//! - Tagged-line grammar: every line is classified before any field
//!   extraction (requirement, comment, blank, directive, unsupported,
//!   invalid)
//! - Requirement line parser tolerating extras, markers and comments
//! - ManifestWriter: in-place version rewrites that keep every other
//!   byte of the file intact

mod line;
mod parser;
mod writer;

pub use line::{Line, LineKind};
pub use parser::parse;
pub use writer::ManifestWriter;
