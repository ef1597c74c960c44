//! Requirements file line parser
//!
//! Classifies each line before extracting fields, so the rest of the
//! code never needs ad-hoc string splitting. Handles:
//! - Comments and blank lines
//! - Option/include directives (`-r`, `--index-url`, `-e`, ...)
//! - Requirement lines with extras (`requests[socks]`), environment
//!   markers (`; python_version < "3.11"`) and trailing comments
//! - The supported specifier operators `==` and `>=`; anything else is
//!   reported as unsupported rather than guessed at

use crate::domain::{Requirement, Specifier, SpecifierKind};
use crate::manifest::{Line, LineKind};
use regex::Regex;
use std::sync::LazyLock;

static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^\s*
          (?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)
          \s*
          (?P<extras>\[[^\]]*\])?
          \s*
          (?P<spec>[^;\#]*?)
          \s*
          (?:;\s*(?P<marker>[^\#]*?))?
          \s*
          (?:\#.*)?$",
    )
    .expect("requirement regex is valid")
});

static SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<op>==|>=)\s*(?P<version>[0-9A-Za-z][0-9A-Za-z._+!-]*)$")
        .expect("specifier regex is valid")
});

/// Parses requirements file content into classified lines
pub fn parse(content: &str) -> Vec<Line> {
    content
        .lines()
        .enumerate()
        .map(|(index, raw)| parse_line(raw, index + 1))
        .collect()
}

/// Classifies and parses a single line
pub fn parse_line(raw: &str, number: usize) -> Line {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Line::new(number, raw, LineKind::Blank);
    }

    if trimmed.starts_with('#') {
        return Line::new(number, raw, LineKind::Comment);
    }

    // Includes of other files and every other pip option are not
    // dependency declarations
    if trimmed.starts_with('-') {
        return Line::new(number, raw, LineKind::Directive);
    }

    if trimmed.starts_with("./")
        || trimmed.starts_with("../")
        || trimmed.starts_with('/')
        || trimmed.starts_with("~/")
    {
        return Line::new(
            number,
            raw,
            LineKind::Unsupported {
                name: None,
                reason: "local files unsupported".to_string(),
            },
        );
    }

    if trimmed.contains("://") {
        return Line::new(
            number,
            raw,
            LineKind::Unsupported {
                name: leading_name(trimmed),
                reason: "package URLs unsupported".to_string(),
            },
        );
    }

    let Some(caps) = REQUIREMENT_RE.captures(raw) else {
        return Line::new(
            number,
            raw,
            LineKind::Invalid {
                message: "could not parse line".to_string(),
            },
        );
    };

    let name = caps["name"].to_string();
    let spec_expr = caps.name("spec").map_or("", |m| m.as_str()).trim();

    let specifier = match parse_specifier(spec_expr) {
        Ok(specifier) => specifier,
        Err(reason) => {
            return Line::new(
                number,
                raw,
                LineKind::Unsupported {
                    name: Some(name),
                    reason,
                },
            );
        }
    };

    let mut requirement = Requirement::new(name, specifier, number);

    if let Some(extras) = caps.name("extras") {
        let extras = extras
            .as_str()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|extra| extra.trim().to_string())
            .filter(|extra| !extra.is_empty())
            .collect();
        requirement = requirement.with_extras(extras);
    }

    if let Some(marker) = caps.name("marker") {
        let marker = marker.as_str().trim();
        if !marker.is_empty() {
            requirement = requirement.with_marker(marker);
        }
    }

    Line::new(number, raw, LineKind::Requirement(requirement))
}

/// Parses the specifier expression of a requirement line; Err carries
/// the skip reason for unsupported forms
fn parse_specifier(expr: &str) -> Result<Option<Specifier>, String> {
    if expr.is_empty() {
        return Ok(None);
    }

    if expr.contains(',') {
        return Err("unsupported version spec (multiple clauses)".to_string());
    }

    let Some(caps) = SPEC_RE.captures(expr) else {
        return Err("unsupported version spec".to_string());
    };

    let kind = match &caps["op"] {
        "==" => SpecifierKind::Exact,
        _ => SpecifierKind::AtLeast,
    };
    let version = caps["version"].to_string();

    Ok(Some(Specifier::new(
        kind,
        format!("{}{}", kind.operator(), version),
        version,
    )))
}

/// Best-effort package name from the front of an unparseable line
fn leading_name(line: &str) -> Option<String> {
    let token = line.split([' ', '@', '=']).next()?.trim();
    let valid = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    valid.then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(raw: &str) -> Requirement {
        match parse_line(raw, 1).kind {
            LineKind::Requirement(req) => req,
            other => panic!("expected requirement for '{}', got {:?}", raw, other),
        }
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("", 1).kind, LineKind::Blank);
        assert_eq!(parse_line("   \t", 2).kind, LineKind::Blank);
    }

    #[test]
    fn test_comment_line() {
        assert_eq!(parse_line("# production deps", 1).kind, LineKind::Comment);
        assert_eq!(parse_line("   # indented", 1).kind, LineKind::Comment);
    }

    #[test]
    fn test_directive_lines() {
        assert_eq!(parse_line("-r base.txt", 1).kind, LineKind::Directive);
        assert_eq!(
            parse_line("--requirement base.txt", 1).kind,
            LineKind::Directive
        );
        assert_eq!(
            parse_line("--index-url https://example.com/simple", 1).kind,
            LineKind::Directive
        );
        assert_eq!(parse_line("-e .", 1).kind, LineKind::Directive);
    }

    #[test]
    fn test_pinned_requirement() {
        let req = requirement("requests==2.25.0");
        assert_eq!(req.name, "requests");
        assert_eq!(req.version(), Some("2.25.0"));
        assert_eq!(req.specifier.as_ref().unwrap().kind, SpecifierKind::Exact);
    }

    #[test]
    fn test_at_least_requirement() {
        let req = requirement("click>=8.0");
        assert_eq!(req.name, "click");
        assert_eq!(req.version(), Some("8.0"));
        assert_eq!(req.specifier.as_ref().unwrap().kind, SpecifierKind::AtLeast);
    }

    #[test]
    fn test_unpinned_requirement() {
        let req = requirement("flask");
        assert_eq!(req.name, "flask");
        assert!(req.is_unpinned());
    }

    #[test]
    fn test_requirement_with_spaces_around_operator() {
        let req = requirement("requests == 2.25.0");
        assert_eq!(req.version(), Some("2.25.0"));
    }

    #[test]
    fn test_requirement_with_extras() {
        let req = requirement("requests[socks,security]==2.25.0");
        assert_eq!(req.name, "requests");
        assert_eq!(req.extras, vec!["socks", "security"]);
        assert_eq!(req.version(), Some("2.25.0"));
    }

    #[test]
    fn test_requirement_with_marker() {
        let req = requirement("pywin32==306; sys_platform == \"win32\"");
        assert_eq!(req.name, "pywin32");
        assert_eq!(req.version(), Some("306"));
        assert_eq!(req.marker.as_deref(), Some("sys_platform == \"win32\""));
    }

    #[test]
    fn test_unpinned_requirement_with_marker() {
        let req = requirement("uvloop; sys_platform != \"win32\"");
        assert_eq!(req.name, "uvloop");
        assert!(req.is_unpinned());
        assert_eq!(req.marker.as_deref(), Some("sys_platform != \"win32\""));
    }

    #[test]
    fn test_requirement_with_trailing_comment() {
        let req = requirement("requests==2.25.0  # keep in sync with api client");
        assert_eq!(req.name, "requests");
        assert_eq!(req.version(), Some("2.25.0"));
    }

    #[test]
    fn test_requirement_line_number() {
        let lines = parse("# header\nflask\nrequests==2.25.0\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].requirement().unwrap().line, 2);
        assert_eq!(lines[2].requirement().unwrap().line, 3);
    }

    #[test]
    fn test_multiple_clauses_unsupported() {
        let line = parse_line("django>=3.2,<4.0", 1);
        match line.kind {
            LineKind::Unsupported { name, reason } => {
                assert_eq!(name.as_deref(), Some("django"));
                assert!(reason.contains("multiple clauses"));
            }
            other => panic!("expected unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_other_operators_unsupported() {
        for raw in ["torch~=2.0.0", "numpy<2", "scipy>1.0", "pandas!=1.5.0", "attrs<=23.0"] {
            match parse_line(raw, 1).kind {
                LineKind::Unsupported { reason, .. } => {
                    assert!(reason.contains("unsupported version spec"), "{}", raw);
                }
                other => panic!("expected unsupported for '{}', got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_wildcard_spec_unsupported() {
        assert!(matches!(
            parse_line("requests==2.*", 1).kind,
            LineKind::Unsupported { .. }
        ));
    }

    #[test]
    fn test_url_requirement_unsupported() {
        let line = parse_line("requests @ https://example.com/requests.tar.gz", 1);
        match line.kind {
            LineKind::Unsupported { name, reason } => {
                assert_eq!(name.as_deref(), Some("requests"));
                assert!(reason.contains("URLs"));
            }
            other => panic!("expected unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_vcs_url_unsupported() {
        assert!(matches!(
            parse_line("git+https://github.com/pallets/flask.git", 1).kind,
            LineKind::Unsupported { .. }
        ));
    }

    #[test]
    fn test_local_path_unsupported() {
        let line = parse_line("./vendored/mylib", 1);
        match line.kind {
            LineKind::Unsupported { reason, .. } => assert!(reason.contains("local files")),
            other => panic!("expected unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_line_invalid() {
        let line = parse_line("=== ???", 1);
        assert!(matches!(line.kind, LineKind::Invalid { .. }));
    }

    #[test]
    fn test_dotted_and_dashed_names() {
        assert_eq!(requirement("zope.interface==6.0").name, "zope.interface");
        assert_eq!(requirement("typing_extensions==4.8.0").name, "typing_extensions");
        assert_eq!(requirement("python-dateutil>=2.8").name, "python-dateutil");
    }

    #[test]
    fn test_parse_whole_file() {
        let content = "\
# deps
flask
requests==2.25.0

-r extra.txt
django>=3.2,<4.0
";
        let lines = parse(content);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].kind, LineKind::Comment);
        assert!(matches!(lines[1].kind, LineKind::Requirement(_)));
        assert!(matches!(lines[2].kind, LineKind::Requirement(_)));
        assert_eq!(lines[3].kind, LineKind::Blank);
        assert_eq!(lines[4].kind, LineKind::Directive);
        assert!(matches!(lines[5].kind, LineKind::Unsupported { .. }));
    }
}
