//! Version parsing and ordering
//!
//! Handles the version forms published on Python package indexes:
//! - Plain releases: `1.2.3`, `2024.1`, `1.0` (compares equal to `1.0.0`)
//! - Pre-releases: `1.2.0a1`, `1.2.0b2`, `1.2.0rc1` (sort below the final)
//! - Dev and post releases: `1.2.0.dev3` (below pre-releases),
//!   `1.2.0.post1` (above the final)
//! - Epochs (`1!2.0`) and local segments (`1.2.0+cpu`, ignored for ordering)

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^v?
          (?:(?P<epoch>\d+)!)?
          (?P<release>\d+(?:\.\d+)*)
          (?:[._-]?(?P<pre_tag>a|b|c|rc|alpha|beta|pre|preview)[._-]?(?P<pre_n>\d+)?)?
          (?P<post>[._-]?(?:post|rev)[._-]?(?P<post_n>\d+)?)?
          (?P<dev>[._-]?dev[._-]?(?P<dev_n>\d+)?)?
          (?:\+[a-z0-9]+(?:[._-][a-z0-9]+)*)?$",
    )
    .expect("version regex is valid")
});

/// Pre-release phase, ordered alpha < beta < release candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PreTag {
    Alpha,
    Beta,
    Rc,
}

impl PreTag {
    fn from_str(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreTag::Alpha,
            "b" | "beta" => PreTag::Beta,
            // "c", "pre" and "preview" are spelling variants of "rc"
            _ => PreTag::Rc,
        }
    }
}

/// A parsed package version
///
/// Ordering follows the published-version conventions: release components
/// compare numerically with missing components treated as zero, so `1.2`
/// equals `1.2.0` and `1.02` equals `1.2`.
#[derive(Debug, Clone)]
pub struct PyVersion {
    raw: String,
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreTag, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
}

impl PyVersion {
    /// Parses a version string; returns None for anything that does not
    /// follow the standard form
    pub fn parse(s: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(s.trim())?;

        let epoch = caps
            .name("epoch")
            .map_or(Some(0), |m| m.as_str().parse().ok())?;

        let release = caps
            .name("release")?
            .as_str()
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<u64>>>()?;

        let pre = caps.name("pre_tag").map(|tag| {
            let n = caps
                .name("pre_n")
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            (PreTag::from_str(tag.as_str()), n)
        });

        // A bare marker without a number ("1.0.post", "1.0.dev") counts as 0
        let post = caps.name("post").map(|_| {
            caps.name("post_n")
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        });

        let dev = caps.name("dev").map(|_| {
            caps.name("dev_n")
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        });

        Some(Self {
            raw: s.trim().to_string(),
            epoch,
            release,
            pre,
            post,
            dev,
        })
    }

    /// The version string as published
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the nth release component, zero when absent
    pub fn release_component(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Returns true for pre-release and dev versions
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    fn release_cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            match self.release_component(i).cmp(&other.release_component(i)) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    // Phase ordering within one release number:
    // dev < pre-release (dev of a pre sorts below the pre) < final < post
    fn phase_key(&self) -> (u8, u64, u64, u64) {
        let dev_key = self.dev.unwrap_or(u64::MAX);
        match (&self.pre, &self.post) {
            (Some((tag, n)), _) => (1, *tag as u64, *n, dev_key),
            (None, Some(post)) => (3, *post, 0, dev_key),
            (None, None) if self.dev.is_some() => (0, 0, 0, dev_key),
            (None, None) => (2, 0, 0, dev_key),
        }
    }
}

impl PartialEq for PyVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PyVersion {}

impl PartialOrd for PyVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PyVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.release_cmp(other))
            .then_with(|| self.phase_key().cmp(&other.phase_key()))
    }
}

impl fmt::Display for PyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
