//! Shared types passed between pipeline stages.
//!
//! A [`Target`] is what both discovery paths (host index and content scan)
//! produce and what the manifest builder consumes.

use serde::{Deserialize, Serialize};

/// A page selected for QR generation.
///
/// The permalink is always normalized: exactly one leading slash and no runs
/// of slashes. Construct through [`Target::new`] to keep that guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub title: String,
    pub permalink: String,
}

impl Target {
    pub fn new(title: impl Into<String>, permalink: &str) -> Self {
        Self {
            title: title.into(),
            permalink: normalize_permalink(permalink),
        }
    }
}

/// Collapse every run of `/` to one and force a leading slash.
///
/// - `"docs//intro"` → `"/docs/intro"`
/// - `"//docs/intro/"` → `"/docs/intro/"`
/// - `""` → `"/"`
pub fn normalize_permalink(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    out.push('/');
    for c in raw.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Which discovery path produced the targets of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetOrigin {
    /// The host's already-loaded document index.
    SiteIndex,
    /// Direct scan of the content directory.
    ContentScan,
}

impl std::fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetOrigin::SiteIndex => write!(f, "site index"),
            TargetOrigin::ContentScan => write!(f, "content scan"),
        }
    }
}

/// Result of running one discovery path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    /// Qualifying targets, in discovery order.
    pub targets: Vec<Target>,
    /// Number of documents examined (flagged or not).
    pub considered: usize,
    /// Documents left out because their front-matter could not be parsed.
    pub skipped: Vec<SkippedDocument>,
}

/// A document dropped from discovery, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_slash_runs() {
        assert_eq!(normalize_permalink("/docs//guides///setup"), "/docs/guides/setup");
    }

    #[test]
    fn normalize_adds_leading_slash() {
        assert_eq!(normalize_permalink("docs/intro"), "/docs/intro");
    }

    #[test]
    fn normalize_keeps_trailing_slash() {
        assert_eq!(normalize_permalink("//docs/intro/"), "/docs/intro/");
    }

    #[test]
    fn normalize_empty_is_root() {
        assert_eq!(normalize_permalink(""), "/");
        assert_eq!(normalize_permalink("///"), "/");
    }

    #[test]
    fn target_new_normalizes() {
        let t = Target::new("Intro", "/docs//intro");
        assert_eq!(t.permalink, "/docs/intro");
        assert_eq!(t.title, "Intro");
    }

    #[test]
    fn origin_display() {
        assert_eq!(TargetOrigin::SiteIndex.to_string(), "site index");
        assert_eq!(TargetOrigin::ContentScan.to_string(), "content scan");
    }
}
