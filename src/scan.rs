//! Content-tree scanning.
//!
//! The fallback discovery path: walks the docs directory, parses each
//! document's front-matter, and turns documents flagged with `qr: true` into
//! [`Target`]s. Used only when the host index yields nothing (see
//! [`resolve`](crate::resolve)).
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                            # Content root
//! ├── intro.md                     # qr: true  → /docs/intro
//! ├── guides/
//! │   ├── setup.mdx                # qr: true  → /docs/guides/setup
//! │   └── deploy.md                # slug: /ship → /docs/ship
//! └── reference/
//!     └── api.md                   # no flag   → skipped
//! ```
//!
//! ## Derivation Rules
//!
//! - **slug**: front-matter `slug` with one leading `/` removed, or the path
//!   relative to the root with the extension stripped
//! - **permalink**: `route_base_path + "/" + slug`, slash runs collapsed
//! - **title**: front-matter `title`, or the last segment of the relative path
//!
//! Files are visited sorted by name so repeated builds produce the same
//! manifest order. A missing root is not an error; it just has no documents.
//!
//! Extensions match without regard to case: `Guide.MD` is a document, and
//! its slug drops the `.MD` the same way.

use crate::config::ParseErrorPolicy;
use crate::frontmatter::{self, FrontMatter, FrontMatterError, QR_FLAG};
use crate::types::{Discovery, SkippedDocument, Target};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid front-matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Markup extensions recognized as documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Scanner over a content directory.
#[derive(Debug, Clone)]
pub struct ContentScanner {
    pub root: PathBuf,
    /// URL prefix prepended to each slug, e.g. `/docs`.
    pub route_base_path: String,
    pub on_parse_error: ParseErrorPolicy,
}

impl ContentScanner {
    pub fn new(root: impl Into<PathBuf>, route_base_path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            route_base_path: route_base_path.into(),
            on_parse_error: ParseErrorPolicy::Fail,
        }
    }

    pub fn with_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.on_parse_error = policy;
        self
    }

    /// Walk the root and collect flagged documents as targets.
    pub fn scan(&self) -> Result<Discovery, ScanError> {
        let files = collect_documents(&self.root)?;
        let mut discovery = Discovery {
            considered: files.len(),
            ..Discovery::default()
        };

        for path in &files {
            let bytes = fs::read(path)?;
            let front_matter = match frontmatter::parse(&String::from_utf8_lossy(&bytes)) {
                Ok(fm) => fm,
                Err(source) => match self.on_parse_error {
                    ParseErrorPolicy::Fail => {
                        return Err(ScanError::FrontMatter {
                            path: path.clone(),
                            source,
                        });
                    }
                    ParseErrorPolicy::Skip => {
                        discovery.skipped.push(SkippedDocument {
                            path: rel_path(path, &self.root),
                            reason: source.to_string(),
                        });
                        continue;
                    }
                },
            };

            if front_matter.is_truthy(QR_FLAG) {
                discovery.targets.push(document_target(
                    path,
                    &self.root,
                    &front_matter,
                    &self.route_base_path,
                ));
            }
        }

        Ok(discovery)
    }
}

/// Recursively list document files under `root`, sorted by name per directory.
///
/// Returns an empty list when `root` does not exist or is not a directory.
pub fn collect_documents(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_document(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy())
        .is_some_and(|e| DOCUMENT_EXTENSIONS.iter().any(|d| e.eq_ignore_ascii_case(d)))
}

/// Path of `path` relative to `root`, joined with forward slashes.
fn rel_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path with the markup extension removed.
///
/// `guides/setup.mdx` → `guides/setup`
pub fn rel_path_no_ext(path: &Path, root: &Path) -> String {
    let rel = rel_path(path, root);
    if let Some((stem, ext)) = rel.rsplit_once('.')
        && !ext.contains('/')
        && DOCUMENT_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d))
    {
        return stem.to_string();
    }
    rel
}

/// Build the target for a flagged document.
pub fn document_target(
    path: &Path,
    root: &Path,
    front_matter: &FrontMatter,
    route_base_path: &str,
) -> Target {
    let rel_no_ext = rel_path_no_ext(path, root);

    let slug = front_matter
        .text("slug")
        .map(|s| s.strip_prefix('/').unwrap_or(&s).to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| rel_no_ext.clone());

    let title = front_matter.text("title").unwrap_or_else(|| {
        rel_no_ext
            .rsplit('/')
            .next()
            .unwrap_or(&rel_no_ext)
            .to_string()
    });

    Target::new(title, &format!("{route_base_path}/{slug}"))
}
