//! Shared test utilities for the docs-qr test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let docs = tmp.path().join("docs");
//! write_doc(&docs, "extra.md", "title: Extra\nqr: true");
//!
//! let discovery = ContentScanner::new(&docs, "/docs").scan().unwrap();
//! assert!(discovery.targets.contains(&target("Extra", "/docs/extra")));
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::types::Target;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// Write a document under `root` with the given front-matter body.
///
/// Parent directories are created as needed.
pub fn write_doc(root: &Path, rel: &str, front_matter: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("---\n{front_matter}\n---\n\n# Body\n")).unwrap();
    path
}

/// Shorthand for [`Target::new`].
pub fn target(title: &str, permalink: &str) -> Target {
    Target::new(title, permalink)
}
