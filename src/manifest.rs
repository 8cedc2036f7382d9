//! The JSON manifest consumed by the gallery page and embed widget.
//!
//! ```json
//! [
//!   {
//!     "title": "Intro",
//!     "url": "https://example.com/docs/intro",
//!     "file": "/qr/docs_intro.png"
//!   }
//! ]
//! ```
//!
//! Rewritten in full on every build. An empty build writes `[]`.

use crate::files::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default manifest file name inside the output directory.
pub const MANIFEST_FILENAME: &str = "_manifest.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    /// Absolute page URL encoded in the image.
    pub url: String,
    /// Site-relative image path.
    pub file: String,
}

impl ManifestEntry {
    /// Case-insensitive substring match on title, URL or file.
    ///
    /// An empty (or whitespace) query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || [&self.title, &self.url, &self.file]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the manifest at `path` in one step.
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        write_atomic(path, self.to_json()?.as_bytes())?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Entries matching `query`, in manifest order.
    pub fn filter<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a ManifestEntry> + 'a {
        self.entries.iter().filter(move |e| e.matches(query))
    }
}
