//! Host document index adapter.
//!
//! When the host site generator has already loaded its docs, it can export
//! them as JSON. Reading that export is the preferred way to find targets:
//! permalinks and titles are the host's own, so no slug rules need to be
//! re-derived here.
//!
//! ## Accepted Shapes
//!
//! Either the docs-plugin map directly:
//!
//! ```json
//! { "default": { "loadedVersions": [ { "docs": [ ... ] } ] } }
//! ```
//!
//! or the whole content export, from which the docs plugin entry is picked:
//!
//! ```json
//! { "docusaurus-plugin-content-docs": { "default": { ... } } }
//! ```
//!
//! Plugin instances keep the order they appear in the export, so documents
//! flatten instance by instance, then version by version.

use crate::frontmatter::{FrontMatter, QR_FLAG};
use crate::types::Target;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Key of the docs plugin inside a full content export.
pub const DOCS_PLUGIN_KEY: &str = "docusaurus-plugin-content-docs";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid index JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loaded docs per plugin instance id, in export order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteIndex(Vec<(String, PluginContent)>);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PluginContent {
    #[serde(rename = "loadedVersions", default, deserialize_with = "null_as_default")]
    pub loaded_versions: Vec<LoadedVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoadedVersion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub docs: Vec<Document>,
}

/// A document as the host loaded it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default, alias = "source")]
    pub path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "frontMatter", default, deserialize_with = "null_as_default")]
    pub front_matter: FrontMatter,
    pub permalink: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// Display title: host title, then front-matter title, then the last
    /// permalink segment.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.front_matter.text("title"))
            .unwrap_or_else(|| {
                self.permalink
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }
}

impl SiteIndex {
    /// Parse an index export from JSON text.
    pub fn from_json(text: &str) -> Result<Self, IndexError> {
        let mut value: serde_json::Value = serde_json::from_str(text)?;
        let docs = value
            .get_mut(DOCS_PLUGIN_KEY)
            .map(serde_json::Value::take)
            .unwrap_or(value);
        let instances: serde_json::Map<String, serde_json::Value> = serde_json::from_value(docs)?;
        instances
            .into_iter()
            .map(|(id, content)| -> Result<(String, PluginContent), IndexError> {
                Ok((id, serde_json::from_value(content)?))
            })
            .collect()
    }

    /// Read an index export from disk.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// All documents across plugin instances and versions, in order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.0
            .iter()
            .flat_map(|(_, plugin)| &plugin.loaded_versions)
            .flat_map(|version| &version.docs)
    }

    /// Documents flagged for QR generation, as targets.
    pub fn qualifying_targets(&self) -> Vec<Target> {
        self.documents()
            .filter(|doc| doc.front_matter.is_truthy(QR_FLAG))
            .map(|doc| Target::new(doc.display_title(), &doc.permalink))
            .collect()
    }
}

impl FromIterator<(String, PluginContent)> for SiteIndex {
    fn from_iter<I: IntoIterator<Item = (String, PluginContent)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
