//! QR image and manifest generation.
//!
//! Final stage of the pipeline. Takes resolved targets, derives each one's
//! file name and absolute URL, encodes one PNG per target and writes the
//! manifest listing them.
//!
//! ## Output Structure
//!
//! ```text
//! static/qr/
//! ├── _manifest.json          # [{title, url, file}, ...] in resolution order
//! ├── docs_intro.png
//! ├── docs_guides_setup.png
//! └── home.png                # permalink "/"
//! ```
//!
//! ## Guarantees
//!
//! - The output directory exists before the first image is written.
//! - Every file (images and manifest) is written to a temporary sibling and
//!   renamed into place, so readers never observe a partial file.
//! - Images are encoded in parallel with [rayon](https://docs.rs/rayon);
//!   results are sorted back into resolution order before the manifest is
//!   serialized.
//! - The first encoding failure aborts the build before the manifest is
//!   touched, so the previous manifest stays intact.
//! - The manifest is rebuilt from scratch. An empty target list writes `[]`.
//!
//! ## File Name Collisions
//!
//! Distinct permalinks can map to the same file name (`/docs/a/b` and
//! `/docs/a_b`). Every target still gets its manifest entry, but the file is
//! encoded once, for the target resolved last, matching what writing the
//! images one after another would leave on disk. Each clash is reported in
//! [`BuildReport::collisions`].
//!
//! ## Stale Images
//!
//! PNG files already in the output directory that the new manifest does not
//! reference are listed in [`BuildReport::stale_files`]. They are never
//! deleted; the output directory may contain files this tool does not own.

use crate::config::{ConfigError, SiteConfig};
use crate::imaging::{EncodeError, EncodeParams, QrEncoder, QrOptions, RustEncoder};
use crate::manifest::{Manifest, ManifestEntry, ManifestError};
use crate::naming::{SiteBase, filename_from_permalink, public_file};
use crate::types::Target;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot build URL for {permalink}: {source}")]
    Url {
        permalink: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to encode {filename}: {source}")]
    Encode {
        filename: String,
        #[source]
        source: EncodeError,
    },
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Everything a build needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub output_dir: PathBuf,
    /// URL path the output directory is served at, e.g. `/qr`.
    pub public_path: String,
    pub manifest_name: String,
    pub site_base: SiteBase,
    pub qr: QrOptions,
}

impl BuildConfig {
    /// Build from a loaded site config, resolving paths against `site_dir`.
    pub fn from_site_config(config: &SiteConfig, site_dir: &Path) -> Result<Self, GenerateError> {
        Ok(Self {
            output_dir: config.output_dir(site_dir),
            public_path: config.output.public_path.clone(),
            manifest_name: config.output.manifest.clone(),
            site_base: config.site_base()?,
            qr: QrOptions::from_config(&config.qr),
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest_name)
    }
}

/// One image the build will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImage {
    pub title: String,
    pub permalink: String,
    pub url: String,
    pub filename: String,
    /// Site-relative path recorded in the manifest.
    pub file: String,
}

impl PlannedImage {
    fn entry(&self) -> ManifestEntry {
        ManifestEntry {
            title: self.title.clone(),
            url: self.url.clone(),
            file: self.file.clone(),
        }
    }
}

/// Two targets that derived the same file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub filename: String,
    /// Permalink the file encodes (the later one).
    pub kept: String,
    /// Permalink whose image was overwritten.
    pub overwritten: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// One per target, in resolution order.
    pub images: Vec<PlannedImage>,
    /// Positions in `images` that own their file name and get encoded.
    pub writes: Vec<usize>,
    pub collisions: Vec<Collision>,
}

/// Derive file names and URLs for every target, resolving collisions.
pub fn plan(targets: &[Target], config: &BuildConfig) -> Result<Plan, GenerateError> {
    let derived = targets
        .iter()
        .map(|target| -> Result<_, GenerateError> {
            let url = config
                .site_base
                .page_url(&target.permalink)
                .map_err(|source| GenerateError::Url {
                    permalink: target.permalink.clone(),
                    source,
                })?;
            let filename = filename_from_permalink(&target.permalink);
            Ok(PlannedImage {
                title: target.title.clone(),
                permalink: target.permalink.clone(),
                url: url.to_string(),
                file: public_file(&config.public_path, &filename),
                filename,
            })
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    let last_owner: HashMap<&str, usize> = derived
        .iter()
        .enumerate()
        .map(|(i, image)| (image.filename.as_str(), i))
        .collect();

    let mut writes = Vec::new();
    let mut collisions = Vec::new();
    for (i, image) in derived.iter().enumerate() {
        let owner = last_owner[image.filename.as_str()];
        if owner == i {
            writes.push(i);
        } else {
            collisions.push(Collision {
                filename: image.filename.clone(),
                kept: derived[owner].permalink.clone(),
                overwritten: image.permalink.clone(),
            });
        }
    }

    Ok(Plan {
        images: derived,
        writes,
        collisions,
    })
}

/// Progress events emitted while generating.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateEvent {
    Started {
        total: usize,
        output_dir: PathBuf,
    },
    /// An image was committed. `index` is its 1-based manifest position.
    ImageWritten {
        index: usize,
        title: String,
        filename: String,
        url: String,
    },
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub collisions: Vec<Collision>,
    /// PNG files in the output directory the manifest no longer references.
    pub stale_files: Vec<String>,
}

impl BuildReport {
    /// Distinct image files encoded; colliding entries share one.
    pub fn images_written(&self) -> usize {
        self.manifest.len().saturating_sub(self.collisions.len())
    }
}

pub fn generate(
    targets: &[Target],
    config: &BuildConfig,
    events: Option<Sender<GenerateEvent>>,
) -> Result<BuildReport, GenerateError> {
    generate_with_encoder(&RustEncoder::new(), targets, config, events)
}

/// Generate using a specific encoder (allows testing with mock).
pub fn generate_with_encoder(
    encoder: &impl QrEncoder,
    targets: &[Target],
    config: &BuildConfig,
    events: Option<Sender<GenerateEvent>>,
) -> Result<BuildReport, GenerateError> {
    let plan = plan(targets, config)?;

    fs::create_dir_all(&config.output_dir)?;

    if let Some(tx) = &events {
        tx.send(GenerateEvent::Started {
            total: plan.writes.len(),
            output_dir: config.output_dir.clone(),
        })
        .ok();
    }

    plan.writes
        .par_iter()
        .map(|&i| (i, &plan.images[i]))
        .try_for_each_with(events, |events, (i, image)| -> Result<(), GenerateError> {
            encoder
                .encode(&EncodeParams {
                    data: image.url.clone(),
                    output: config.output_dir.join(&image.filename),
                    options: config.qr,
                })
                .map_err(|source| GenerateError::Encode {
                    filename: image.filename.clone(),
                    source,
                })?;

            if let Some(tx) = events {
                tx.send(GenerateEvent::ImageWritten {
                    index: i + 1,
                    title: image.title.clone(),
                    filename: image.filename.clone(),
                    url: image.url.clone(),
                })
                .ok();
            }
            Ok(())
        })?;

    let manifest = Manifest::new(plan.images.iter().map(PlannedImage::entry).collect());

    let manifest_path = config.manifest_path();
    manifest.write(&manifest_path)?;

    let referenced: HashSet<&str> = plan.images.iter().map(|i| i.filename.as_str()).collect();
    let stale_files = find_stale_images(&config.output_dir, &referenced)?;

    Ok(BuildReport {
        manifest,
        manifest_path,
        collisions: plan.collisions,
        stale_files,
    })
}

/// Non-hidden `.png` files in `dir` not in `referenced`, sorted.
fn find_stale_images(dir: &Path, referenced: &HashSet<&str>) -> Result<Vec<String>, std::io::Error> {
    let mut stale = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !name.ends_with(".png") {
            continue;
        }
        if !referenced.contains(name.as_str()) {
            stale.push(name);
        }
    }
    stale.sort();
    Ok(stale)
}
