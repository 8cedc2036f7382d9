//! # docs-qr
//!
//! Build-time QR codes for documentation sites. Pages opt in with a single
//! front-matter flag; the build writes one PNG per flagged page plus a JSON
//! manifest that a gallery page or an embedded widget reads at runtime.
//!
//! ```markdown
//! ---
//! title: Getting Started
//! qr: true
//! ---
//! ```
//!
//! # Architecture: Resolve, Then Generate
//!
//! ```text
//! 1. Resolve   host index  ─┐
//!              content dir ─┴→  [Target { title, permalink }]
//! 2. Generate  targets      →  static/qr/*.png + _manifest.json
//! ```
//!
//! Resolution has two sources. The host's exported document index is
//! preferred: its permalinks are authoritative. A direct scan of the content
//! directory is the fallback, used only when the index yields nothing. The
//! two are never merged.
//!
//! Generation is a function from targets plus an explicit [`generate::BuildConfig`]
//! to a [`generate::BuildReport`]. Nothing is printed by the library; the CLI
//! formats reports and progress events through [`output`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Fallback source: walks the content tree, reads front-matter, derives permalinks |
//! | [`index`] | Preferred source: reads the host's exported document index |
//! | [`resolve`] | Picks the winning source ([`resolve::TargetSource`] seam) |
//! | [`naming`] | Permalink → file name, permalink → absolute URL, widget href |
//! | [`generate`] | Plans file names, encodes images in parallel, writes the manifest |
//! | [`manifest`] | Manifest entry types, atomic write, load, search filter |
//! | [`imaging`] | QR encoder trait and the pure-Rust PNG encoder |
//! | [`frontmatter`] | YAML front-matter splitting, parsing and truthiness |
//! | [`config`] | `docs-qr.toml` loading, merging and validation |
//! | [`files`] | Temp-file + rename writes |
//! | [`types`] | Shared types (`Target`, `Discovery`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One File Name Rule
//!
//! The builder and the embed widget both derive image names through
//! [`naming::filename_from_permalink`]. The widget only knows the browser
//! location, so [`naming::widget_href`] strips the site base path and applies
//! the same rule. The site root maps to `home.png` in both places.
//!
//! ## Full Regeneration
//!
//! The manifest is rebuilt from the current targets on every run. Removing a
//! page's flag removes its entry, and an empty build writes `[]`. Images of
//! removed pages are reported as stale but left on disk.
//!
//! ## Atomic Writes
//!
//! Images and the manifest are written to a hidden temporary sibling and
//! renamed into place. A failed build leaves the previous manifest readable.

pub mod config;
pub mod files;
pub mod frontmatter;
pub mod generate;
pub mod imaging;
pub mod index;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
