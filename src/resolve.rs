//! Target resolution: which discovery path wins.
//!
//! Two sources can produce targets. The host index is preferred because it
//! carries the host's own permalinks; the content scan is a fallback that
//! re-derives them from files. The rule is all-or-nothing:
//!
//! 1. Run the preferred source.
//! 2. If it produced at least one target, use those. The fallback never runs.
//! 3. Otherwise run the fallback and use its targets unchanged.
//!
//! Results are never merged, so a site is described by exactly one source
//! per build.

use crate::index::{IndexError, SiteIndex};
use crate::scan::{ContentScanner, ScanError};
use crate::types::{Discovery, SkippedDocument, Target, TargetOrigin};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Content scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Site index failed: {0}")]
    Index(#[from] IndexError),
}

/// A place targets can be discovered from.
pub trait TargetSource {
    fn origin(&self) -> TargetOrigin;
    fn discover(&self) -> Result<Discovery, ResolveError>;
}

/// The host index, if one was provided.
#[derive(Debug, Clone, Default)]
pub struct SiteIndexSource(pub Option<SiteIndex>);

impl SiteIndexSource {
    /// Load the index export at `path`, or an absent index for `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ResolveError> {
        Ok(Self(path.map(SiteIndex::load).transpose()?))
    }
}

impl TargetSource for SiteIndexSource {
    fn origin(&self) -> TargetOrigin {
        TargetOrigin::SiteIndex
    }

    fn discover(&self) -> Result<Discovery, ResolveError> {
        let Some(index) = &self.0 else {
            return Ok(Discovery::default());
        };
        Ok(Discovery {
            targets: index.qualifying_targets(),
            considered: index.documents().count(),
            skipped: Vec::new(),
        })
    }
}

impl TargetSource for ContentScanner {
    fn origin(&self) -> TargetOrigin {
        TargetOrigin::ContentScan
    }

    fn discover(&self) -> Result<Discovery, ResolveError> {
        Ok(self.scan()?)
    }
}

/// Documents examined by one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCount {
    pub origin: TargetOrigin,
    pub considered: usize,
}

/// Outcome of resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The source whose targets were used.
    pub origin: TargetOrigin,
    pub targets: Vec<Target>,
    /// Every source consulted, in the order they ran.
    pub consulted: Vec<SourceCount>,
    pub skipped: Vec<SkippedDocument>,
}

/// Pick targets from `preferred`, falling back to `fallback` only when the
/// preferred source yields none.
pub fn resolve(
    preferred: &dyn TargetSource,
    fallback: &dyn TargetSource,
) -> Result<Resolution, ResolveError> {
    let first = preferred.discover()?;
    let mut consulted = vec![SourceCount {
        origin: preferred.origin(),
        considered: first.considered,
    }];

    if !first.targets.is_empty() {
        return Ok(Resolution {
            origin: preferred.origin(),
            targets: first.targets,
            consulted,
            skipped: first.skipped,
        });
    }

    let second = fallback.discover()?;
    consulted.push(SourceCount {
        origin: fallback.origin(),
        considered: second.considered,
    });
    let mut skipped = first.skipped;
    skipped.extend(second.skipped);

    Ok(Resolution {
        origin: fallback.origin(),
        targets: second.targets,
        consulted,
        skipped,
    })
}
