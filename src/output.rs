//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every target is displayed by its title and positional index first. The
//! permalink, file name and URL are secondary context on indented lines, so
//! the output reads as an inventory of pages rather than a list of files.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! Targets from site index (14 documents)
//! 001 Introduction → docs_intro.png
//!     Permalink: /docs/intro
//! 002 Deploying → docs_ship.png
//!     Permalink: /docs/ship
//! ```
//!
//! ## Generate
//!
//! ```text
//! Encoding 2 images → static/qr
//!     001 Introduction → docs_intro.png
//!     002 Deploying → docs_ship.png
//!
//! Collisions
//!     docs_a_b.png: /docs/a/b overwritten by /docs/a_b
//!
//! Stale
//!     docs_old.png
//!
//! Wrote 2 images, manifest → static/qr/_manifest.json
//! ```
//!
//! ## List
//!
//! ```text
//! 001 Introduction
//!     URL:  https://example.com/docs/intro
//!     File: /qr/docs_intro.png
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::generate::{BuildReport, GenerateEvent};
use crate::manifest::ManifestEntry;
use crate::naming::filename_from_permalink;
use crate::resolve::Resolution;
use crate::types::SkippedDocument;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a target line: index, title and the image file it maps to.
///
/// ```text
/// 001 Introduction → docs_intro.png
/// ```
fn target_line(index: usize, title: &str, filename: &str) -> String {
    format!("{} {} → {}", format_index(index), title, filename)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn skipped_lines(skipped: &[SkippedDocument]) -> Vec<String> {
    let mut lines = Vec::new();
    if skipped.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Skipped".to_string());
    for doc in skipped {
        lines.push(format!("{}{}: {}", indent(1), doc.path, doc.reason));
    }
    lines
}

// ============================================================================
// Resolve output
// ============================================================================

/// Format resolved targets with the source that produced them.
pub fn format_resolution(resolution: &Resolution) -> Vec<String> {
    let mut lines = Vec::new();

    let considered = resolution
        .consulted
        .iter()
        .find(|c| c.origin == resolution.origin)
        .map(|c| c.considered)
        .unwrap_or(0);
    lines.push(format!(
        "Targets from {} ({})",
        resolution.origin,
        plural(considered, "document", "documents")
    ));

    for fallen_through in resolution
        .consulted
        .iter()
        .filter(|c| c.origin != resolution.origin)
    {
        lines.push(format!(
            "{}{} had no flagged pages ({})",
            indent(1),
            fallen_through.origin,
            plural(fallen_through.considered, "document", "documents")
        ));
    }

    if resolution.targets.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, target) in resolution.targets.iter().enumerate() {
        lines.push(target_line(
            i + 1,
            &target.title,
            &filename_from_permalink(&target.permalink),
        ));
        lines.push(format!("{}Permalink: {}", indent(1), target.permalink));
    }

    lines.extend(skipped_lines(&resolution.skipped));
    lines
}

/// Print resolved targets to stdout.
pub fn print_resolution(resolution: &Resolution) {
    for line in format_resolution(resolution) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format a single generate progress event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::Started { total, output_dir } => vec![format!(
            "Encoding {} → {}",
            plural(*total, "image", "images"),
            output_dir.display()
        )],
        GenerateEvent::ImageWritten {
            index,
            title,
            filename,
            ..
        } => vec![format!("{}{}", indent(1), target_line(*index, title, filename))],
    }
}

/// Format the summary printed after a build completes.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.collisions.is_empty() {
        lines.push(String::new());
        lines.push("Collisions".to_string());
        for c in &report.collisions {
            lines.push(format!(
                "{}{}: {} overwritten by {}",
                indent(1),
                c.filename,
                c.overwritten,
                c.kept
            ));
        }
    }

    if !report.stale_files.is_empty() {
        lines.push(String::new());
        lines.push("Stale".to_string());
        for file in &report.stale_files {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Wrote {}, manifest → {}",
        plural(report.images_written(), "image", "images"),
        report.manifest_path.display()
    ));
    lines
}

/// Print the build summary to stdout.
pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the result of validating every content document.
pub fn format_check_output(considered: usize, flagged: usize, invalid: &[SkippedDocument]) -> Vec<String> {
    let mut lines = vec![format!(
        "{}, {} flagged",
        plural(considered, "document", "documents"),
        flagged
    )];
    if !invalid.is_empty() {
        lines.push(String::new());
        lines.push("Invalid front-matter".to_string());
        for doc in invalid {
            lines.push(format!("{}{}: {}", indent(1), doc.path, doc.reason));
        }
    }
    lines
}

pub fn print_check_output(considered: usize, flagged: usize, invalid: &[SkippedDocument]) {
    for line in format_check_output(considered, flagged, invalid) {
        println!("{}", line);
    }
}

// ============================================================================
// Manifest listing
// ============================================================================

/// Format manifest entries as the gallery page would show them.
pub fn format_manifest_list<'a>(entries: impl IntoIterator<Item = &'a ManifestEntry>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.title));
        lines.push(format!("{}URL:  {}", indent(1), entry.url));
        lines.push(format!("{}File: {}", indent(1), entry.file));
    }
    if lines.is_empty() {
        lines.push("No QR codes found".to_string());
    }
    lines
}

pub fn print_manifest_list<'a>(entries: impl IntoIterator<Item = &'a ManifestEntry>) {
    for line in format_manifest_list(entries) {
        println!("{}", line);
    }
}
