//! CLI output formatting.
//!
//! Every photo is shown by its positional index and source file name, with
//! where it went as indented context lines.
//!
//! # Output Format
//!
//! ## Polaroid / Film strip
//!
//! ```text
//! Film strip (2 photos)
//! 001 beach.jpg → 300x300
//!     Output: strip/001-beach.png
//!     Photo saved to your photo library! (Photos/3f9a0c1e2b7d4a55.png)
//! 002 harbour.jpg → 240x240
//!     Output: strip/002-harbour.png
//!     Photo saved to your photo library! (Photos/0be1d2c3a4f59687.png)
//! ```
//!
//! ## Library
//!
//! ```text
//! Library: Photos (2 photos)
//! 001 0be1d2c3a4f59687
//!     Source: Photos/0be1d2c3a4f59687.png
//! 002 3f9a0c1e2b7d4a55
//!     Source: Photos/3f9a0c1e2b7d4a55.png
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::{FilterVariant, PolaroidPreset};
use crate::library::{SaveOutcome, SavedAsset};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{n} photos")
    }
}

/// Human title for a filter variant.
fn variant_title(variant: FilterVariant) -> String {
    match variant {
        FilterVariant::FilmStrip => "Film strip".to_string(),
        FilterVariant::Polaroid(preset) => format!("Polaroid ({})", preset_name(preset)),
    }
}

fn preset_name(preset: PolaroidPreset) -> &'static str {
    match preset {
        PolaroidPreset::Standard => "standard",
        PolaroidPreset::Soft => "soft",
    }
}

// ============================================================================
// Filtered photos
// ============================================================================

/// One filtered photo as reported by the CLI.
#[derive(Debug, Clone)]
pub struct PhotoReport {
    /// Source file name.
    pub name: String,
    pub dimensions: (u32, u32),
    /// Where the filtered photo was written, if anywhere.
    pub output: Option<PathBuf>,
    pub save: Option<SaveOutcome>,
}

/// Format a save outcome as a single status line.
///
/// ```text
/// Photo saved to your photo library! (Photos/3f9a0c1e2b7d4a55.png)
/// Photo library access denied. Please enable it in Settings.
/// ```
pub fn format_save_outcome(outcome: &SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Saved(asset) => {
            format!("{} ({})", outcome.message(), asset.path.display())
        }
        _ => outcome.message(),
    }
}

/// Format the photos produced by one pick.
pub fn format_photos(variant: FilterVariant, photos: &[PhotoReport]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        variant_title(variant),
        photo_count(photos.len())
    )];
    if photos.is_empty() {
        lines.push(format!("{}No photos could be loaded", indent(1)));
        return lines;
    }
    for (i, photo) in photos.iter().enumerate() {
        let (w, h) = photo.dimensions;
        lines.push(format!(
            "{} {} → {}x{}",
            format_index(i + 1),
            photo.name,
            w,
            h
        ));
        if let Some(out) = &photo.output {
            lines.push(format!("{}Output: {}", indent(1), out.display()));
        }
        if let Some(save) = &photo.save {
            lines.push(format!("{}{}", indent(1), format_save_outcome(save)));
        }
    }
    lines
}

pub fn print_photos(variant: FilterVariant, photos: &[PhotoReport]) {
    for line in format_photos(variant, photos) {
        println!("{}", line);
    }
}

/// Output file name for the `index`-th (1-based) photo of a strip.
///
/// ```text
/// 001-beach.png
/// ```
pub fn strip_output_name(index: usize, source_name: &str, extension: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    format!("{}-{}.{}", format_index(index), stem, extension)
}

// ============================================================================
// Library listing
// ============================================================================

/// Format the contents of the photo library.
pub fn format_library(root: &Path, assets: &[SavedAsset]) -> Vec<String> {
    let mut lines = vec![format!(
        "Library: {} ({})",
        root.display(),
        photo_count(assets.len())
    )];
    for (i, asset) in assets.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), asset.id));
        lines.push(format!("{}Source: {}", indent(1), asset.path.display()));
    }
    lines
}

pub fn print_library(root: &Path, assets: &[SavedAsset]) {
    for line in format_library(root, assets) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
