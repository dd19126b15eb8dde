//! Content, script, style and asset processing.
//!
//! - **front**: Split content files into front-matter and body
//! - **markdown**: Markdown rendering with highlighted code blocks
//! - **render**: Tera template set and site helpers
//! - **pages**: Scan the content tree, then render every page
//! - **assets**: Render scripts/styles, copy static assets
//!
//! # Build Flow
//!
//! ```text
//! scan_content() ──► render_pages() ──► render_scripts() / render_styles() ──► copy_assets()
//!       │                  │                        │                               │
//!       ▼                  ▼                        ▼                               ▼
//!   SiteTree          HTML files            scripts / styles                  asset files
//! ```
//!
//! A failure in one file never stops the others; each stage returns a
//! [`BuildReport`] with what was written and what failed.

pub mod assets;
pub mod front;
pub mod markdown;
pub mod pages;
pub mod render;

use crate::log;
use std::fmt::Display;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub use assets::{copy_assets, render_scripts, render_styles};
pub use pages::{render_pages, scan_content};
pub use render::Renderer;

// ============================================================================
// Shared utilities
// ============================================================================

/// Per-directory data file, merged into the directory's tree node.
pub const DIR_DATA_FILE: &str = "_dir.json5";

/// Dotfiles and dot-directories below the walk root (`.DS_Store`, `.gitkeep`,
/// editor swap files) are never part of the site.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Collect all files from a directory recursively, in sorted order.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

/// Check if destination exists and is not older than source.
pub fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let Ok(src_time) = src.metadata().and_then(|meta| meta.modified()) else {
        return false;
    };
    let Ok(dst_time) = dst.metadata().and_then(|meta| meta.modified()) else {
        return false;
    };
    src_time <= dst_time
}

// ============================================================================
// Build report
// ============================================================================

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one or more build stages.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    /// Files written
    pub rendered: usize,
    /// Files left alone (up to date or unsupported)
    pub skipped: usize,
    pub failures: Vec<Failure>,
}

impl BuildReport {
    pub fn rendered() -> Self {
        Self {
            rendered: 1,
            ..Self::default()
        }
    }

    pub fn skipped() -> Self {
        Self {
            skipped: 1,
            ..Self::default()
        }
    }

    /// Report a single failure, logging it as it happens.
    pub fn failed(path: &Path, err: impl Display) -> Self {
        let mut report = Self::default();
        report.fail(path, err);
        report
    }

    /// Log and record a failure for `path`.
    pub fn fail(&mut self, path: &Path, err: impl Display) {
        let message = format!("{err:#}");
        log!("error"; "{message}");
        self.failures.push(Failure {
            path: path.to_path_buf(),
            message,
        });
    }

    pub fn merge(mut self, other: Self) -> Self {
        self += other;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

impl AddAssign for BuildReport {
    fn add_assign(&mut self, other: Self) {
        self.rendered += other.rendered;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }
}
