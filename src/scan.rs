//! Filesystem scanning: discover image tags from the directory tree.
//!
//! The repository layout is the single source of truth. Each image family
//! has a root directory, and each immediate subdirectory of a root is one
//! image tag (the directory holds that image's Dockerfile and test project):
//!
//! ```text
//! repo/
//! ├── base/
//! │   ├── 10.0.0/                  # tag "10.0.0", category base
//! │   ├── 12.0.0-libgbm/
//! │   └── manjaro-14.12.0/
//! ├── browsers/
//! │   ├── node12.4.0-chrome76/
//! │   └── node10.16.3-chrome80-ff73/
//! ├── included/
//! │   ├── 5.4.0/
//! │   └── 6.0.0/
//! └── circle.yml                   # generated output
//! ```
//!
//! Scanning is shallow: exactly one level below each root. Files and hidden
//! directories inside a root are ignored. A missing root is not an error;
//! the category is simply empty (a repo may predate a family, the same way
//! a missing `circlegen.toml` means stock config). Tags are sorted by name
//! within each category so output is deterministic regardless of filesystem
//! iteration order.

use crate::config::PathsConfig;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error scanning {1}: {0}")]
    Io(io::Error, PathBuf),
}

/// The three image families, named after their root directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Base,
    Browsers,
    Included,
}

impl Category {
    /// Canonical name, used in display names, workflow names, and errors.
    pub fn name(self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Browsers => "browsers",
            Category::Included => "included",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One discovered image: its family and its directory name, which doubles
/// as the Docker tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageTag {
    pub category: Category,
    pub tag: String,
}

impl ImageTag {
    pub fn new(category: Category, tag: &str) -> Self {
        Self {
            category,
            tag: tag.to_string(),
        }
    }

    /// Job display name, e.g. `base 10.0.0`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.category, self.tag)
    }
}

/// Manifest output from the scan stage: every discovered tag, per category,
/// sorted by name. Serializes to JSON for `scan --json`.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub base: Vec<ImageTag>,
    pub browsers: Vec<ImageTag>,
    pub included: Vec<ImageTag>,
}

impl Manifest {
    /// Total number of discovered tags across all categories.
    pub fn total(&self) -> usize {
        self.base.len() + self.browsers.len() + self.included.len()
    }
}

/// Scan all three image roots under the repository root.
pub fn scan(repo: &Path, paths: &PathsConfig) -> Result<Manifest, ScanError> {
    Ok(Manifest {
        base: scan_category(&repo.join(&paths.base), Category::Base)?,
        browsers: scan_category(&repo.join(&paths.browsers), Category::Browsers)?,
        included: scan_category(&repo.join(&paths.included), Category::Included)?,
    })
}

/// Scan one image root: every immediate, non-hidden subdirectory is a tag.
pub fn scan_category(root: &Path, category: Category) -> Result<Vec<ImageTag>, ScanError> {
    let dir = match fs::read_dir(root) {
        Ok(dir) => dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ScanError::Io(e, root.to_path_buf())),
    };

    let mut tags: Vec<ImageTag> = dir
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.'))
        .map(|name| ImageTag {
            category,
            tag: name,
        })
        .collect();

    tags.sort_by(|a, b| a.tag.cmp(&b.tag));
    Ok(tags)
}
