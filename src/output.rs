//! Console output formatting for the scan, generate, and check stages.
//!
//! # Scan Report
//!
//! The report is an annotated inventory. Each image category gets a section
//! headed by its scanned directory, with one line per discovered tag. Tags
//! the filter removes, and tags the renderer treats specially, carry a
//! trailing annotation:
//!
//! ```text
//! base/
//!     10.0.0
//!     12.0.0-libgbm (no version check)
//!     6 (skip list)
//!
//! browsers/
//!     chrome69 (skip list)
//!     node12.4.0-chrome76 (Google Chrome 76)
//!
//! included/
//!     5.4.0 (below minimum 6.0.0)
//!     7.52.0
//!
//! 7 image tags, 3 skipped
//! ```
//!
//! Annotations preview decisions that other modules own. The filter in
//! [`crate::skip`] and the renderer in [`crate::generate`] apply the same
//! rules when generating; the report never fails on a bad tag, so `scan`
//! can be used to diagnose exactly the tags `generate` would reject.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function returning lines and a `print_*`
//! wrapper that writes them to stdout. Format functions are pure, so tests
//! assert on lines without capturing stdout.

use crate::config::GeneratorConfig;
use crate::scan::Manifest;
use crate::skip::Partitions;
use crate::tag::{BrowserVersions, detect_browsers};
use semver::Version;

// ============================================================================
// Line helpers
// ============================================================================

/// Format one report line: indented tag plus optional annotation.
fn tag_line(tag: &str, annotation: Option<String>) -> String {
    match annotation {
        Some(note) => format!("    {tag} ({note})"),
        None => format!("    {tag}"),
    }
}

/// Join detected browser labels in emission order (chrome, firefox, edge).
fn browser_summary(browsers: &BrowserVersions) -> Option<String> {
    let labels: Vec<&str> = [&browsers.chrome, &browsers.firefox, &browsers.edge]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

// ============================================================================
// Scan report
// ============================================================================

/// Format the scan report for a discovered manifest.
///
/// Sections follow the category order of the output document. The closing
/// line counts every discovered tag and how many the filter will drop.
pub fn format_scan_report(manifest: &Manifest, config: &GeneratorConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let mut skipped = 0;

    lines.push(format!("{}/", config.paths.base));
    if manifest.base.is_empty() {
        lines.push("    (none)".to_string());
    }
    for tag in &manifest.base {
        let annotation = if config.skip.base.iter().any(|s| s == &tag.tag) {
            skipped += 1;
            Some("skip list".to_string())
        } else if config.unversioned.base.iter().any(|s| s == &tag.tag) {
            Some("no version check".to_string())
        } else {
            None
        };
        lines.push(tag_line(&tag.tag, annotation));
    }

    lines.push(String::new());
    lines.push(format!("{}/", config.paths.browsers));
    if manifest.browsers.is_empty() {
        lines.push("    (none)".to_string());
    }
    for tag in &manifest.browsers {
        let annotation = if config.skip.browsers.iter().any(|s| s == &tag.tag) {
            skipped += 1;
            Some("skip list".to_string())
        } else {
            let mut note = browser_summary(&detect_browsers(&tag.tag))
                .unwrap_or_else(|| "no recognizable browser".to_string());
            if config.unversioned.browsers.iter().any(|s| s == &tag.tag) {
                note.push_str(", no version check");
            }
            Some(note)
        };
        lines.push(tag_line(&tag.tag, annotation));
    }

    lines.push(String::new());
    lines.push(format!("{}/", config.paths.included));
    if manifest.included.is_empty() {
        lines.push("    (none)".to_string());
    }
    for tag in &manifest.included {
        let annotation = match Version::parse(&tag.tag) {
            Ok(version) if version < config.included.minimum => {
                skipped += 1;
                Some(format!("below minimum {}", config.included.minimum))
            }
            Ok(_) => None,
            Err(_) => Some("invalid version".to_string()),
        };
        lines.push(tag_line(&tag.tag, annotation));
    }

    lines.push(String::new());
    lines.push(format!("{} image tags, {} skipped", manifest.total(), skipped));

    lines
}

/// Print the scan report to stdout.
pub fn print_scan_report(manifest: &Manifest, config: &GeneratorConfig) {
    for line in format_scan_report(manifest, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate summary
// ============================================================================

/// Format the one-line generate summary with per-category job counts.
pub fn format_generate_summary(partitions: &Partitions, output: &str) -> String {
    format!(
        "Generated {} base, {} browsers, {} included jobs \u{2192} {}",
        partitions.base.kept.len(),
        partitions.browsers.kept.len(),
        partitions.included.kept.len(),
        output
    )
}

/// Print the generate summary to stdout.
pub fn print_generate_summary(partitions: &Partitions, output: &str) {
    println!("{}", format_generate_summary(partitions, output));
}

// ============================================================================
// Check verdict
// ============================================================================

/// Success line for `check`: the committed file matches the render.
pub fn format_check_success(output: &str) -> String {
    format!("{output} is up to date")
}

/// Failure message for `check`, distinguishing a missing output file from a
/// stale one. `check` surfaces this as its error, so the exit code is
/// nonzero and CI jobs fail until the file is regenerated.
pub fn format_check_failure(output: &str, exists: bool) -> String {
    if exists {
        format!("{output} is out of date (run `circlegen generate`)")
    } else {
        format!("{output} is missing (run `circlegen generate`)")
    }
}

// ============================================================================
// Tests
// ============================================================================
