//! CI config generation.
//!
//! Takes the scanned manifest, applies the skip rules, and renders the
//! complete `circle.yml`: a static preamble followed by one workflow block
//! per category with one job entry per kept tag.
//!
//! ## Output Structure
//!
//! ```text
//! # WARNING: this file is generated ...   # static preamble
//! version: 2.1                            #   (static/preamble.yml)
//! commands:                               # halting, image tests, push
//!   ...
//! jobs:                                   # parameterized build jobs
//!   build-base-image: ...
//!   build-browser-image: ...
//!   build-included-image: ...
//! workflows:                              # generated from here down
//!   build-base-images:
//!     jobs:
//!       - build-base-image:
//!           name: "base 10.0.0"
//!           dockerTag: "10.0.0"
//!           checkNodeVersion: true
//!   build-browser-images:
//!     jobs:
//!       - build-browser-image:
//!           name: "browsers node12.4.0-chrome76"
//!           dockerTag: "node12.4.0-chrome76"
//!           chromeVersion: "Google Chrome 76"
//!           checkNodeVersion: true
//!   build-included-images:
//!     jobs:
//!       - build-included-image:
//!           name: "included 6.0.0"
//!           dockerTag: "6.0.0"
//! ```
//!
//! The output is indentation-sensitive: workflow names sit at column 2,
//! `jobs:` at column 4, job entries at column 6, and parameters at column
//! 10. Every base and browsers job passes `checkNodeVersion: true` unless
//! its tag is in the configured unversioned set, in which case the
//! parameter is omitted and the job definition's default (no check)
//! applies.
//!
//! Rendering is pure: [`render_document`] maps a manifest and config to
//! document text and touches no I/O, so `check` can reuse it without
//! writing, and the same tree renders byte-identical on every run.
//! [`write_document`] replaces the output file in one whole-file write;
//! nothing is written when rendering fails.

use crate::config::GeneratorConfig;
use crate::scan::{ImageTag, Manifest};
use crate::skip::{self, Partition, Partitions, SkipError};
use crate::tag;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing {1}: {0}")]
    Io(io::Error, PathBuf),
    #[error(
        "browsers image tag \"{0}\" advertises no recognizable browser \
         (expected a chrome/ff/edge component)"
    )]
    UnknownBrowser(String),
    #[error("{0}")]
    Skip(#[from] SkipError),
}

/// Static preamble: reusable commands and the three parameterized build
/// jobs, ending with the bare `workflows:` key the generated blocks nest
/// under. Copied verbatim into every output.
const PREAMBLE: &str = include_str!("../static/preamble.yml");

/// Line terminator for the generated file.
const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const VERSION_CHECK_PARAM: &str = "          checkNodeVersion: true";

/// Render the complete output document for a scanned manifest.
///
/// Pure with respect to the filesystem. Fails without side effects when a
/// browsers tag advertises no browser or an included tag is not semver.
pub fn render_document(
    manifest: &Manifest,
    config: &GeneratorConfig,
) -> Result<String, GenerateError> {
    let partitions = skip::partition_manifest(manifest, config)?;
    render_partitions(&partitions, config)
}

/// Render the document from collections the caller already partitioned.
/// [`render_document`] is this plus the partitioning step; `generate`
/// partitions once for its summary and renders from the same result.
pub fn render_partitions(
    partitions: &Partitions,
    config: &GeneratorConfig,
) -> Result<String, GenerateError> {
    let mut lines: Vec<String> = PREAMBLE.trim_end().lines().map(str::to_string).collect();
    lines.extend(render_base_workflow(&partitions.base, config));
    lines.extend(render_browser_workflow(&partitions.browsers, config)?);
    lines.extend(render_included_workflow(&partitions.included));

    Ok(lines.join(EOL) + EOL)
}

/// Write the rendered document, wholly replacing any previous content.
pub fn write_document(path: &Path, document: &str) -> Result<(), GenerateError> {
    fs::write(path, document).map_err(|e| GenerateError::Io(e, path.to_path_buf()))
}

// ============================================================================
// Workflow blocks
// ============================================================================

fn render_base_workflow(partition: &Partition, config: &GeneratorConfig) -> Vec<String> {
    let mut lines = workflow_header("build-base-images");
    for tag in &partition.kept {
        lines.extend(job_header("build-base-image", tag));
        if !config.unversioned.base.contains(&tag.tag) {
            lines.push(VERSION_CHECK_PARAM.to_string());
        }
    }
    lines
}

fn render_browser_workflow(
    partition: &Partition,
    config: &GeneratorConfig,
) -> Result<Vec<String>, GenerateError> {
    let mut lines = workflow_header("build-browser-images");
    for tag in &partition.kept {
        let browsers = tag::detect_browsers(&tag.tag);
        if browsers.is_empty() {
            return Err(GenerateError::UnknownBrowser(tag.tag.clone()));
        }
        lines.extend(job_header("build-browser-image", tag));
        if let Some(chrome) = &browsers.chrome {
            lines.push(param("chromeVersion", chrome));
        }
        if let Some(firefox) = &browsers.firefox {
            lines.push(param("firefoxVersion", firefox));
        }
        if let Some(edge) = &browsers.edge {
            lines.push(param("edgeVersion", edge));
        }
        if !config.unversioned.browsers.contains(&tag.tag) {
            lines.push(VERSION_CHECK_PARAM.to_string());
        }
    }
    Ok(lines)
}

fn render_included_workflow(partition: &Partition) -> Vec<String> {
    let mut lines = workflow_header("build-included-images");
    for tag in &partition.kept {
        lines.extend(job_header("build-included-image", tag));
    }
    lines
}

/// A workflow block always renders its header, even with zero jobs, so an
/// empty category degrades to an empty job list rather than vanishing.
fn workflow_header(name: &str) -> Vec<String> {
    vec![format!("  {name}:"), "    jobs:".to_string()]
}

fn job_header(job: &str, tag: &ImageTag) -> Vec<String> {
    vec![
        format!("      - {job}:"),
        param("name", &tag.display_name()),
        param("dockerTag", &tag.tag),
    ]
}

fn param(key: &str, value: &str) -> String {
    format!("          {key}: \"{value}\"")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Category;
    use tempfile::TempDir;

    fn manifest(base: &[&str], browsers: &[&str], included: &[&str]) -> Manifest {
        let tags = |category, names: &[&str]| {
            names
                .iter()
                .map(|n| ImageTag::new(category, n))
                .collect::<Vec<_>>()
        };
        Manifest {
            base: tags(Category::Base, base),
            browsers: tags(Category::Browsers, browsers),
            included: tags(Category::Included, included),
        }
    }

    fn render(manifest: &Manifest) -> String {
        render_document(manifest, &GeneratorConfig::default()).unwrap()
    }

    /// Assert the document contains `expected` as consecutive lines.
    fn assert_block(doc: &str, expected: &[&str]) {
        let lines: Vec<&str> = doc.lines().collect();
        assert!(
            lines.windows(expected.len()).any(|w| w == expected),
            "expected consecutive lines not found:\n{}\n--- in document:\n{}",
            expected.join("\n"),
            doc
        );
    }

    fn count_lines(doc: &str, wanted: &str) -> usize {
        doc.lines().filter(|line| *line == wanted).count()
    }

    // =========================================================================
    // Job block shape
    // =========================================================================

    #[test]
    fn base_job_block_shape() {
        let doc = render(&manifest(&["10.0.0"], &[], &[]));
        assert_block(
            &doc,
            &[
                "      - build-base-image:",
                "          name: \"base 10.0.0\"",
                "          dockerTag: \"10.0.0\"",
                "          checkNodeVersion: true",
            ],
        );
    }

    #[test]
    fn unversioned_base_tag_omits_version_check() {
        let doc = render(&manifest(&["12.0.0-libgbm"], &[], &[]));
        assert_block(
            &doc,
            &[
                "      - build-base-image:",
                "          name: \"base 12.0.0-libgbm\"",
                "          dockerTag: \"12.0.0-libgbm\"",
            ],
        );
        assert_eq!(count_lines(&doc, "          checkNodeVersion: true"), 0);
    }

    #[test]
    fn manjaro_base_tag_omits_version_check() {
        let doc = render(&manifest(&["manjaro-14.12.0"], &[], &[]));
        assert_eq!(count_lines(&doc, "          checkNodeVersion: true"), 0);
    }

    #[test]
    fn versioned_and_unversioned_base_tags_mix() {
        let doc = render(&manifest(&["10.0.0", "12.0.0-libgbm"], &[], &[]));
        assert_eq!(count_lines(&doc, "      - build-base-image:"), 2);
        // Only the plainly-versioned tag carries the check parameter.
        assert_eq!(count_lines(&doc, "          checkNodeVersion: true"), 1);
        assert_block(
            &doc,
            &[
                "          dockerTag: \"10.0.0\"",
                "          checkNodeVersion: true",
                "      - build-base-image:",
                "          name: \"base 12.0.0-libgbm\"",
            ],
        );
    }

    #[test]
    fn browser_job_includes_detected_versions() {
        let doc = render(&manifest(&[], &["node12.4.0-chrome76"], &[]));
        assert_block(
            &doc,
            &[
                "      - build-browser-image:",
                "          name: \"browsers node12.4.0-chrome76\"",
                "          dockerTag: \"node12.4.0-chrome76\"",
                "          chromeVersion: \"Google Chrome 76\"",
                "          checkNodeVersion: true",
            ],
        );
    }

    #[test]
    fn browser_job_with_chrome_and_firefox() {
        let doc = render(&manifest(&[], &["node10.16.3-chrome80-ff73"], &[]));
        assert_block(
            &doc,
            &[
                "          chromeVersion: \"Google Chrome 80\"",
                "          firefoxVersion: \"Mozilla Firefox 73\"",
            ],
        );
    }

    #[test]
    fn browser_job_with_edge() {
        let doc = render(&manifest(&[], &["node14.10.1-edge88"], &[]));
        assert_block(&doc, &["          edgeVersion: \"Microsoft Edge 88\""]);
    }

    #[test]
    fn unversioned_browsers_tag_omits_version_check() {
        let mut config = GeneratorConfig::default();
        config.unversioned.browsers = vec!["node12.4.0-chrome76".to_string()];

        let doc = render_document(&manifest(&[], &["node12.4.0-chrome76"], &[]), &config).unwrap();
        assert_block(
            &doc,
            &[
                "      - build-browser-image:",
                "          name: \"browsers node12.4.0-chrome76\"",
                "          dockerTag: \"node12.4.0-chrome76\"",
                "          chromeVersion: \"Google Chrome 76\"",
            ],
        );
        assert_eq!(count_lines(&doc, "          checkNodeVersion: true"), 0);
    }

    #[test]
    fn included_job_has_no_version_check() {
        let doc = render(&manifest(&[], &[], &["6.0.0"]));
        assert_block(
            &doc,
            &[
                "      - build-included-image:",
                "          name: \"included 6.0.0\"",
                "          dockerTag: \"6.0.0\"",
            ],
        );
        assert_eq!(count_lines(&doc, "          checkNodeVersion: true"), 0);
    }

    // =========================================================================
    // Fatal tags
    // =========================================================================

    #[test]
    fn browser_tag_without_browser_is_fatal() {
        let result = render_document(
            &manifest(&[], &["node12.0.0"], &[]),
            &GeneratorConfig::default(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, GenerateError::UnknownBrowser(_)));
        let msg = err.to_string();
        assert!(msg.contains("node12.0.0"));
        assert!(msg.contains("browsers"));
    }

    #[test]
    fn included_tag_without_semver_is_fatal() {
        let result = render_document(
            &manifest(&[], &[], &["latest"]),
            &GeneratorConfig::default(),
        );
        let err = result.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("latest"));
        assert!(msg.contains("included"));
    }

    // =========================================================================
    // Skip behavior
    // =========================================================================

    #[test]
    fn skipped_tags_emit_no_job() {
        // "8.0.0" and "chrome69" are on the stock deny lists.
        let doc = render(&manifest(&["10.0.0", "8.0.0"], &["chrome69"], &["5.4.0", "6.0.0"]));
        assert!(!doc.contains("name: \"base 8.0.0\""));
        assert!(!doc.contains("name: \"browsers chrome69\""));
        assert!(!doc.contains("name: \"included 5.4.0\""));
        assert!(doc.contains("name: \"base 10.0.0\""));
        assert!(doc.contains("name: \"included 6.0.0\""));
    }

    #[test]
    fn one_job_per_kept_tag() {
        let doc = render(&manifest(&["10.0.0", "11.0.0"], &[], &["6.0.0", "7.0.0"]));
        assert_eq!(count_lines(&doc, "      - build-base-image:"), 2);
        assert_eq!(count_lines(&doc, "      - build-included-image:"), 2);
    }

    // =========================================================================
    // Document assembly
    // =========================================================================

    #[test]
    fn document_begins_with_preamble() {
        let doc = render(&manifest(&[], &[], &[]));
        assert!(doc.starts_with("# WARNING"));
        assert!(doc.lines().any(|l| l == "version: 2.1"));
        assert!(doc.lines().any(|l| l == "workflows:"));
    }

    #[test]
    fn empty_categories_keep_workflow_headers() {
        let doc = render(&manifest(&[], &[], &[]));
        assert_block(&doc, &["  build-base-images:", "    jobs:"]);
        assert_block(&doc, &["  build-browser-images:", "    jobs:"]);
        assert_block(&doc, &["  build-included-images:", "    jobs:"]);
    }

    #[test]
    fn workflows_render_in_fixed_order() {
        let doc = render(&manifest(&["10.0.0"], &["chrome76"], &["6.0.0"]));
        let base = doc.find("  build-base-images:").unwrap();
        let browsers = doc.find("  build-browser-images:").unwrap();
        let included = doc.find("  build-included-images:").unwrap();
        assert!(base < browsers);
        assert!(browsers < included);
    }

    #[test]
    fn document_ends_with_single_terminator() {
        let doc = render(&manifest(&["10.0.0"], &[], &[]));
        assert!(doc.ends_with(EOL));
        assert!(!doc.ends_with(&format!("{EOL}{EOL}")));
    }

    #[test]
    fn rendering_is_deterministic() {
        let m = manifest(&["10.0.0", "12.0.0-libgbm"], &["chrome76"], &["6.0.0"]);
        let config = GeneratorConfig::default();
        let first = render_document(&m, &config).unwrap();
        let second = render_document(&m, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn render_partitions_matches_render_document() {
        let m = manifest(
            &["10.0.0", "8.0.0"],
            &["node12.4.0-chrome76"],
            &["5.4.0", "6.0.0"],
        );
        let config = GeneratorConfig::default();

        let partitions = skip::partition_manifest(&m, &config).unwrap();
        let from_partitions = render_partitions(&partitions, &config).unwrap();
        assert_eq!(from_partitions, render_document(&m, &config).unwrap());
    }

    // =========================================================================
    // Writing
    // =========================================================================

    #[test]
    fn write_document_replaces_previous_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("circle.yml");
        fs::write(&path, "stale content\nwith more lines\n").unwrap();

        write_document(&path, "fresh\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn write_failure_names_the_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no-such-dir").join("circle.yml");

        let err = write_document(&path, "content").unwrap_err();
        assert!(matches!(err, GenerateError::Io(..)));
        assert!(err.to_string().contains("no-such-dir"));
    }
}
