//! # circlegen
//!
//! A CircleCI config generator for a Docker image monorepo. The directory
//! tree is the data source: every subdirectory of the image roots is a
//! published tag, and the generated `circle.yml` carries one build-and-test
//! job per tag.
//!
//! # Architecture: Scan, Filter, Render, Write
//!
//! ```text
//! 1. Scan    base/ browsers/ included/  →  Manifest     (directories → tags)
//! 2. Filter  Manifest + circlegen.toml  →  Partitions   (skip lists, version floor)
//! 3. Render  Partitions                 →  document     (preamble + workflow blocks)
//! 4. Write   document                   →  circle.yml   (single whole-file write)
//! ```
//!
//! Filesystem reads happen only in scan and the single write only at the
//! end. This separation exists for three reasons:
//!
//! - **Deterministic output**: the same tree and config produce byte-identical
//!   text, so the committed file changes only when the images change.
//! - **No partial writes**: every fatal error fires before the output file
//!   is opened, so a failed run never leaves a half-written config behind.
//! - **Testability**: filter and render are value-to-value functions, so the
//!   output contract is asserted on plain strings without temp directories.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the image category roots and produces the tag manifest |
//! | [`tag`] | Dash-delimited tag grammar: browser detection and version extraction |
//! | [`skip`] | Partitions each category into kept and skipped tags |
//! | [`generate`] | Renders the output document and writes it |
//! | [`config`] | `circlegen.toml` loading, stock defaults, validation |
//! | [`output`] | Console formatting for scan reports, summaries, and check verdicts |
//!
//! # Design Decisions
//!
//! ## Text Emission, Not YAML Serialization
//!
//! The renderer emits lines under a fixed indentation contract instead of
//! building a document model for a YAML serializer. The output file is
//! committed and reviewed by humans, so indentation, key order, and quoting
//! must stay byte-stable across runs and across library upgrades; a
//! serializer's formatting choices would put that stability at a
//! dependency's mercy. The test suite parses the rendered document as YAML
//! to keep the emitted text well-formed.
//!
//! ## Skip Lists Are Data
//!
//! Which tags are excluded is configuration, not code. The exact-match deny
//! lists, the included version floor, and the version-check exemptions live
//! in [`config::GeneratorConfig`] with stock defaults compiled in, and an
//! optional `circlegen.toml` in the repo overrides them. Retiring an image
//! is a config edit committed next to the tree it governs.
//!
//! ## The Tag Grammar Is Parsed Once
//!
//! Image tags follow a dash-delimited convention (`node12.4.0-chrome76-ff73`).
//! [`tag::detect_browsers`] scans the components once into a structured
//! record; the renderer and the scan report both consume that record rather
//! than re-matching substrings. Unknown components are inert and the first
//! marker per browser wins, so the convention can grow new components
//! without breaking existing tags.
//!
//! ## Check Mode Keeps the File Honest
//!
//! The generated file opens with a warning header, but headers get ignored.
//! `circlegen check` re-renders the document in memory and compares bytes
//! against the committed file, failing with a nonzero exit when they differ.
//! Running it in CI turns "please regenerate after adding an image" from a
//! review comment into a failed build.
//!
//! # The Tree Is the Truth
//!
//! Adding an image to the fleet is `mkdir` plus `circlegen generate`; the
//! new job appears in `circle.yml` and both are committed together. Nothing
//! else needs to know the tag list: no job is written by hand, and no
//! hand-written job can drift from the directories that actually exist.

pub mod config;
pub mod generate;
pub mod output;
pub mod scan;
pub mod skip;
pub mod tag;
