//! Skip filtering: decide which discovered tags get CI jobs.
//!
//! Base and browsers tags are filtered by exact-match deny lists; included
//! tags carry plain semver and are filtered by the configured minimum
//! version instead. Both partitions are kept (with the reason per skipped
//! tag) so the console output can show what was left out and why.

use crate::config::GeneratorConfig;
use crate::scan::{Category, ImageTag, Manifest};
use semver::Version;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkipError {
    #[error("{category} image tag \"{tag}\" is not a valid semantic version: {source}")]
    InvalidVersion {
        category: Category,
        tag: String,
        source: semver::Error,
    },
}

/// Why a tag was left out of the build matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// On the category's deny list.
    Listed,
    /// Included tag older than the configured minimum.
    BelowMinimum,
}

/// One category's tags split into the ones that get jobs and the ones that
/// don't. Order within each side follows the scan order (sorted by name).
#[derive(Debug)]
pub struct Partition {
    pub kept: Vec<ImageTag>,
    pub skipped: Vec<(ImageTag, SkipReason)>,
}

/// All three categories partitioned under one config.
#[derive(Debug)]
pub struct Partitions {
    pub base: Partition,
    pub browsers: Partition,
    pub included: Partition,
}

/// Partition a whole manifest using the configured rules.
pub fn partition_manifest(
    manifest: &Manifest,
    config: &GeneratorConfig,
) -> Result<Partitions, SkipError> {
    Ok(Partitions {
        base: partition_listed(&manifest.base, &config.skip.base),
        browsers: partition_listed(&manifest.browsers, &config.skip.browsers),
        included: partition_included(&manifest.included, &config.included.minimum)?,
    })
}

/// Partition a deny-list category (base or browsers). Matching is exact and
/// case-sensitive, whole tag against whole entry.
pub fn partition_listed(tags: &[ImageTag], deny: &[String]) -> Partition {
    let mut kept = Vec::new();
    let mut skipped = Vec::new();
    for tag in tags {
        if deny.iter().any(|entry| entry == &tag.tag) {
            skipped.push((tag.clone(), SkipReason::Listed));
        } else {
            kept.push(tag.clone());
        }
    }
    Partition { kept, skipped }
}

/// Partition the included category by the version threshold. A tag is kept
/// iff it parses as semver and is at or above `minimum`; an unparseable tag
/// is an error, not a skip.
pub fn partition_included(
    tags: &[ImageTag],
    minimum: &Version,
) -> Result<Partition, SkipError> {
    let mut kept = Vec::new();
    let mut skipped = Vec::new();
    for tag in tags {
        let version = Version::parse(&tag.tag).map_err(|e| SkipError::InvalidVersion {
            category: tag.category,
            tag: tag.tag.clone(),
            source: e,
        })?;
        if version >= *minimum {
            kept.push(tag.clone());
        } else {
            skipped.push((tag.clone(), SkipReason::BelowMinimum));
        }
    }
    Ok(Partition { kept, skipped })
}
