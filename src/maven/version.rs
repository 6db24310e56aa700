//! Release and snapshot version resolution.
//!
//! Driver versions follow the engine's four-part scheme and are tagged as
//! `v<major>.<minor>.<patch>.<build>`. A tagged release publishes exactly the
//! tag's numbers; a snapshot bumps the patch component, resets the build
//! component and carries the short commit id so every snapshot is traceable.

use crate::maven::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(\d+)\.(\d+)\.(\d+)\.(\d+)$").expect("tag pattern is a valid regex")
});

/// Branch name that selects the snapshot pipeline instead of a tagged release.
pub const SNAPSHOT_REF: &str = "main";

/// Suffix Maven uses to recognise snapshot versions.
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Numeric components of a `v1.2.3.4` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagVersion {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
    /// Build component
    pub build: u64,
}

impl TagVersion {
    /// Parses a tag of the form `v1.2.3.4`.
    ///
    /// Surrounding whitespace is ignored; anything else that does not match
    /// the pattern exactly is an [`Error::InvalidTag`] carrying the input.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let invalid = || Error::InvalidTag {
            tag: tag.to_string(),
        };
        let captures = TAG_PATTERN.captures(trimmed).ok_or_else(invalid)?;
        let component = |index: usize| -> Result<u64> {
            captures[index].parse::<u64>().map_err(|_| invalid())
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            build: component(4)?,
        })
    }

    /// Version published for this tag: the four components verbatim.
    pub fn release(&self) -> ReleaseVersion {
        ReleaseVersion(format!(
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        ))
    }

    /// Snapshot version following this tag.
    ///
    /// `v1.4.4.0` with commit `abc1234` becomes `1.4.5.0-abc1234-SNAPSHOT`.
    /// Without a commit id the suffix is just `-SNAPSHOT`. A patch component
    /// that cannot be bumped is an [`Error::InvalidTag`].
    pub fn next_snapshot(&self, commit: Option<&str>) -> Result<ReleaseVersion> {
        let patch = self.patch.checked_add(1).ok_or_else(|| Error::InvalidTag {
            tag: self.to_string(),
        })?;
        let base = format!("{}.{}.{}.0", self.major, self.minor, patch);
        Ok(match commit.map(str::trim).filter(|c| !c.is_empty()) {
            Some(commit) => ReleaseVersion(format!("{base}-{commit}-{SNAPSHOT_SUFFIX}")),
            None => ReleaseVersion(format!("{base}-{SNAPSHOT_SUFFIX}")),
        })
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Fully resolved version string used for artifact names and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Returns the version text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a snapshot version.
    pub fn is_snapshot(&self) -> bool {
        self.0.ends_with(SNAPSHOT_SUFFIX)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the positional release argument asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseRef {
    /// Publish a snapshot derived from the latest tag
    Snapshot,
    /// Publish the given tag
    Tag(TagVersion),
}

impl ReleaseRef {
    /// Interprets `main` as a snapshot request and anything else as a release tag.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim() == SNAPSHOT_REF {
            return Ok(Self::Snapshot);
        }
        TagVersion::parse(input).map(Self::Tag)
    }
}
