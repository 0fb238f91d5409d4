//! Type-safe value types for the installer
//!
//! Versions, extras and genie layout variants are parsed into proper Rust
//! types at the CLI boundary so the planner never handles raw strings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::InstallerError;

/// Pre-release marker of a version (`20.1a1`, `20.1b2`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha(u32),
    Beta(u32),
}

/// A release version of the form `major.minor[.patch][{a|b}N]`.
///
/// A missing patch component equals zero, so `20.1` and `20.1.0` compare
/// equal. A pre-release sorts before the release it precedes.
#[derive(Debug, Clone, Copy)]
pub struct VersionSpec {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre: Option<PreRelease>,
    /// Whether the patch component was written out, kept for display only.
    explicit_patch: bool,
}

impl VersionSpec {
    /// Create a `major.minor` release version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: 0,
            pre: None,
            explicit_patch: false,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    fn sort_key(&self) -> (u32, u32, u32, u8, u32) {
        // Releases sort after every pre-release of the same number
        let (rank, n) = match self.pre {
            Some(PreRelease::Alpha(n)) => (0, n),
            Some(PreRelease::Beta(n)) => (1, n),
            None => (2, 0),
        };
        (self.major, self.minor, self.patch, rank, n)
    }
}

impl PartialEq for VersionSpec {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for VersionSpec {}

impl std::hash::Hash for VersionSpec {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for VersionSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

fn parse_number(part: &str, input: &str) -> Result<u32, InstallerError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InstallerError::invalid_version(input));
    }
    part.parse()
        .map_err(|_| InstallerError::invalid_version(input))
}

impl FromStr for VersionSpec {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        // Split off a trailing pre-release tag first
        let (numbers, pre) = match input.find(['a', 'b']) {
            Some(idx) => {
                let n = parse_number(&input[idx + 1..], input)?;
                let pre = if input.as_bytes()[idx] == b'a' {
                    PreRelease::Alpha(n)
                } else {
                    PreRelease::Beta(n)
                };
                (&input[..idx], Some(pre))
            }
            None => (input, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        let (major, minor, patch) = match parts.as_slice() {
            [major, minor] => (major, minor, None),
            [major, minor, patch] => (major, minor, Some(patch)),
            _ => return Err(InstallerError::invalid_version(input)),
        };

        Ok(Self {
            major: parse_number(major, input)?,
            minor: parse_number(minor, input)?,
            patch: match patch {
                Some(p) => parse_number(p, input)?,
                None => 0,
            },
            pre,
            explicit_patch: patch.is_some(),
        })
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.explicit_patch || self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        match self.pre {
            Some(PreRelease::Alpha(n)) => write!(f, "a{}", n),
            Some(PreRelease::Beta(n)) => write!(f, "b{}", n),
            None => Ok(()),
        }
    }
}

impl Serialize for VersionSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Optional bundle installed alongside the core framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Extra {
    /// Everything: genie libraries, robot, unicon
    Full,
    /// Genie libraries only
    Library,
    /// Robot Framework integration
    Robot,
    /// Project templates
    Template,
}

/// Genie package-naming layout present on the machine.
///
/// The genie package family was reorganized in 20.1; installs older than
/// that carry the legacy set of distribution names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Legacy,
    Current,
}

impl Variant {
    /// Layout used by `version`, given the release that introduced the current one.
    pub fn for_version(version: &VersionSpec, boundary: &VersionSpec) -> Self {
        if version >= boundary {
            Self::Current
        } else {
            Self::Legacy
        }
    }
}

/// What is on the machine right now. Derived once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationState {
    NotInstalled,
    Installed {
        version: VersionSpec,
        variant: Variant,
    },
}
