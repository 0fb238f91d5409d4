//! Version catalog: the static package tables the planner works from.
//!
//! The catalog describes the pyATS package family: which distributions make up
//! the core framework and its add-ons, which genie layout each release ships,
//! and which packages must be removed before moving onto a given release.
//! A built-in catalog mirrors the published releases; a JSON file with the
//! same shape can replace it (`--catalog`).

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{InstallerError, Result};
use crate::types::{Extra, Variant, VersionSpec};

/// Sorted, duplicate-free set of distribution names
pub type PackageSet = BTreeSet<String>;

/// Packages to remove before installing the release a rule is keyed on.
///
/// Entries are either literal distribution names or group names:
/// `pyats[<extra>]` means the full removal set, `pyats` the core table and
/// `genie` the genie table of the installed layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub uninstall: Vec<String>,
}

/// Complete description of the package family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Distribution name passed to the package manager
    pub package: String,
    /// Newest known release; requesting it installs unpinned
    pub latest: VersionSpec,
    /// First release shipping the current genie layout
    pub layout_boundary: VersionSpec,
    pub core: PackageSet,
    pub legacy_genie: PackageSet,
    pub current_genie: PackageSet,
    pub robot: PackageSet,
    pub unicon: PackageSet,
    /// Special-case removals keyed by the release that needs them
    #[serde(default)]
    pub transitions: BTreeMap<VersionSpec, TransitionRule>,
}

/// Distribution names as pip accepts them: ASCII letters, digits, `-`, `_` and `.`
fn is_distribution_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A distribution name, optionally followed by one bracketed extra
fn is_rule_entry(entry: &str) -> bool {
    match entry.split_once('[') {
        Some((name, rest)) => rest
            .strip_suffix(']')
            .is_some_and(|extra| is_distribution_name(name) && is_distribution_name(extra)),
        None => is_distribution_name(entry),
    }
}

fn set(names: &[&str]) -> PackageSet {
    names.iter().map(|s| (*s).to_string()).collect()
}

const CORE: &[&str] = &[
    "pyats",
    "pyats.aereport",
    "pyats.aetest",
    "pyats.async",
    "pyats.cisco",
    "pyats.log",
    "pyats.kleenex",
    "pyats.connections",
    "pyats.datastructures",
    "pyats.easypy",
    "pyats.results",
    "pyats.reporter",
    "pyats.tcl",
    "pyats.topology",
    "pyats.utils",
    "pyats.templates",
    "pyats.examples",
];

// Shipped up to and excluding 20.1
const LEGACY_GENIE: &[&str] = &[
    "genie",
    "genie.abstract",
    "genie.metaparser",
    "genie.libs.parser",
    "genie.parsergen",
    "genie.telemetry",
    "genie.libs.telemetry",
    "genie.conf",
    "genie.ops",
    "genie.harness",
    "genie.predcore",
    "genie.utils",
    "genie.libs.conf",
    "genie.libs.ops",
    "genie.libs.sdk",
    "genie.libs.filetransferutils",
    "genie.trafficgen",
    "genie.example",
];

const CURRENT_GENIE: &[&str] = &[
    "genie",
    "genie.libs.conf",
    "genie.libs.filetransferutils",
    "genie.libs.ops",
    "genie.libs.parser",
    "genie.libs.sdk",
    "genie.telemetry",
    "genie.trafficgen",
];

const ROBOT: &[&str] = &["pyats.robot", "genie.libs.robot"];

const UNICON: &[&str] = &["unicon", "unicon.plugins"];

impl Catalog {
    /// The catalog of published releases
    pub fn builtin() -> Self {
        let rule = |names: &[&str]| TransitionRule {
            uninstall: names.iter().map(|s| (*s).to_string()).collect(),
        };

        let mut transitions = BTreeMap::new();
        transitions.insert(VersionSpec::new(20, 1), rule(&["pyats[full]"]));
        transitions.insert(VersionSpec::new(19, 11), rule(&["unicon"]));
        transitions.insert(
            VersionSpec::new(19, 7),
            rule(&["genie.example", "pyats.templates", "pyats.examples"]),
        );

        Self {
            package: "pyats".to_string(),
            latest: VersionSpec::new(20, 1),
            layout_boundary: VersionSpec::new(20, 1),
            core: set(CORE),
            legacy_genie: set(LEGACY_GENIE),
            current_genie: set(CURRENT_GENIE),
            robot: set(ROBOT),
            unicon: set(UNICON),
            transitions,
        }
    }

    /// Load a catalog from a JSON file and validate it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AnyResult<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let catalog: Self = serde_json::from_str(&content)
            .map_err(InstallerError::from)
            .context("Failed to parse catalog JSON")?;
        catalog.validate()?;

        Ok(catalog)
    }

    /// Save the catalog as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AnyResult<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize catalog to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check internal consistency.
    ///
    /// Every name ends up on a shell command line, so table entries must be
    /// plain distribution names and rule entries may additionally use the
    /// `<package>[<extra>]` group form.
    pub fn validate(&self) -> Result<()> {
        if !is_distribution_name(&self.package) {
            return Err(InstallerError::catalog(format!(
                "invalid package name: {:?}",
                self.package
            )));
        }
        if self.core.is_empty() {
            return Err(InstallerError::catalog("core package table is empty"));
        }
        if self.layout_boundary > self.latest {
            return Err(InstallerError::catalog(format!(
                "layout boundary {} is newer than latest release {}",
                self.layout_boundary, self.latest
            )));
        }

        let tables = [
            ("core", &self.core),
            ("legacy_genie", &self.legacy_genie),
            ("current_genie", &self.current_genie),
            ("robot", &self.robot),
            ("unicon", &self.unicon),
        ];
        for (table, names) in tables {
            if let Some(name) = names.iter().find(|name| !is_distribution_name(name)) {
                return Err(InstallerError::catalog(format!(
                    "{} table contains an invalid package name: {:?}",
                    table, name
                )));
            }
        }

        if let Some(version) = self.transitions.keys().find(|v| **v > self.latest) {
            return Err(InstallerError::catalog(format!(
                "transition rule for {} is newer than latest release {}",
                version, self.latest
            )));
        }
        for (version, rule) in &self.transitions {
            if let Some(entry) = rule.uninstall.iter().find(|e| !is_rule_entry(e)) {
                return Err(InstallerError::catalog(format!(
                    "transition rule for {} contains an invalid package name: {:?}",
                    version, entry
                )));
            }
        }
        Ok(())
    }

    /// Genie table for a layout
    pub fn genie(&self, variant: Variant) -> &PackageSet {
        match variant {
            Variant::Legacy => &self.legacy_genie,
            Variant::Current => &self.current_genie,
        }
    }

    /// Every distribution installed by the `full` extra for a layout
    pub fn full_removal_set(&self, variant: Variant) -> PackageSet {
        self.core
            .iter()
            .chain(self.genie(variant))
            .chain(&self.robot)
            .chain(&self.unicon)
            .cloned()
            .collect()
    }

    /// Expand one rule entry into concrete distribution names
    pub fn expand_group(&self, entry: &str, variant: Variant) -> PackageSet {
        let bracketed = entry
            .strip_prefix(self.package.as_str())
            .is_some_and(|rest| rest.starts_with('[') && rest.ends_with(']'));

        if bracketed {
            self.full_removal_set(variant)
        } else if entry == self.package {
            self.core.clone()
        } else if entry == "genie" {
            self.genie(variant).clone()
        } else {
            set(&[entry])
        }
    }

    /// Packages to remove when moving from `from` up to `to`.
    ///
    /// Collects the rules of every release in `(from, to]`. Returns `None`
    /// when no rule is crossed.
    pub fn crossed_removals(
        &self,
        from: &VersionSpec,
        to: &VersionSpec,
        variant: Variant,
    ) -> Option<PackageSet> {
        let mut crossed = self
            .transitions
            .iter()
            .filter(|(version, _)| *version > from && *version <= to)
            .peekable();
        crossed.peek()?;

        Some(
            crossed
                .flat_map(|(_, rule)| rule.uninstall.iter())
                .flat_map(|entry| self.expand_group(entry, variant))
                .collect(),
        )
    }

    /// Requirement string for an install (`pyats[full]`, `pyats==19.7`)
    pub fn requirement(&self, extra: Option<Extra>, pin: Option<&VersionSpec>) -> String {
        let mut requirement = self.package.clone();
        if let Some(extra) = extra {
            requirement.push_str(&format!("[{}]", extra));
        }
        if let Some(version) = pin {
            requirement.push_str(&format!("=={}", version));
        }
        requirement
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
