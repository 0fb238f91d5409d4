//! Tests for the Version Transition Planner
//!
//! These tests verify:
//! - Path selection (install, upgrade, boundary upgrade, downgrade, uninstall)
//! - Command ordering for two-step transitions
//! - Package sets used for removal

use pyats_installer::{
    Catalog, Extra, InstallRequest, InstallationState, InstallerError, PackageCommand, Transition,
    Variant, VersionSpec, VersionTransitionPlanner,
};

fn v(s: &str) -> VersionSpec {
    s.parse().expect("valid version")
}

fn installed(catalog: &Catalog, version: &str) -> InstallationState {
    let version = v(version);
    InstallationState::Installed {
        version,
        variant: Variant::for_version(&version, &catalog.layout_boundary),
    }
}

fn request(extra: Option<Extra>, version: Option<&str>) -> InstallRequest {
    InstallRequest {
        extra,
        version: version.map(str::to_string),
        uninstall: false,
    }
}

// =============================================================================
// Documented Transitions
// =============================================================================

#[test]
fn test_19_7_to_20_1_full_removes_legacy_layout_then_upgrades() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    let plan = planner
        .plan(&request(Some(Extra::Full), Some("20.1")), &installed(&catalog, "19.7"))
        .unwrap();

    assert_eq!(plan.transition, Transition::BoundaryUpgrade);
    assert_eq!(plan.commands.len(), 2);

    let PackageCommand::Uninstall { packages } = &plan.commands[0] else {
        panic!("first command must be the uninstall");
    };
    assert!(packages.contains("genie.abstract"), "legacy genie names are removed");
    assert!(packages.contains("genie.example"));
    assert!(packages.contains("unicon.plugins"));
    assert!(packages.contains("pyats.robot"));

    assert_eq!(
        plan.commands[1].render("pip3"),
        "pip3 install pyats[full] --upgrade"
    );
}

#[test]
fn test_default_version_is_latest() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    let explicit = planner
        .plan(&request(None, Some("20.1")), &installed(&catalog, "19.11"))
        .unwrap();
    let implicit = planner
        .plan(&request(None, None), &installed(&catalog, "19.11"))
        .unwrap();
    assert_eq!(explicit, implicit);
}

#[test]
fn test_exact_installed_version_never_takes_boundary_path() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    for version in ["19.7", "19.11", "20.1"] {
        let plan = planner
            .plan(&request(Some(Extra::Full), Some(version)), &installed(&catalog, version))
            .unwrap();
        assert_eq!(plan.transition, Transition::Upgrade, "version {}", version);
        assert_eq!(plan.commands.len(), 1);
        assert!(!plan.commands[0].is_uninstall());
    }
}

#[test]
fn test_upgrade_to_latest_beyond_every_rule_is_single_upgrade() {
    let mut catalog = Catalog::builtin();
    catalog.latest = v("20.3");
    let planner = VersionTransitionPlanner::new(&catalog);

    let plan = planner
        .plan(&request(None, None), &installed(&catalog, "20.2"))
        .unwrap();
    assert_eq!(plan.transition, Transition::Upgrade);
    assert_eq!(
        plan.commands,
        vec![PackageCommand::Install {
            requirement: "pyats".to_string(),
            upgrade: true,
        }]
    );
}

#[test]
fn test_downgrade_across_layout_uses_installed_variant() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    let plan = planner
        .plan(&request(None, Some("19.11")), &installed(&catalog, "20.1"))
        .unwrap();
    assert_eq!(plan.transition, Transition::Downgrade);
    assert_eq!(
        plan.commands,
        vec![
            PackageCommand::Uninstall {
                packages: catalog.full_removal_set(Variant::Current),
            },
            PackageCommand::Install {
                requirement: "pyats==19.11".to_string(),
                upgrade: false,
            },
        ]
    );
}

#[test]
fn test_downgrade_from_newer_than_catalog_still_pins() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    // Installed release newer than the catalog knows; default target is "latest"
    let plan = planner
        .plan(&request(None, None), &installed(&catalog, "21.4"))
        .unwrap();
    assert_eq!(plan.transition, Transition::Downgrade);
    assert_eq!(plan.commands[1].render("pip3"), "pip3 install pyats==20.1");
}

// =============================================================================
// Uninstall
// =============================================================================

#[test]
fn test_uninstall_with_nothing_installed_emits_nothing() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    let plan = planner
        .plan(
            &InstallRequest {
                uninstall: true,
                ..Default::default()
            },
            &InstallationState::NotInstalled,
        )
        .unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.transition, Transition::NothingToUninstall);
}

#[test]
fn test_uninstall_set_has_no_duplicates() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    let plan = planner
        .plan(
            &InstallRequest {
                uninstall: true,
                ..Default::default()
            },
            &installed(&catalog, "20.1"),
        )
        .unwrap();

    let line = plan.commands[0].render("pip3");
    let names: Vec<&str> = line
        .trim_start_matches("pip3 uninstall ")
        .trim_end_matches(" -y")
        .split(' ')
        .collect();
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(names.len(), deduped.len());
    assert_eq!(names.iter().filter(|n| **n == "genie").count(), 1);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unparseable_version_is_invalid_version() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    for bad in ["latest", "20", "20.1.x", ""] {
        let err = planner
            .plan(&request(None, Some(bad)), &InstallationState::NotInstalled)
            .unwrap_err();
        assert!(matches!(err, InstallerError::InvalidVersion(_)), "{:?}", bad);
    }
}

#[test]
fn test_version_absent_from_table_but_parseable_is_accepted() {
    let catalog = Catalog::builtin();
    let planner = VersionTransitionPlanner::new(&catalog);

    let plan = planner
        .plan(&request(Some(Extra::Library), Some("19.9")), &InstallationState::NotInstalled)
        .unwrap();
    assert_eq!(plan.commands[0].render("pip3"), "pip3 install pyats[library]==19.9");
}
