//! Pure decision logic
//!
//! This module contains logic that is independent of process execution and
//! terminal I/O, so it can be exercised directly from tests.

pub mod planner;

pub use planner::{InstallRequest, Plan, Transition, VersionTransitionPlanner};
