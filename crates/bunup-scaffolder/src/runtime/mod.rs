//! Package manager detection and dependency installation
//!
//! This module provides:
//! - Package manager detection (lockfiles, then Bun, then npm)
//! - Installing bunup as a dev dependency

pub mod check;
pub mod tool;

pub use check::{check_bun, detect_from_lockfile, detect_package_manager, PackageManager, RuntimeInfo};
pub use tool::{DevDependencyInstaller, BUNUP_PACKAGE};
