//! Package manager detection for Bun, pnpm, Yarn and npm

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Bun,
    Pnpm,
    Yarn,
    Npm,
}

/// Lockfiles and the package manager that writes them, checked in order
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("bun.lock", PackageManager::Bun),
    ("bun.lockb", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    /// Binary name
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Bun => "bun",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Bun => "Bun",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "Yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Arguments adding `package` as a dev dependency
    pub fn add_dev_args(&self, package: &str) -> Vec<String> {
        let args: &[&str] = match self {
            PackageManager::Bun => &["add", "-d"],
            PackageManager::Pnpm | PackageManager::Yarn => &["add", "-D"],
            PackageManager::Npm => &["install", "-D"],
        };
        args.iter()
            .map(|a| a.to_string())
            .chain(std::iter::once(package.to_string()))
            .collect()
    }

    /// Full command line for display
    pub fn add_dev_command(&self, package: &str) -> String {
        format!("{} {}", self.command(), self.add_dev_args(package).join(" "))
    }

    /// Script runner shown in next steps
    pub fn run_command(&self, script: &str) -> String {
        format!("{} run {}", self.command(), script)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Package manager detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check whether a binary answers `--version`
pub fn check_binary(binary: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: binary,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: binary,
            version: None,
            available: false,
        },
    }
}

/// Check if Bun is available
pub fn check_bun() -> RuntimeInfo {
    check_binary("bun")
}

/// Package manager implied by a lockfile in `project_root`
pub fn detect_from_lockfile(project_root: &Path) -> Option<PackageManager> {
    LOCKFILES
        .iter()
        .find(|(file, _)| project_root.join(file).is_file())
        .map(|(_, pm)| *pm)
}

/// Pick the package manager for `project_root`: lockfile first, then Bun if
/// installed, then npm
pub fn detect_package_manager(project_root: &Path) -> PackageManager {
    if let Some(pm) = detect_from_lockfile(project_root) {
        tracing::debug!(package_manager = %pm, "detected from lockfile");
        return pm;
    }
    let bun = check_bun();
    if bun.available {
        tracing::debug!(version = ?bun.version, "no lockfile, using bun");
        PackageManager::Bun
    } else {
        tracing::debug!("no lockfile and bun not found, using npm");
        PackageManager::Npm
    }
}
