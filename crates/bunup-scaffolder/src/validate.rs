//! Prompt validators and the collectors built on top of them
//!
//! Validators return `Err(message)` to keep the prompt open; the message is
//! shown to the user as-is.

use crate::config::generator::WorkspacePackageSpec;
use std::path::{Component, Path, PathBuf};

/// Validate a new project name against the directory it would be created in
pub fn validate_project_name(input: &str, base_dir: &Path) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("Project name is required".to_string());
    }
    if input.chars().any(char::is_whitespace) {
        return Err("Project name cannot contain spaces".to_string());
    }
    if base_dir.join(input).exists() {
        return Err(format!("A file or directory named \"{}\" already exists", input));
    }
    Ok(())
}

/// Validate a plain identifier such as a GitHub username or package name
pub fn validate_identifier(input: &str, what: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err(format!("{} is required", what));
    }
    if input.chars().any(char::is_whitespace) {
        return Err(format!("{} cannot contain spaces", what));
    }
    Ok(())
}

/// Validate a workspace package name against the packages collected so far
pub fn validate_package_name(input: &str, existing: &[String]) -> Result<(), String> {
    let name = input.trim();
    if name.is_empty() {
        return Err("Package name is required".to_string());
    }
    if existing.iter().any(|n| n == name) {
        return Err(format!("Package \"{}\" was already added", name));
    }
    Ok(())
}

/// Validate a workspace package root relative to the project root
pub fn validate_package_root(input: &str, project_root: &Path) -> Result<(), String> {
    let root = input.trim();
    if root.is_empty() {
        return Err("Package root is required".to_string());
    }
    let path = project_root.join(root);
    if !path.exists() {
        return Err(format!("\"{}\" does not exist", root));
    }
    if !path.is_dir() {
        return Err(format!("\"{}\" is not a directory", root));
    }
    Ok(())
}

/// Normalize a user-typed path relative to `base` for storage and comparison.
///
/// `.` segments and repeated separators are dropped; the result is joined
/// with `/`. Paths that are absolute or climb out of `base` are rejected.
fn normalize_entry(input: &str, base: &Path) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Entry file is required".to_string());
    }

    let mut parts = Vec::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(format!("\"{}\" is not valid UTF-8", trimmed)),
            },
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(format!(
                    "\"{}\" is outside of {}",
                    trimmed,
                    base.display()
                ))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("Use a path relative to {}", base.display()))
            }
        }
    }

    if parts.is_empty() {
        return Err("Entry file is required".to_string());
    }
    Ok(parts.join("/"))
}

/// Accumulates entry files for one package.
///
/// Entries are checked against `base` on disk but stored relative to it.
#[derive(Debug, Clone)]
pub struct EntryCollector {
    base: PathBuf,
    entries: Vec<String>,
}

impl EntryCollector {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            entries: Vec::new(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check a candidate entry without adding it
    pub fn validate(&self, input: &str) -> Result<(), String> {
        let entry = normalize_entry(input, &self.base)?;
        if self.entries.contains(&entry) {
            return Err(format!("\"{}\" was already added", entry));
        }
        let path = self.base.join(&entry);
        if !path.exists() {
            return Err(format!("\"{}\" does not exist", entry));
        }
        if !path.is_file() {
            return Err(format!("\"{}\" is not a file", entry));
        }
        Ok(())
    }

    /// Validate and append an entry
    pub fn add(&mut self, input: &str) -> Result<(), String> {
        self.validate(input)?;
        self.entries.push(normalize_entry(input, &self.base)?);
        Ok(())
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Accumulates workspace packages, enforcing unique names
#[derive(Debug, Clone)]
pub struct PackageCollector {
    project_root: PathBuf,
    packages: Vec<WorkspacePackageSpec>,
}

impl PackageCollector {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            packages: Vec::new(),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    pub fn validate_name(&self, input: &str) -> Result<(), String> {
        validate_package_name(input, &self.names())
    }

    pub fn validate_root(&self, input: &str) -> Result<(), String> {
        validate_package_root(input, &self.project_root)
    }

    /// Entry collector scoped to a package root
    pub fn entry_collector(&self, root: &str) -> EntryCollector {
        EntryCollector::new(self.project_root.join(root.trim()))
    }

    /// Append a fully collected package
    pub fn add(&mut self, package: WorkspacePackageSpec) -> Result<(), String> {
        self.validate_name(&package.name)?;
        self.validate_root(&package.root)?;
        if package.entries.is_empty() {
            return Err(format!("Package \"{}\" has no entry files", package.name));
        }
        self.packages.push(WorkspacePackageSpec {
            name: package.name.trim().to_string(),
            root: package.root.trim().to_string(),
            ..package
        });
        Ok(())
    }

    pub fn into_packages(self) -> Vec<WorkspacePackageSpec> {
        self.packages
    }
}
