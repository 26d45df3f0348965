//! Placeholder substitution across a materialised template tree

use crate::error::{Result, ScaffoldError};
use crate::templates::descriptor::Placeholders;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never rewritten
pub const IGNORED_DIRS: &[&str] = &["node_modules", "dist", ".git"];

/// Lockfiles never rewritten
pub const IGNORED_FILES: &[&str] = &[
    "bun.lock",
    "bun.lockb",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
];

/// Directory holding the packages of a monorepo template
pub const PACKAGES_DIR: &str = "packages";

/// A literal token and the literal that replaces every occurrence of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReplacement {
    pub token: String,
    pub value: String,
}

impl PlaceholderReplacement {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }

    /// Replace all occurrences of the token in `text`
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.token, &self.value)
    }
}

/// User answers feeding the replacement list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub project_name: String,
    pub github_username: String,
    pub github_repo: String,
    /// Present only when a monorepo layout was requested
    pub first_package: Option<String>,
}

/// Build the ordered replacement list for a template's placeholders
pub fn replacements(
    placeholders: &Placeholders,
    identity: &ProjectIdentity,
) -> Vec<PlaceholderReplacement> {
    let mut list = vec![
        PlaceholderReplacement::new(placeholders.github_username, &identity.github_username),
        PlaceholderReplacement::new(placeholders.github_repo, &identity.github_repo),
        PlaceholderReplacement::new(placeholders.project_name, &identity.project_name),
    ];
    if let Some(package) = &identity.first_package {
        list.push(PlaceholderReplacement::new(
            placeholders.monorepo_first_package,
            package,
        ));
    }
    list
}

fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        entry.depth() > 0 && IGNORED_DIRS.contains(&name.as_ref())
    } else {
        IGNORED_FILES.contains(&name.as_ref())
    }
}

/// Apply `replacements` in order to every text file below `root`.
///
/// Non-UTF-8 files are treated as binary and skipped. Returns the files that
/// were actually changed.
pub fn replace_in_tree(root: &Path, replacements: &[PlaceholderReplacement]) -> Result<Vec<PathBuf>> {
    let mut changed = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ScaffoldError::io("Failed to walk template tree", path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let bytes = std::fs::read(path)
            .map_err(|e| ScaffoldError::io("Failed to read file", path, e))?;
        let Ok(original) = String::from_utf8(bytes) else {
            tracing::trace!(path = %path.display(), "skipping binary file");
            continue;
        };

        let rewritten = replacements
            .iter()
            .fold(original.clone(), |text, replacement| replacement.apply(&text));

        if rewritten != original {
            std::fs::write(path, rewritten)
                .map_err(|e| ScaffoldError::io("Failed to write file", path, e))?;
            changed.push(path.to_path_buf());
        }
    }

    tracing::debug!(files = changed.len(), root = %root.display(), "placeholders replaced");
    Ok(changed)
}

/// Rename `<root>/packages/<from>` to `<root>/packages/<to>`.
///
/// Returns `Ok(false)` when the source directory does not exist. An existing
/// target is never merged into or replaced.
pub fn rename_package_dir(root: &Path, from: &str, to: &str) -> Result<bool> {
    let packages = root.join(PACKAGES_DIR);
    let source = packages.join(from);
    if !source.is_dir() || from == to {
        return Ok(false);
    }

    let target = packages.join(to);
    if target.exists() {
        return Err(ScaffoldError::PackageDirExists(target));
    }
    std::fs::rename(&source, &target)
        .map_err(|e| ScaffoldError::io("Failed to rename package directory", &source, e))?;
    tracing::debug!(from = %source.display(), to = %target.display(), "package directory renamed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::descriptor::TemplateKind;

    fn identity(first_package: Option<&str>) -> ProjectIdentity {
        ProjectIdentity {
            project_name: "awesome-lib".to_string(),
            github_username: "octocat".to_string(),
            github_repo: "awesome-repo".to_string(),
            first_package: first_package.map(str::to_string),
        }
    }

    #[test]
    fn test_replacement_is_global() {
        let r = PlaceholderReplacement::new("TOKEN", "x");
        assert_eq!(r.apply("TOKEN and TOKEN again"), "x and x again");
    }

    #[test]
    fn test_replacement_leaves_other_tokens() {
        let a = PlaceholderReplacement::new("TOKEN_A", "a");
        assert_eq!(a.apply("TOKEN_A TOKEN_B"), "a TOKEN_B");
        // Applying twice changes nothing further
        assert_eq!(a.apply(&a.apply("TOKEN_A TOKEN_B")), "a TOKEN_B");
    }

    #[test]
    fn test_monorepo_replacement_only_with_package() {
        let placeholders = TemplateKind::LibraryTypescript.descriptor().placeholders;
        assert_eq!(replacements(&placeholders, &identity(None)).len(), 3);

        let with_package = replacements(&placeholders, &identity(Some("core")));
        assert_eq!(with_package.len(), 4);
        assert_eq!(with_package[3].token, placeholders.monorepo_first_package);
        assert_eq!(with_package[3].value, "core");
    }

    #[test]
    fn test_replace_in_tree_skips_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        std::fs::create_dir_all(root.join("dist")).unwrap();
        std::fs::write(root.join("package.json"), r#"{"name":"NAME","repo":"NAME"}"#).unwrap();
        std::fs::write(root.join("src/index.ts"), "// NAME").unwrap();
        std::fs::write(root.join("node_modules/dep/index.js"), "NAME").unwrap();
        std::fs::write(root.join("dist/index.js"), "NAME").unwrap();
        std::fs::write(root.join("bun.lock"), "NAME").unwrap();
        std::fs::write(root.join("logo.bin"), [0xff, 0xfe, b'N']).unwrap();

        let changed =
            replace_in_tree(root, &[PlaceholderReplacement::new("NAME", "lib")]).unwrap();

        assert_eq!(changed.len(), 2);
        assert_eq!(
            std::fs::read_to_string(root.join("package.json")).unwrap(),
            r#"{"name":"lib","repo":"lib"}"#
        );
        assert_eq!(std::fs::read_to_string(root.join("src/index.ts")).unwrap(), "// lib");
        assert_eq!(
            std::fs::read_to_string(root.join("node_modules/dep/index.js")).unwrap(),
            "NAME"
        );
        assert_eq!(std::fs::read_to_string(root.join("dist/index.js")).unwrap(), "NAME");
        assert_eq!(std::fs::read_to_string(root.join("bun.lock")).unwrap(), "NAME");
        assert_eq!(std::fs::read(root.join("logo.bin")).unwrap(), vec![0xff, 0xfe, b'N']);
    }

    #[test]
    fn test_rename_package_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("packages/placeholder-package-1/src")).unwrap();
        std::fs::write(root.join("packages/placeholder-package-1/src/index.ts"), "x").unwrap();

        assert!(rename_package_dir(root, "placeholder-package-1", "core").unwrap());
        assert!(!root.join("packages/placeholder-package-1").exists());
        assert!(root.join("packages/core/src/index.ts").is_file());
    }

    #[test]
    fn test_rename_skipped_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!rename_package_dir(dir.path(), "placeholder-package-1", "core").unwrap());
    }

    #[test]
    fn test_rename_refuses_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("packages/placeholder-package-1")).unwrap();
        std::fs::create_dir_all(root.join("packages/utils/src")).unwrap();
        std::fs::write(root.join("packages/utils/src/index.ts"), "utils").unwrap();

        let err = rename_package_dir(root, "placeholder-package-1", "utils").unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::PackageDirExists(ref p) if p.ends_with("packages/utils")
        ));
        assert!(err.to_string().contains("already exists"));
        assert!(root.join("packages/placeholder-package-1").is_dir());
        assert_eq!(
            std::fs::read_to_string(root.join("packages/utils/src/index.ts")).unwrap(),
            "utils"
        );
    }
}
