//! Package manifest (`package.json`) discovery and script merging

use crate::error::{Result, ScaffoldError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Manifest file name
pub const MANIFEST_FILE: &str = "package.json";

/// Find the nearest manifest, starting at `start` and walking up
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
}

/// Scripts this tool installs, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSet {
    entries: Vec<(String, String)>,
}

impl ScriptSet {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// `build`/`dev` scripts for a single package
    pub fn single() -> Self {
        Self::new([("build", "bunup"), ("dev", "bunup --watch")])
    }

    /// `build`/`dev` scripts for a workspace
    pub fn workspace() -> Self {
        Self::new([
            ("build", "bunup --workspace"),
            ("dev", "bunup --workspace --watch"),
        ])
    }

    pub fn for_layout(workspace: bool) -> Self {
        if workspace {
            Self::workspace()
        } else {
            Self::single()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Result of [`Manifest::merge_scripts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Scripts were written; `overwritten` lists the conflicting keys replaced
    Merged {
        added: Vec<String>,
        overwritten: Vec<String>,
    },
    /// The user declined to overwrite; nothing changed
    Declined { conflicts: Vec<String> },
}

/// Confirmation message for a set of conflicting script names
pub fn conflict_message(conflicts: &[String]) -> String {
    let names = conflicts
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(", ");
    if conflicts.len() == 1 {
        format!("The script {} already exists in {}. Overwrite it?", names, MANIFEST_FILE)
    } else {
        format!(
            "The scripts {} already exist in {}. Overwrite them?",
            names, MANIFEST_FILE
        )
    }
}

/// A parsed manifest. Top-level key order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl Manifest {
    /// Load and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScaffoldError::io("Failed to read manifest", path, e))?;
        Self::parse(path.to_path_buf(), &content)
    }

    /// Parse manifest text that was read from `path`
    pub fn parse(path: PathBuf, content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|source| ScaffoldError::InvalidManifest {
                path: path.clone(),
                source,
            })?;
        match value {
            Value::Object(fields) => Ok(Self { path, fields }),
            _ => Err(ScaffoldError::ManifestNotObject(path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The current scripts table, if any
    pub fn scripts(&self) -> Result<Option<&Map<String, Value>>> {
        match self.fields.get("scripts") {
            None => Ok(None),
            Some(Value::Object(scripts)) => Ok(Some(scripts)),
            Some(_) => Err(ScaffoldError::ScriptsNotObject(self.path.clone())),
        }
    }

    /// Keys of `scripts` already present in the manifest, with any value
    pub fn conflicting_scripts(&self, scripts: &ScriptSet) -> Result<Vec<String>> {
        let Some(existing) = self.scripts()? else {
            return Ok(Vec::new());
        };
        Ok(scripts
            .keys()
            .filter(|key| existing.contains_key(*key))
            .map(str::to_string)
            .collect())
    }

    /// Merge `scripts` into the manifest.
    ///
    /// `confirm` is only called when at least one key conflicts, once, with a
    /// message naming every conflicting key. Declining leaves the manifest as it
    /// was. Existing keys keep their position; new keys are appended.
    pub fn merge_scripts<F, E>(
        &mut self,
        scripts: &ScriptSet,
        confirm: F,
    ) -> std::result::Result<MergeOutcome, E>
    where
        F: FnOnce(&str) -> std::result::Result<bool, E>,
        E: From<ScaffoldError>,
    {
        let conflicts = self.conflicting_scripts(scripts)?;
        if !conflicts.is_empty() && !confirm(&conflict_message(&conflicts))? {
            tracing::info!(?conflicts, "script merge declined");
            return Ok(MergeOutcome::Declined { conflicts });
        }

        let table = self
            .fields
            .entry("scripts")
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(table) = table else {
            return Err(ScaffoldError::ScriptsNotObject(self.path.clone()).into());
        };

        let mut added = Vec::new();
        for (key, command) in scripts.iter() {
            if !table.contains_key(key) {
                added.push(key.to_string());
            }
            table.insert(key.to_string(), Value::String(command.to_string()));
        }

        tracing::debug!(?added, overwritten = ?conflicts, "scripts merged");
        Ok(MergeOutcome::Merged {
            added,
            overwritten: conflicts,
        })
    }

    /// Serialize with two-space indentation and a trailing newline
    pub fn to_json_string(&self) -> String {
        // A Map of Values always serializes
        let mut out = serde_json::to_string_pretty(&self.fields).unwrap_or_default();
        out.push('\n');
        out
    }

    /// Write the manifest back to where it was loaded from
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, self.to_json_string())
            .map_err(|e| ScaffoldError::io("Failed to write manifest", &self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: Value) -> Manifest {
        Manifest::parse(PathBuf::from("package.json"), &value.to_string()).unwrap()
    }

    fn scripts(manifest: &Manifest) -> Value {
        Value::Object(manifest.scripts().unwrap().cloned().unwrap_or_default())
    }

    fn accept(_: &str) -> std::result::Result<bool, ScaffoldError> {
        Ok(true)
    }

    fn decline(_: &str) -> std::result::Result<bool, ScaffoldError> {
        Ok(false)
    }

    fn never(_: &str) -> std::result::Result<bool, ScaffoldError> {
        panic!("confirmation requested without conflicts")
    }

    #[test]
    fn test_merge_without_conflicts_keeps_existing_first() {
        let mut m = manifest(json!({"name": "lib", "scripts": {"test": "x"}}));
        let outcome = m.merge_scripts(&ScriptSet::single(), never).unwrap();

        assert_eq!(
            outcome,
            MergeOutcome::Merged {
                added: vec!["build".to_string(), "dev".to_string()],
                overwritten: vec![],
            }
        );
        let keys: Vec<&String> = m.scripts().unwrap().unwrap().keys().collect();
        assert_eq!(keys, ["test", "build", "dev"]);
        assert_eq!(
            scripts(&m),
            json!({"test": "x", "build": "bunup", "dev": "bunup --watch"})
        );
    }

    #[test]
    fn test_merge_conflict_declined_leaves_manifest() {
        let original = manifest(json!({"name": "lib", "scripts": {"build": "old"}}));
        let mut m = original.clone();
        let outcome = m.merge_scripts(&ScriptSet::single(), decline).unwrap();

        assert_eq!(
            outcome,
            MergeOutcome::Declined {
                conflicts: vec!["build".to_string()]
            }
        );
        assert_eq!(m, original);
    }

    #[test]
    fn test_merge_conflict_accepted_overwrites() {
        let mut m = manifest(json!({
            "name": "lib",
            "version": "1.0.0",
            "scripts": {"build": "old", "lint": "eslint"},
            "devDependencies": {"typescript": "^5"}
        }));
        let outcome = m.merge_scripts(&ScriptSet::single(), accept).unwrap();

        assert_eq!(
            outcome,
            MergeOutcome::Merged {
                added: vec!["dev".to_string()],
                overwritten: vec!["build".to_string()],
            }
        );
        assert_eq!(
            scripts(&m),
            json!({"build": "bunup", "lint": "eslint", "dev": "bunup --watch"})
        );
        let keys: Vec<&String> = m.fields().keys().collect();
        assert_eq!(keys, ["name", "version", "scripts", "devDependencies"]);
        assert_eq!(m.fields()["devDependencies"], json!({"typescript": "^5"}));
    }

    #[test]
    fn test_single_confirmation_for_all_conflicts() {
        let mut m = manifest(json!({"scripts": {"build": "a", "dev": "b"}}));
        let mut calls = 0;
        let outcome = m
            .merge_scripts(&ScriptSet::single(), |message| {
                calls += 1;
                assert!(message.contains("scripts \"build\", \"dev\" already exist"));
                Ok::<_, ScaffoldError>(true)
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert!(matches!(outcome, MergeOutcome::Merged { ref added, .. } if added.is_empty()));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut once = manifest(json!({"name": "lib", "scripts": {"build": "old", "test": "x"}}));
        once.merge_scripts(&ScriptSet::workspace(), accept).unwrap();
        let mut twice = once.clone();
        twice.merge_scripts(&ScriptSet::workspace(), accept).unwrap();
        assert_eq!(once.to_json_string(), twice.to_json_string());
    }

    #[test]
    fn test_missing_scripts_table_is_created() {
        let mut m = manifest(json!({"name": "lib"}));
        m.merge_scripts(&ScriptSet::single(), never).unwrap();
        assert_eq!(
            m.to_json_string(),
            "{\n  \"name\": \"lib\",\n  \"scripts\": {\n    \"build\": \"bunup\",\n    \"dev\": \"bunup --watch\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_scripts_not_object_is_error() {
        let mut m = manifest(json!({"scripts": "nope"}));
        let err = m.merge_scripts(&ScriptSet::single(), never).unwrap_err();
        assert!(matches!(err, ScaffoldError::ScriptsNotObject(_)));
    }

    #[test]
    fn test_conflict_message_pluralizes() {
        assert_eq!(
            conflict_message(&["build".to_string()]),
            "The script \"build\" already exists in package.json. Overwrite it?"
        );
        assert_eq!(
            conflict_message(&["build".to_string(), "dev".to_string()]),
            "The scripts \"build\", \"dev\" already exist in package.json. Overwrite them?"
        );
    }

    #[test]
    fn test_script_sets_differ_by_layout() {
        assert_ne!(ScriptSet::for_layout(true), ScriptSet::for_layout(false));
        assert_eq!(ScriptSet::for_layout(false), ScriptSet::single());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = Manifest::parse(PathBuf::from("package.json"), "{ nope").unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidManifest { .. }));
        let err = Manifest::parse(PathBuf::from("package.json"), "[]").unwrap_err();
        assert!(matches!(err, ScaffoldError::ManifestNotObject(_)));
    }

    #[test]
    fn test_find_manifest_walks_up_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), r#"{"name":"lib"}"#).unwrap();

        let path = find_manifest(&nested).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE));

        let mut m = Manifest::load(&path).unwrap();
        assert_eq!(m.root(), dir.path());
        m.merge_scripts(&ScriptSet::single(), never).unwrap();
        m.save().unwrap();

        let reloaded = Manifest::load(&path).unwrap();
        assert_eq!(reloaded.fields()["scripts"]["dev"], json!("bunup --watch"));
    }
}
