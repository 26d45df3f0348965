//! Error types for scaffolding operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library layer.
///
/// Prompt validation problems are not represented here: they are plain strings
/// handed back to the prompt so the user can correct their input.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("No package.json found in {} or any parent directory", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to parse {}: {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain a JSON object at the top level", .0.display())]
    ManifestNotObject(PathBuf),

    #[error("The \"scripts\" field in {} is not an object", .0.display())]
    ScriptsNotObject(PathBuf),

    #[error("Template directory '{0}' not found in the template archive")]
    TemplateDirMissing(String),

    #[error("Package directory {} already exists", .0.display())]
    PackageDirExists(PathBuf),

    #[error("Refusing to extract unsafe archive path '{0}'")]
    UnsafeArchivePath(String),

    #[error("{context}: {}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
