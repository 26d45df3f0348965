//! Template fetching from a remote archive (GitHub) or a local checkout
//!
//! Both sources produce the full set of files for the requested template
//! directory in memory before anything touches the target directory:
//! - Remote: downloads the repository zip archive and keeps the entries under
//!   the template directory
//! - Local: walks `<root>/<template dir>` on disk
//!
//! A failed download or a missing template directory therefore never leaves a
//! half-written project behind.

use crate::error::ScaffoldError;
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use url::Url;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Archive of the repository that hosts the templates
pub const DEFAULT_TEMPLATE_URL: &str =
    "https://codeload.github.com/bunup/bunup/zip/refs/heads/main";

/// Environment variable overriding [`DEFAULT_TEMPLATE_URL`]
pub const TEMPLATE_URL_ENV: &str = "BUNUP_TEMPLATE_URL";

/// User agent for archive downloads
pub const USER_AGENT: &str = concat!("bunup-tools/", env!("CARGO_PKG_VERSION"));

/// A template file held in memory, path relative to the template directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Template source - either a remote zip archive or a local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Remote source from `BUNUP_TEMPLATE_URL`, or the default archive
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var(TEMPLATE_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_TEMPLATE_URL.to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }
}

/// Template fetcher - retrieves a template directory and materialises it on disk
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher for the remote archive (honouring the env override)
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(TemplateSource::from_env()?, USER_AGENT))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf) -> Self {
        Self::new(TemplateSource::Local(path), USER_AGENT)
    }

    /// Load every file of `template_dir` into memory
    pub async fn fetch_files(&self, template_dir: &str) -> Result<Vec<TemplateFile>> {
        match &self.source {
            TemplateSource::Remote(url) => {
                tracing::debug!(%url, template_dir, "downloading template archive");
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch template archive from {}", url))?;

                if !response.status().is_success() {
                    anyhow::bail!(
                        "Failed to fetch template archive from {}: HTTP {}",
                        url,
                        response.status()
                    );
                }

                let bytes = response
                    .bytes()
                    .await
                    .context("Failed to read template archive")?;
                tracing::debug!(bytes = bytes.len(), "template archive downloaded");
                extract_template_dir(&bytes, template_dir)
            }
            TemplateSource::Local(root) => read_local_template(root, template_dir),
        }
    }

    /// Fetch `template_dir` and write it into `target_dir`.
    ///
    /// Returns the relative paths written, in archive order.
    pub async fn fetch_into(&self, template_dir: &str, target_dir: &Path) -> Result<Vec<PathBuf>> {
        let files = self.fetch_files(template_dir).await?;
        write_files(target_dir, &files).await
    }
}

/// Keep the entries of a repository archive that live under `template_dir`.
///
/// Archives produced by GitHub wrap everything in a single `<repo>-<ref>/`
/// directory, which is stripped before matching.
pub fn extract_template_dir(zip_bytes: &[u8], template_dir: &str) -> Result<Vec<TemplateFile>> {
    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to read template archive")?;
    let prefix = format!("{}/", template_dir.trim_matches('/'));
    let mut files = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let Some((_, in_repo)) = name.split_once('/') else {
            continue;
        };
        let Some(relative) = in_repo.strip_prefix(&prefix) else {
            continue;
        };
        let path = sanitize_relative(relative)
            .ok_or_else(|| ScaffoldError::UnsafeArchivePath(name.clone()))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .with_context(|| format!("Failed to read '{}' from template archive", name))?;
        files.push(TemplateFile { path, contents });
    }

    if files.is_empty() {
        return Err(ScaffoldError::TemplateDirMissing(template_dir.to_string()).into());
    }

    Ok(files)
}

/// Read `<root>/<template_dir>` recursively
pub fn read_local_template(root: &Path, template_dir: &str) -> Result<Vec<TemplateFile>> {
    let dir = root.join(template_dir);
    if !dir.is_dir() {
        return Err(ScaffoldError::TemplateDirMissing(dir.display().to_string()).into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry
            .path()
            .strip_prefix(&dir)
            .context("Template file outside of template directory")?
            .to_path_buf();
        let contents = std::fs::read(entry.path())
            .map_err(|e| ScaffoldError::io("Failed to read template file", entry.path(), e))?;
        files.push(TemplateFile { path, contents });
    }

    if files.is_empty() {
        return Err(ScaffoldError::TemplateDirMissing(dir.display().to_string()).into());
    }

    Ok(files)
}

/// Write in-memory template files below `target_dir`
pub async fn write_files(target_dir: &Path, files: &[TemplateFile]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target_path = target_dir.join(&file.path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&target_path, &file.contents)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        written.push(file.path.clone());
    }

    Ok(written)
}

/// Turn an archive path into a relative path that cannot escape its parent
fn sanitize_relative(path: &str) -> Option<PathBuf> {
    let candidate = Path::new(path);
    let mut clean = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, contents) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(contents.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_extract_keeps_only_template_dir() {
        let bytes = archive(&[
            ("bunup-main/README.md", "root readme"),
            ("bunup-main/templates/ts-lib/package.json", "{}"),
            ("bunup-main/templates/ts-lib/src/index.ts", "export {}"),
            ("bunup-main/templates/ts-lib-basic/package.json", "{}"),
        ]);

        let files = extract_template_dir(&bytes, "templates/ts-lib").unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("package.json"), PathBuf::from("src/index.ts")]
        );
        assert_eq!(files[1].contents, b"export {}");
    }

    #[test]
    fn test_extract_missing_dir_is_error() {
        let bytes = archive(&[("bunup-main/templates/react-lib/package.json", "{}")]);
        let err = extract_template_dir(&bytes, "templates/ts-lib").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::TemplateDirMissing(_))
        ));
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(sanitize_relative("src/index.ts"), Some(PathBuf::from("src/index.ts")));
        assert_eq!(sanitize_relative("./a.txt"), Some(PathBuf::from("a.txt")));
        assert_eq!(sanitize_relative("../escape.txt"), None);
        assert_eq!(sanitize_relative("/etc/passwd"), None);
        assert_eq!(sanitize_relative(""), None);
    }

    #[tokio::test]
    async fn test_local_fetch_into_target() {
        let repo = tempfile::tempdir().unwrap();
        let template = repo.path().join("templates/ts-lib");
        std::fs::create_dir_all(template.join("src")).unwrap();
        std::fs::write(template.join("package.json"), "{\"name\":\"x\"}").unwrap();
        std::fs::write(template.join("src/index.ts"), "export {}").unwrap();

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("my-lib");
        let fetcher = TemplateFetcher::from_local(repo.path().to_path_buf());
        let written = fetcher.fetch_into("templates/ts-lib", &target).await.unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(target.join("src/index.ts")).unwrap(),
            "export {}"
        );
    }

    #[tokio::test]
    async fn test_local_missing_dir_writes_nothing() {
        let repo = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("my-lib");

        let fetcher = TemplateFetcher::from_local(repo.path().to_path_buf());
        assert!(fetcher.fetch_into("templates/ts-lib", &target).await.is_err());
        assert!(!target.exists());
    }
}
