use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::state::data::ComposeEntry;

pub const YAML_MEDIA_TYPE: &str = "text/yaml";

/// A compose document ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
    pub media_type: &'static str,
}

impl ExportArtifact {
    /// File name safe to create on disk: path separators become underscores,
    /// the way browsers treat download names
    pub fn disk_file_name(&self) -> String {
        self.file_name.replace(['/', '\\'], "_")
    }
}

/// Package an entry's compose document for download.
pub fn artifact(entry: &ComposeEntry) -> ExportArtifact {
    ExportArtifact {
        file_name: format!("{}-compose.yaml", slug(&entry.title)),
        content: entry.docker_compose.clone(),
        media_type: YAML_MEDIA_TYPE,
    }
}

/// Lowercase the title and collapse each whitespace run into one hyphen.
/// Other characters pass through untouched.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            out.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }

    out
}

/// Write the artifact into `dir`, returning the full path written
pub async fn write_to_dir(artifact: ExportArtifact, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(artifact.disk_file_name());
    write(artifact.content, path).await
}

/// Write the compose text verbatim to `path`
pub async fn write(content: String, path: PathBuf) -> Result<PathBuf, ExportError> {
    match tokio::fs::write(&path, content.as_bytes()).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "exported compose file");
            Ok(path)
        }
        Err(source) => Err(ExportError::Write { path, source }),
    }
}
