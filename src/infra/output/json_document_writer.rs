use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::fs;

use crate::core::monsters::{DocumentWriter, ExportError, OutputDocument};

/// Writes the document as 4-space indented JSON to every target path.
///
/// The document is serialized once. Each target is first written to a
/// sibling `.tmp` file; only when all of them succeeded are they renamed
/// into place. Existing targets are moved to `.bak` while the renames run
/// and put back if any rename fails, so a failed run leaves the previous
/// output untouched.
pub struct JsonDocumentWriter {
    targets: Vec<PathBuf>,
}

impl JsonDocumentWriter {
    pub fn new<I, P>(targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }
}

/// Serializes with four-space indentation and no ASCII escaping.
pub fn render_document(document: &OutputDocument) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;
    Ok(buf)
}

fn sibling_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    target.with_file_name(name)
}

fn temp_path(target: &Path) -> PathBuf {
    sibling_path(target, ".tmp")
}

fn backup_path(target: &Path) -> PathBuf {
    sibling_path(target, ".bak")
}

async fn discard(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!("Failed to remove temporary file {}: {}", path.display(), e);
        }
    }
}

/// A target that now holds the new document, and where its old content went.
struct Replaced {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// Moves `tmp` over `target`, keeping any existing file as a backup.
async fn replace_target(tmp: &Path, target: &Path) -> Result<Replaced, ExportError> {
    let backup = match fs::metadata(target).await {
        Ok(meta) if meta.is_file() => {
            let backup = backup_path(target);
            fs::rename(target, &backup).await.map_err(|e| {
                ExportError::Write(format!("Failed to back up {}: {}", target.display(), e))
            })?;
            Some(backup)
        }
        Ok(_) => {
            return Err(ExportError::Write(format!(
                "{} exists and is not a regular file",
                target.display()
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(ExportError::Write(format!(
                "Failed to inspect {}: {}",
                target.display(),
                e
            )));
        }
    };

    if let Err(e) = fs::rename(tmp, target).await {
        if let Some(backup) = &backup {
            restore(backup, target).await;
        }
        return Err(ExportError::Write(format!(
            "Failed to move {} into place: {}",
            target.display(),
            e
        )));
    }

    Ok(Replaced {
        target: target.to_path_buf(),
        backup,
    })
}

async fn restore(backup: &Path, target: &Path) {
    if let Err(e) = fs::rename(backup, target).await {
        tracing::error!(
            "Failed to restore {} from {}: {}",
            target.display(),
            backup.display(),
            e
        );
    }
}

/// Undoes already replaced targets, newest first.
async fn roll_back(replaced: &[Replaced]) {
    for entry in replaced.iter().rev() {
        match &entry.backup {
            Some(backup) => restore(backup, &entry.target).await,
            None => {
                if let Err(e) = fs::remove_file(&entry.target).await {
                    tracing::error!("Failed to remove {}: {}", entry.target.display(), e);
                }
            }
        }
    }
}

#[async_trait]
impl DocumentWriter for JsonDocumentWriter {
    async fn write_document(&self, document: &OutputDocument) -> Result<(), ExportError> {
        let bytes = render_document(document).map_err(|e| ExportError::Write(e.to_string()))?;

        let mut staged: Vec<PathBuf> = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = fs::create_dir_all(parent).await {
                    discard(&staged).await;
                    return Err(ExportError::Write(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    )));
                }
            }

            let tmp = temp_path(target);
            if let Err(e) = fs::write(&tmp, &bytes).await {
                discard(&staged).await;
                return Err(ExportError::Write(format!(
                    "Failed to write {}: {}",
                    tmp.display(),
                    e
                )));
            }
            staged.push(tmp);
        }

        let mut replaced: Vec<Replaced> = Vec::with_capacity(staged.len());
        for (index, (tmp, target)) in staged.iter().zip(&self.targets).enumerate() {
            match replace_target(tmp, target).await {
                Ok(entry) => replaced.push(entry),
                Err(e) => {
                    discard(&staged[index..]).await;
                    roll_back(&replaced).await;
                    return Err(e);
                }
            }
        }

        for entry in &replaced {
            if let Some(backup) = &entry.backup {
                if let Err(e) = fs::remove_file(backup).await {
                    tracing::warn!("Failed to remove backup {}: {}", backup.display(), e);
                }
            }
            tracing::info!("Saved {}", entry.target.display());
        }

        Ok(())
    }
}
