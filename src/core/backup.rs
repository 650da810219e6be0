//! Backup phase
//!
//! Every original is copied under the backup root before any file is
//! rewritten. The phase is a gate: the first failure aborts the batch and
//! nothing gets transformed. Backups already written stay in place.
//!
//! A backup is never overwritten. When the derived path is taken, by an
//! earlier run or by another file of the same batch whose path flattens to
//! the same name, the first free numbered variant is used instead
//! (`notes.md.bak`, `notes.md.1.bak`, `notes.md.2.bak`, ...).

use super::task::FileTask;
use crate::utils::error::{FixmdError, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Numbered variants tried before giving up on a backup name
const MAX_BACKUP_VERSIONS: u32 = 10_000;

/// Durable copy of one original, written before the original is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// File that was backed up
    pub source: PathBuf,
    /// Where its content now lives
    pub backup_path: PathBuf,
}

/// Writes verbatim backups for a batch of tasks
#[derive(Debug, Clone)]
pub struct BackupManager {
    verify: bool,
}

impl Default for BackupManager {
    fn default() -> Self {
        Self { verify: true }
    }
}

impl BackupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip reading each backup back after writing it
    pub fn without_verification(mut self) -> Self {
        self.verify = false;
        self
    }

    /// Back up every task in order, stopping at the first failure.
    ///
    /// Returns one record per task, in task order.
    pub async fn backup_all(&self, tasks: &[FileTask]) -> Result<Vec<BackupRecord>> {
        let total = tasks.len();
        let mut records = Vec::with_capacity(total);
        for (index, task) in tasks.iter().enumerate() {
            let record = self.backup_one(task).await?;
            info!(
                "[{}/{}] Backup created: {}",
                index + 1,
                total,
                record.backup_path.display()
            );
            records.push(record);
        }
        info!("All {} files successfully backed up", total);
        Ok(records)
    }

    async fn backup_one(&self, task: &FileTask) -> Result<BackupRecord> {
        let fail = |backup_path: &Path, source: std::io::Error| FixmdError::Backup {
            path: task.path().to_path_buf(),
            backup_path: backup_path.to_path_buf(),
            source,
        };

        let preferred = task.backup_path();
        if let Some(parent) = preferred.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| fail(preferred, e))?;
        }
        let backup_path = write_new(preferred, task.content())
            .await
            .map_err(|e| fail(preferred, e))?;

        if self.verify {
            verify_backup(&backup_path, task.content())
                .await
                .map_err(|e| fail(&backup_path, e))?;
        }
        Ok(BackupRecord {
            source: task.path().to_path_buf(),
            backup_path,
        })
    }
}

/// Create `preferred`, or the first free numbered variant, and write
/// `content` to it. Existing files are never opened for writing.
async fn write_new(preferred: &Path, content: &[u8]) -> std::io::Result<PathBuf> {
    for version in 0..MAX_BACKUP_VERSIONS {
        let candidate = numbered(preferred, version);
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        let written = async {
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&candidate).await;
            return Err(e);
        }
        return Ok(candidate);
    }
    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free backup name after {} versions", MAX_BACKUP_VERSIONS),
    ))
}

/// `notes.md.bak` -> `notes.md.<version>.bak`; version 0 is the name itself
fn numbered(preferred: &Path, version: u32) -> PathBuf {
    if version == 0 {
        return preferred.to_path_buf();
    }
    let Some(name) = preferred.file_name() else {
        return preferred.to_path_buf();
    };
    let renamed = match name.to_str() {
        Some(name) => match name.rfind('.') {
            Some(dot) if dot > 0 => {
                OsString::from(format!("{}.{}{}", &name[..dot], version, &name[dot..]))
            }
            _ => OsString::from(format!("{name}.{version}")),
        },
        None => {
            let mut renamed = name.to_os_string();
            renamed.push(format!(".{version}"));
            renamed
        }
    };
    preferred.with_file_name(renamed)
}

/// Read the backup back and compare it to the snapshot
async fn verify_backup(backup_path: &Path, expected: &[u8]) -> std::io::Result<()> {
    let written = tokio::fs::read(backup_path).await?;
    if written != expected {
        return Err(std::io::Error::new(
            ErrorKind::InvalidData,
            "backup content differs from the original",
        ));
    }
    Ok(())
}
