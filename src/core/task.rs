//! Units of work and backup path derivation

use crate::config::defaults;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Filler used when flattening paths that live outside the working directory
const PATH_FILLER: &str = "_";

/// A file handed over by discovery: its path and raw content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// One unit of work: a source file, its content snapshot, and its
/// preferred backup destination.
///
/// Created once at discovery and never mutated. Each task is owned by
/// exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    path: PathBuf,
    content: Vec<u8>,
    backup_path: PathBuf,
}

impl FileTask {
    pub fn new(path: PathBuf, content: Vec<u8>, layout: &BackupLayout) -> Self {
        let backup_path = layout.backup_path(&path);
        Self {
            path,
            content,
            backup_path,
        }
    }

    pub fn from_discovered(file: DiscoveredFile, layout: &BackupLayout) -> Self {
        Self::new(file.path, file.content, layout)
    }

    /// Source path, the task's identity
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content as read at discovery time
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Derived backup destination; a numbered variant is used when taken
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}

/// Maps source paths to backup paths under a fixed root.
///
/// Files under the working directory keep their relative layout. Files
/// elsewhere are flattened into a single file name so a backup can never
/// land outside the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupLayout {
    work_dir: PathBuf,
    backup_root: PathBuf,
    suffix: String,
}

impl BackupLayout {
    /// `work_dir` must be absolute
    pub fn new(work_dir: PathBuf, backup_root: PathBuf) -> Self {
        Self {
            work_dir: normalize(&work_dir),
            backup_root,
            suffix: defaults::BACKUP_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Backup destination for `source`
    pub fn backup_path(&self, source: &Path) -> PathBuf {
        let absolute = if source.is_absolute() {
            normalize(source)
        } else {
            normalize(&self.work_dir.join(source))
        };

        let relative = match absolute.strip_prefix(&self.work_dir) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
            _ => PathBuf::from(flatten(&absolute)),
        };

        let mut name: OsString = relative.into_os_string();
        name.push(&self.suffix);
        self.backup_root.join(name)
    }
}

/// Resolve `.` and `..` lexically
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join the components of an absolute path with the filler, dropping the root
fn flatten(path: &Path) -> OsString {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                let drive: String = prefix
                    .as_os_str()
                    .to_string_lossy()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect();
                if !drive.is_empty() {
                    parts.push(drive);
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::CurDir | Component::ParentDir => {}
        }
    }
    OsString::from(parts.join(PATH_FILLER))
}
