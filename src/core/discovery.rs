//! File discovery
//!
//! Collects the files a run will touch, in a stable order, together with
//! their content.

use super::task::DiscoveredFile;
use crate::utils::error::{FixmdError, Result};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Finds files by extension under a file or directory path
#[derive(Debug, Clone)]
pub struct Discovery {
    extension: String,
    recursive: bool,
}

impl Discovery {
    pub fn new(extension: impl Into<String>, recursive: bool) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_ascii_lowercase(),
            recursive,
        }
    }

    /// Case-insensitive extension check
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase() == self.extension)
            .unwrap_or(false)
    }

    /// Collect matching files under `root`.
    ///
    /// A file root yields itself when it matches and nothing otherwise. A
    /// directory root yields its matching files sorted by name; nested
    /// directories are entered only in recursive mode.
    pub fn discover(&self, root: &Path) -> Result<Vec<DiscoveredFile>> {
        let metadata = std::fs::metadata(root)
            .map_err(|e| FixmdError::invalid_path(root, format!("Error accessing path: {}", e)))?;

        if metadata.is_file() {
            if !self.matches(root) {
                info!("Skipping non-{} file: {}", self.extension, root.display());
                return Ok(Vec::new());
            }
            return Ok(vec![read_file(root)?]);
        }

        info!("Collecting .{} files from directory: {}", self.extension, root.display());

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| FixmdError::Discovery {
                path: e.path().unwrap_or(root).to_path_buf(),
                source: e.into(),
            })?;

            // `Path::is_file` follows symlinks, so linked files are included
            if !entry.path().is_file() || !self.matches(entry.path()) {
                continue;
            }
            debug!(path = %entry.path().display(), "Discovered file");
            files.push(read_file(entry.path())?);
        }

        info!("Found {} .{} files to process", files.len(), self.extension);
        Ok(files)
    }
}

fn read_file(path: &Path) -> Result<DiscoveredFile> {
    let content = std::fs::read(path).map_err(|source| FixmdError::Discovery {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DiscoveredFile {
        path: path.to_path_buf(),
        content,
    })
}
