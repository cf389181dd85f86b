//! File discovery for finding photos in a library tree.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::LibraryConfig;
use crate::error::{PipelineError, PipelineResult};

/// Discovers supported image files under a root directory.
pub struct FileDiscovery {
    config: LibraryConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: LibraryConfig) -> Self {
        Self { config }
    }

    /// Discover all supported image files under `root`, sorted by full path.
    ///
    /// Recurses into subdirectories and skips platform sidecar files.
    /// Returns [`PipelineError::DiscoveryEmpty`] when nothing qualifies.
    pub fn discover(&self, root: &Path) -> PipelineResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if self.is_sidecar(path) || !self.is_supported(path) {
                tracing::trace!("Ignoring {:?}", path);
                continue;
            }
            files.push(path.to_path_buf());
        }

        if files.is_empty() {
            return Err(PipelineError::DiscoveryEmpty {
                root: root.to_path_buf(),
            });
        }

        // Sort by path for deterministic navigation order
        files.sort();
        tracing::debug!("Discovered {} photos under {:?}", files.len(), root);
        Ok(files)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }

    /// Check if a file is a platform sidecar (e.g. macOS `._IMG.jpg`).
    fn is_sidecar(&self, path: &Path) -> bool {
        !self.config.sidecar_prefix.is_empty()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&self.config.sidecar_prefix))
                .unwrap_or(false)
    }
}
