use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::workspace::Workspace;

/// File extensions loaded from disk.
pub const LOOKML_EXTENSIONS: &[&str] = &["lkml", "lookml"];

/// A file that could not be read.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct FileLoadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// Some files could not be read; the readable ones were loaded.
    #[error("failed to load {} file(s), first: {}", .failures.len(), .failures.first().map(ToString::to_string).unwrap_or_default())]
    Partial {
        loaded: usize,
        failures: Vec<FileLoadError>,
    },
}

/// Loads LookML files from disk into a [`Workspace`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Recursively collect `*.lkml` / `*.lookml` paths under `dir`, sorted.
    pub fn collect_file_paths(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
        }
        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_lookml_file(path))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Load every LookML file under `dir` with a single re-analysis.
    ///
    /// Returns the number of files loaded.
    pub fn load_directory<P: AsRef<Path>>(
        &self,
        dir: P,
        workspace: &mut Workspace,
    ) -> Result<usize, LoadError> {
        let paths = self.collect_file_paths(dir.as_ref())?;
        let mut batch = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();

        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(content) => batch.push((uri_for(&path), content)),
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "failed to read file");
                    failures.push(FileLoadError { path, source });
                }
            }
        }

        let loaded = batch.len();
        workspace.update_documents(batch);
        debug!(loaded, failed = failures.len(), "workspace loaded");

        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(LoadError::Partial { loaded, failures })
        }
    }

    /// Load a single file.
    pub fn load_file<P: AsRef<Path>>(
        &self,
        path: P,
        workspace: &mut Workspace,
    ) -> Result<(), FileLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FileLoadError {
            path: path.to_path_buf(),
            source,
        })?;
        workspace.update_document(&uri_for(path), &content);
        Ok(())
    }
}

pub fn is_lookml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| LOOKML_EXTENSIONS.contains(&ext))
}

/// The document URI used for a file on disk.
pub fn uri_for(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
