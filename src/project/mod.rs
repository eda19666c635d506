//! Workspace document store and on-disk loading.

mod document;
mod workspace;
pub mod workspace_loader;

pub use document::{ParseOutcome, WorkspaceDocument};
pub use workspace::Workspace;
pub use workspace_loader::{FileLoadError, LoadError, WorkspaceLoader};
