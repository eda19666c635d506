//! Workspace store and loader tests.

pub mod tests_loader;
pub mod tests_workspace;
