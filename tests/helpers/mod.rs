//! Shared test helpers.

#![allow(dead_code)]

pub mod fixtures;

use lookml::hir::{Diagnostic, SemanticModel};
use lookml::project::Workspace;

/// Build a workspace from `(uri, source)` pairs.
pub fn workspace_from(files: &[(&str, &str)]) -> Workspace {
    let mut workspace = Workspace::new();
    workspace.update_documents(files.iter().map(|(uri, src)| (uri.to_string(), src.to_string())));
    workspace
}

/// Workspace holding one document named `test.view.lkml`.
pub fn workspace_with(source: &str) -> Workspace {
    workspace_from(&[("test.view.lkml", source)])
}

/// Diagnostics carrying `code`.
pub fn with_code<'a>(model: &'a SemanticModel, code: &str) -> Vec<&'a Diagnostic> {
    model.diagnostics().iter().filter(|d| d.code == code).collect()
}

/// Every diagnostic code, in report order.
pub fn codes(model: &SemanticModel) -> Vec<&str> {
    model.diagnostics().iter().map(|d| d.code.as_str()).collect()
}

/// Assert the model carries no diagnostics, listing them otherwise.
pub fn assert_no_diagnostics(model: &SemanticModel) {
    assert!(
        model.diagnostics().is_empty(),
        "Expected no diagnostics, got:\n{}",
        model
            .diagnostics()
            .iter()
            .map(|d| format!("  {} {}: {}", d.uri, d.code, d.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
