//! Loading LookML projects from disk.

use std::fs;

use lookml::project::{LoadError, Workspace, WorkspaceLoader};
use tempfile::TempDir;

use crate::helpers::fixtures::{ORDERS_VIEW, SHOP_MODEL, USERS_VIEW};

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("views")).unwrap();
    fs::write(dir.path().join("views/orders.view.lkml"), ORDERS_VIEW).unwrap();
    fs::write(dir.path().join("views/users.view.lkml"), USERS_VIEW).unwrap();
    fs::write(dir.path().join("shop.model.lkml"), SHOP_MODEL).unwrap();
    fs::write(dir.path().join("README.md"), "# not lookml").unwrap();
    dir
}

#[test]
fn test_load_directory_recursively() {
    let dir = project();
    let mut workspace = Workspace::new();
    let loaded = WorkspaceLoader::new()
        .load_directory(dir.path(), &mut workspace)
        .unwrap();

    assert_eq!(loaded, 3);
    assert_eq!(workspace.document_count(), 3);
    let model = workspace.model();
    assert!(model.view("orders").is_some());
    assert!(model.view("users").is_some());
    assert!(model.diagnostics().is_empty(), "{:?}", model.diagnostics());
}

#[test]
fn test_collect_file_paths_is_sorted_and_filtered() {
    let dir = project();
    let paths = WorkspaceLoader::new().collect_file_paths(dir.path()).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        names,
        vec!["shop.model.lkml", "views/orders.view.lkml", "views/users.view.lkml"]
    );
}

#[test]
fn test_load_single_file() {
    let dir = project();
    let mut workspace = Workspace::new();
    WorkspaceLoader::new()
        .load_file(dir.path().join("views/users.view.lkml"), &mut workspace)
        .unwrap();
    assert_eq!(workspace.document_count(), 1);

    let missing = WorkspaceLoader::new().load_file(dir.path().join("nope.view.lkml"), &mut workspace);
    assert!(missing.is_err());
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let mut workspace = Workspace::new();
    let err = WorkspaceLoader::new()
        .load_directory(dir.path().join("absent"), &mut workspace)
        .unwrap_err();
    assert!(matches!(err, LoadError::DirectoryNotFound(_)));
}

#[test]
fn test_unparsable_file_is_still_loaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.view.lkml"), "view: broken {").unwrap();
    let mut workspace = Workspace::new();
    let loaded = WorkspaceLoader::new()
        .load_directory(dir.path(), &mut workspace)
        .unwrap();
    assert_eq!(loaded, 1);
    assert_eq!(workspace.parsed_documents().count(), 0);
    assert_eq!(workspace.model().diagnostics().len(), 1);
}
