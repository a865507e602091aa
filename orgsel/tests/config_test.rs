//! Integration tests for Settings loading from a local `.orgsel.toml`.
//!
//! These tests use temp directories as the local config dir. A global config
//! of the user running them would be merged underneath.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgsel::config::{local_config_path, Settings};

#[test]
fn given_local_config_with_relative_tree_file_when_load_then_resolved_against_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".orgsel.toml"),
        "tree_file = \"org.toml\"\ntitle = \"Acme\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.tree_file, Some(dir.path().join("org.toml")));
    assert_eq!(settings.title, "Acme");
}

#[test]
fn given_local_config_with_absolute_tree_file_when_load_then_kept_as_is() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".orgsel.toml"),
        "tree_file = \"/srv/hr/org.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.tree_file, Some(PathBuf::from("/srv/hr/org.toml")));
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".orgsel.toml"), "title = [").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error:"), "{err}");
}

#[test]
fn given_written_template_when_load_then_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, Settings::template()).unwrap();
    let defaults = Settings::load(None).expect("load without local dir");

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(path.file_name().unwrap(), ".orgsel.toml");
    assert_eq!(settings, defaults);
}
