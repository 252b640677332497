//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;

use earthview::config::{AppConfig, ScenePreset};
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("EV_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("EV_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_default_file_loads() {
    std::env::remove_var("EV_WINDOW__TITLE");

    // Integration tests run from the package root
    let config = AppConfig::load().unwrap();
    assert_eq!(config.camera.fov, 45.0);
    assert_eq!(config.scene.preset, ScenePreset::EarthStarfield);
    assert_eq!(config.rendering.asset_dir, "static/textures");
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[window]\ntitle = \"Default\"\nwidth = 800\n",
    )
    .unwrap();
    fs::write(dir.path().join("user.toml"), "[window]\ntitle = \"User\"\n").unwrap();

    let config = AppConfig::load_from(dir.path()).unwrap();
    assert_eq!(config.window.title, "User");
    assert_eq!(config.window.width, 800);
    assert_eq!(config.window.height, 720);
}

#[test]
#[serial]
fn test_nested_env_override() {
    std::env::set_var("EV_DEBUG__EARTH_SPEED", "25.0");
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from(dir.path()).unwrap();
    std::env::remove_var("EV_DEBUG__EARTH_SPEED");

    assert_eq!(config.debug.earth_speed, 25.0);
    assert!(config.debug.show_panel);
}

#[test]
#[serial]
fn test_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("default.toml"), "[window]\nwidth = \"wide\"\n").unwrap();

    let err = AppConfig::load_from(dir.path()).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
