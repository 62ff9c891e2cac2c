//! Tests for config file discovery and loading

use lovin_config::{ConfigDiscovery, load_if_exists, resolve};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn discovers_app_json_config() {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("shop");
    fs::create_dir_all(&app).unwrap();
    fs::write(
        app.join("config.json"),
        r#"{ "vendor": { "lodash": "vendor/lodash.js" } }"#,
    )
    .unwrap();

    let found = ConfigDiscovery::find_in(&app).unwrap();
    assert_eq!(found.file_name().unwrap(), "config.json");

    let config = resolve(&app).unwrap();
    assert_eq!(config.vendor.unwrap()["lodash"], "vendor/lodash.js");
}

#[test]
fn shared_config_lives_in_parent() {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("shop");
    fs::create_dir_all(&app).unwrap();
    fs::write(dir.path().join("config.yaml"), "minify: false\n").unwrap();

    let discovery = ConfigDiscovery::new(&app);
    assert_eq!(discovery.shared_dir(), dir.path());
    assert_eq!(discovery.load_shared().unwrap(), Some(json!({ "minify": false })));
    assert!(discovery.load_app().unwrap().is_none());
}

#[test]
fn yaml_mapping_order_is_preserved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, "vendor:\n  zeta: z.js\n  alpha: a.js\n  mid: m.js\n").unwrap();

    let value = load_if_exists(&path).unwrap().unwrap();
    let keys: Vec<&String> = value["vendor"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn missing_app_directory_resolves_empty() {
    let dir = TempDir::new().unwrap();
    let config = resolve(dir.path().join("does-not-exist")).unwrap();
    assert!(config.vendor.is_none());
    assert!(config.extra.is_empty());
}
