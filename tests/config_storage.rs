use africa_atlas::config::{DEFAULT_API_BASE_URL, DEFAULT_TILE_URL};
use africa_atlas::directory::country_directory;
use africa_atlas::api::{parse_feature_collection, parse_profile};
use africa_atlas::{BoundaryLayers, Config, storage};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.tile_url_template, DEFAULT_TILE_URL);
    assert_eq!(cfg.max_zoom, 18);
    assert_eq!(cfg.service_root(), "http://localhost:8000");
}

#[test]
fn environment_overrides() {
    let mut cfg = Config::default();
    cfg.apply_vars(vars(&[
        ("ATLAS_API_URL", "https://atlas.example.org/api/v1/"),
        ("ATLAS_TIMEOUT_SECS", "30"),
        ("ATLAS_LOG_LEVEL", "DEBUG"),
    ]));
    assert_eq!(cfg.api_base_url, "https://atlas.example.org/api/v1");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.tile_url_template, DEFAULT_TILE_URL);
}

#[test]
fn bad_values_are_ignored() {
    let mut cfg = Config::default();
    cfg.apply_vars(vars(&[("ATLAS_TIMEOUT_SECS", "soon"), ("ATLAS_API_URL", "  ")]));
    assert_eq!(cfg, Config::default());
}

#[test]
fn partial_config_file_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "max_zoom": 12, "image_workers": 2 }"#).unwrap();
    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.max_zoom, 12);
    assert_eq!(cfg.image_workers, 2);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);

    fs::write(&path, r#"{ "max_zoom": 40 }"#).unwrap();
    assert_eq!(Config::from_file(&path).unwrap().max_zoom, 22);

    fs::write(&path, "{ nope").unwrap();
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn exports_directory_and_profile() {
    let fc = parse_feature_collection(include_str!("fixtures/africa.geojson")).unwrap();
    let entries = country_directory(&BoundaryLayers::from_feature_collection(&fc));
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("countries.csv");
    storage::save_directory_csv(&entries, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("code,name\nDZ,Algeria\n"));
    assert_eq!(csv_txt.lines().count(), 1 + entries.len());

    let json_path = dir.path().join("countries.json");
    storage::save_directory_json(&entries, &json_path).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), entries.len());
    assert_eq!(v[0]["code"], "DZ");

    let profile = parse_profile(include_str!("fixtures/profile_ke.json")).unwrap();
    let profile_path = dir.path().join("ke.json");
    storage::save_profile_json(&profile, &profile_path).unwrap();
    let back = parse_profile(&fs::read_to_string(&profile_path).unwrap()).unwrap();
    assert_eq!(back, profile);
}
