// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use quickplot_config_fs::FsConfigStore;
use quickplot_core::config::{ConfigError, ConfigService, ConfigStore, DefaultsPort, DEFAULTS_KEY};
use quickplot_core::{PlotDefaults, Rgb};
use std::fs;

#[test]
fn missing_key_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::at(dir.path()).unwrap();
    assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
}

#[test]
fn defaults_persist_as_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let svc = ConfigService::new(FsConfigStore::at(dir.path().join("nested")).unwrap());
    let defaults = PlotDefaults {
        framerate: 144.0,
        point_color: Rgb::from_hex(0x33ccff),
        ..PlotDefaults::default()
    };
    svc.save(DEFAULTS_KEY, &defaults).unwrap();
    assert!(dir.path().join("nested").join("defaults.json").is_file());
    assert_eq!(svc.load_defaults(), defaults);
}

#[test]
fn hand_edited_file_is_sanitised() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("defaults.json"),
        r#"{ "point_alpha": 7.5, "connected": true, "bounds": [0.0, 16.0, -30.0, 30.0] }"#,
    )
    .unwrap();
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    let d = svc.load_defaults();
    assert!(d.connected);
    assert!((d.point_alpha - 1.0).abs() < f32::EPSILON);
    assert_eq!(d.bounds.as_tuple(), (0.0, 16.0, -30.0, 30.0));
}

#[test]
fn invalid_bounds_in_file_fall_back_to_builtins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("defaults.json"),
        r#"{ "bounds": [5.0, 1.0, 0.0, 1.0] }"#,
    )
    .unwrap();
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    assert_eq!(svc.load_defaults(), PlotDefaults::default());
}
