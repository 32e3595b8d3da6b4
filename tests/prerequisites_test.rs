mod common;

use common::{lapse_rate_tree, touch, FileNameSource};
use spot_input::spotdata::{PrerequisiteResolver, Resolved};
use spot_input::{SpotDataError, TimeFilter};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_lapse_rate_prerequisites_loaded() {
    let dir = tempdir().unwrap();
    lapse_rate_tree(dir.path());

    let resolver = PrerequisiteResolver::with_source(FileNameSource);
    let diagnostics = resolver
        .resolve("model_level_temperature_lapse_rate", dir.path())
        .unwrap()
        .into_map()
        .unwrap();

    let keys: Vec<&str> = diagnostics.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["pressure_on_height_levels", "surface_pressure", "temperature_on_height_levels"]
    );
    for (name, cubes) in &diagnostics {
        assert_eq!(cubes.len(), 1, "{}", name);
        assert_eq!(cubes.get(0).unwrap().name, *name);
    }
}

#[test]
fn test_missing_diagnostic_fails_whole_resolution() {
    let dir = tempdir().unwrap();
    lapse_rate_tree(dir.path());
    fs::remove_file(dir.path().join("foo_pressure_on_height_levels_20200101.nc")).unwrap();

    let resolver = PrerequisiteResolver::with_source(FileNameSource);
    match resolver.resolve("model_level_temperature_lapse_rate", dir.path()) {
        Err(SpotDataError::NotFound { diagnostic, .. }) => {
            assert_eq!(diagnostic, "pressure_on_height_levels");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_prerequisites_found_in_subdirectories() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020/01/foo_temperature_on_height_levels_20200101.nc");
    touch(dir.path(), "2020/01/foo_temperature_on_height_levels_20200102.nc");
    touch(dir.path(), "2020/foo_pressure_on_height_levels_20200101.nc");
    touch(dir.path(), "foo_surface_pressure_20200101.nc");

    let resolver = PrerequisiteResolver::with_source(FileNameSource);
    let diagnostics = resolver
        .resolve("model_level_temperature_lapse_rate", dir.path())
        .unwrap()
        .into_map()
        .unwrap();

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics["temperature_on_height_levels"].len(), 2);
}

#[test]
fn test_methods_without_prerequisites() {
    let dir = tempdir().unwrap();
    let resolver = PrerequisiteResolver::with_source(FileNameSource);

    for method in ["use_nearest", "orography_derived_temperature_lapse_rate", "", "unheard_of"] {
        assert_eq!(
            resolver.resolve(method, dir.path()).unwrap(),
            Resolved::NoPrerequisites,
            "{}",
            method
        );
    }
}

#[test]
fn test_load_failure_propagates() {
    let dir = tempdir().unwrap();
    lapse_rate_tree(dir.path());
    // File name matches but cannot be decoded by the source
    touch(dir.path(), "foo_surface_pressure_latest.nc");

    let resolver = PrerequisiteResolver::with_source(FileNameSource);
    assert!(matches!(
        resolver.resolve("model_level_temperature_lapse_rate", dir.path()),
        Err(SpotDataError::Load(_))
    ));
}

#[test]
fn test_resolve_at_narrows_every_diagnostic_to_time() {
    let dir = tempdir().unwrap();
    lapse_rate_tree(dir.path());
    touch(dir.path(), "foo_temperature_on_height_levels_20200102.nc");
    touch(dir.path(), "foo_pressure_on_height_levels_20200102.nc");
    touch(dir.path(), "foo_surface_pressure_20200102.nc");

    let resolver = PrerequisiteResolver::with_source(FileNameSource);
    let filter: TimeFilter = "2020-01-02 00:00:00".parse().unwrap();
    let diagnostics = resolver
        .resolve_at("model_level_temperature_lapse_rate", dir.path(), Some(&filter))
        .unwrap()
        .into_map()
        .unwrap();

    assert_eq!(diagnostics.len(), 3);
    for (name, cubes) in &diagnostics {
        assert_eq!(cubes.len(), 1, "{}", name);
        assert_eq!(cubes.get(0).unwrap().times, vec![filter.time], "{}", name);
    }
}

#[test]
fn test_resolve_at_fails_when_a_diagnostic_lacks_the_time() {
    let dir = tempdir().unwrap();
    lapse_rate_tree(dir.path());
    touch(dir.path(), "foo_temperature_on_height_levels_20200102.nc");
    touch(dir.path(), "foo_pressure_on_height_levels_20200102.nc");

    let resolver = PrerequisiteResolver::with_source(FileNameSource);
    let filter: TimeFilter = "2020-01-02 00:00:00".parse().unwrap();
    assert!(matches!(
        resolver.resolve_at("model_level_temperature_lapse_rate", dir.path(), Some(&filter)),
        Err(SpotDataError::NoMatch(_))
    ));
}
