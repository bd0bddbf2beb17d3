//! Scenario and grid files read by the command line

use std::fs;

use sdam::{
    Error,
    cli::config::{FamilyKind, GridFile, ScenarioFile, load_initial_state},
    model::{GovernanceState, SecondaryData},
};

#[test]
fn test_missing_scenario_means_reference_state() {
    assert_eq!(
        load_initial_state(None).unwrap(),
        GovernanceState::default_scenario()
    );
}

#[test]
fn test_scenario_file_overrides_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    fs::write(
        &path,
        r#"{
            "sensor_integrity": 0.35,
            "secondary_data": "partial",
            "arg_strengths": {"ai_confidence": 0.9}
        }"#,
    )
    .unwrap();

    let state = load_initial_state(Some(path.as_path())).unwrap();
    assert_eq!(state.sensor_integrity, 0.35);
    assert_eq!(state.secondary_data, SecondaryData::Partial);
    assert_eq!(state.arg_strengths.len(), 1);
    assert_eq!(state.arg_strengths.get("ai_confidence"), Some(0.9));
    assert_eq!(state.time_remaining, 720.0);
}

#[test]
fn test_unreadable_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        ScenarioFile::load(&missing),
        Err(Error::Io { .. })
    ));

    let broken = dir.path().join("grid.json");
    fs::write(&broken, r#"{"family": "bandit"}"#).unwrap();
    assert!(matches!(
        GridFile::load(&broken),
        Err(Error::Serialization(_))
    ));
}

#[test]
fn test_grid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.json");
    fs::write(
        &path,
        r#"{"family": "scoring", "simulations": 40,
            "parameters": [{"name": "w_speed", "values": [0.1, 0.2, 0.3]}]}"#,
    )
    .unwrap();

    let grid = GridFile::load(&path).unwrap();
    assert_eq!(grid.family, FamilyKind::Scoring);
    assert_eq!(grid.simulations, Some(40));
    assert_eq!(grid.parameters.len(), 3);
}

#[test]
fn test_grid_file_with_repeated_axis_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.json");
    fs::write(
        &path,
        r#"{"family": "threshold",
            "parameters": [{"name": "time_urgency", "values": [100]},
                           {"name": "time_urgency", "values": [200, 300]}]}"#,
    )
    .unwrap();

    assert!(matches!(
        GridFile::load(&path),
        Err(Error::InvalidConfiguration { .. })
    ));
}
