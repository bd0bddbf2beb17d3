//! Grid search over the reference policy families

use sdam::{
    Error,
    model::GovernanceState,
    pipeline::{
        ParameterGrid, PolicySearch, ProgressObserver, ScoringFamily, SearchConfig,
        ThresholdFamily,
    },
};

#[test]
fn test_best_is_first_maximum() {
    let grid = ParameterGrid::new()
        .with_axis("w_evidence", vec![0.1, 0.35, 0.6])
        .with_axis("w_speed", vec![0.0, 0.2]);
    let mut search = PolicySearch::new(SearchConfig::default().with_simulations(20));
    let outcome = search.search(&ScoringFamily::default(), &grid).unwrap();

    assert_eq!(outcome.results.len(), 6);
    let max = outcome
        .results
        .iter()
        .map(|r| r.average_score)
        .fold(f64::NEG_INFINITY, f64::max);
    let first = outcome
        .results
        .iter()
        .find(|r| r.average_score == max)
        .unwrap();
    assert_eq!(outcome.best.as_ref(), Some(first));
    assert_eq!(outcome.best_score(), Some(max));
    assert!(max > 0.0 && max < 100.0);
}

#[test]
fn test_enumeration_order() {
    let grid = ParameterGrid::new()
        .with_axis("confidence_threshold", vec![0.8, 0.9])
        .with_axis("time_urgency", vec![0.1, 0.2, 0.3]);
    let mut search = PolicySearch::new(SearchConfig::default().with_simulations(2));
    let outcome = search.search(&ThresholdFamily::default(), &grid).unwrap();

    let seen: Vec<(f64, f64)> = outcome
        .results
        .iter()
        .map(|r| {
            (
                r.parameters.get("confidence_threshold").unwrap(),
                r.parameters.get("time_urgency").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            (0.8, 0.1),
            (0.8, 0.2),
            (0.8, 0.3),
            (0.9, 0.1),
            (0.9, 0.2),
            (0.9, 0.3)
        ]
    );
}

#[test]
fn test_ties_keep_first_candidate() {
    // The reference scenario starts with a full window, so urgency never fires.
    let grid = ParameterGrid::new().with_axis("time_urgency", vec![0.1, 0.2]);
    let mut search = PolicySearch::new(SearchConfig::default().with_simulations(10));
    let outcome = search.search(&ThresholdFamily::default(), &grid).unwrap();

    assert_eq!(outcome.results[0].average_score, outcome.results[1].average_score);
    assert_eq!(
        outcome.best_parameters().and_then(|p| p.get("time_urgency")),
        Some(0.1)
    );
}

#[test]
fn test_unknown_parameter_is_rejected() {
    let grid = ParameterGrid::new().with_axis("w_courage", vec![1.0]);
    let mut search = PolicySearch::new(SearchConfig::default().with_simulations(1));
    let err = search.search(&ScoringFamily::default(), &grid).unwrap_err();
    assert!(matches!(err, Error::UnknownParameter { ref name, .. } if name == "w_courage"));
}

#[test]
fn test_empty_axis_yields_no_best() {
    let grid = ParameterGrid::new().with_axis("w_duty", Vec::new());
    let mut search = PolicySearch::new(SearchConfig::default().with_simulations(1));
    let outcome = search.search(&ScoringFamily::default(), &grid).unwrap();
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.best_parameters(), None);
    assert_eq!(outcome.best_score(), None);
}

#[test]
fn test_search_with_progress_and_scenario() {
    let scenario = GovernanceState {
        sensor_integrity: 0.3,
        ..GovernanceState::default_scenario()
    };
    let grid = ParameterGrid::new().with_axis("integrity_threshold", vec![0.2, 0.5]);
    let mut search = PolicySearch::new(
        SearchConfig::default()
            .with_simulations(5)
            .with_initial_state(scenario),
    )
    .with_observer(Box::new(ProgressObserver::new()));
    let outcome = search.search(&ThresholdFamily::default(), &grid).unwrap();

    assert_eq!(outcome.family, "threshold");
    assert_eq!(outcome.n_simulations, 5);
    assert_eq!(outcome.results.len(), 2);
}

#[test]
fn test_zero_simulations_is_rejected() {
    let mut search = PolicySearch::new(SearchConfig::default().with_simulations(0));
    let err = search
        .search(&ThresholdFamily::default(), &ParameterGrid::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
}
