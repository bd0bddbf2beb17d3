//! Reference policies compared on common random numbers

mod common;

use sdam::{
    model::Decision,
    pipeline::{ComparisonConfig, MetricsObserver, PolicyComparison},
    policies::{ThresholdPolicy, WeightedScoringPolicy},
};

#[test]
fn test_weighted_scoring_beats_threshold_on_most_seeds() {
    let result = PolicyComparison::new(ComparisonConfig::default().with_episodes(200))
        .with_policy(Box::new(ThresholdPolicy::default()))
        .with_policy(Box::new(WeightedScoringPolicy::default()))
        .run()
        .unwrap();

    let threshold = result.index_of("threshold").unwrap();
    let weighted = result.index_of("weighted_scoring").unwrap();
    assert!(result.wins(weighted, threshold) > 100);
    assert_eq!(result.leader().map(|p| p.name.as_str()), Some("weighted_scoring"));
}

#[test]
fn test_comparison_feeds_observers() {
    let metrics = MetricsObserver::new();
    let mut comparison = PolicyComparison::new(ComparisonConfig::default().with_episodes(25));
    for policy in common::default_policies() {
        comparison = comparison.with_policy(policy);
    }
    let result = comparison
        .with_observer(Box::new(metrics.clone()))
        .run()
        .unwrap();

    assert_eq!(metrics.episodes(), 50);
    assert_eq!(metrics.decision_count(0, Decision::Parallel), 50);
    for policy in &result.policies {
        assert_eq!(policy.summary.count, 25);
        assert!(policy.summary.min <= policy.summary.mean);
        assert!(policy.summary.mean <= policy.summary.max);
    }
}

#[test]
fn test_comparison_matches_single_simulations() {
    let result = PolicyComparison::new(
        ComparisonConfig::default()
            .with_episodes(5)
            .with_base_seed(100),
    )
    .with_policy(Box::new(ThresholdPolicy::default()))
    .run()
    .unwrap();

    for (seed, score) in result.seeds.iter().zip(&result.policies[0].scores) {
        let episode = sdam::simulate(&ThresholdPolicy::default(), None, *seed, 3).unwrap();
        assert_eq!(episode.total_score, *score);
    }
}
