//! Common test utilities for the sdam test suite.

#![allow(dead_code)]

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use sdam::{
    model::{ForensicStatus, GovernanceState, SecondaryData},
    policies::{ThresholdPolicy, WeightedScoringPolicy},
    ports::Policy,
};

/// Both reference policies with default parameters.
pub fn default_policies() -> Vec<Box<dyn Policy>> {
    vec![
        Box::new(ThresholdPolicy::default()),
        Box::new(WeightedScoringPolicy::default()),
    ]
}

/// Draw a stage-0 state with randomised informational and belief fields.
pub fn random_initial_state(rng: &mut StdRng) -> GovernanceState {
    let forensic_status = match rng.random_range(0..4) {
        0 => ForensicStatus::None,
        1 => ForensicStatus::InProgress,
        2 => ForensicStatus::ConfirmedAttack,
        _ => ForensicStatus::ConfirmedClean,
    };
    let secondary_data = match rng.random_range(0..4) {
        0 => SecondaryData::Corroborates,
        1 => SecondaryData::Contradicts,
        2 => SecondaryData::Partial,
        _ => SecondaryData::Absent,
    };
    GovernanceState {
        time_remaining: rng.random_range(0.0..=720.0),
        threat_confidence: rng.random_range(0.5..=0.99),
        cyber_detected: rng.random_bool(0.5),
        sensor_integrity: rng.random_range(0.0..=1.0),
        forensic_status,
        secondary_data,
        estimated_threat_prob: rng.random_range(0.01..=0.99),
        ..GovernanceState::default_scenario()
    }
}

/// Seeded batch of random initial states.
pub fn random_states(seed: u64, count: usize) -> Vec<GovernanceState> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| random_initial_state(&mut rng)).collect()
}

/// Write an Arena export with the given raw choice identifiers.
pub fn write_arena_export(dir: &Path, name: &str, choices: &[&str], total_score: f64) {
    let decisions: Vec<_> = choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            serde_json::json!({
                "stage": i + 1,
                "choice": choice,
                "time_remaining": 720 - 240 * i,
            })
        })
        .collect();
    let body = serde_json::json!({
        "scenario_id": "nuclear-false-alarm",
        "decisions": decisions,
        "scores": {"proportionality": 70, "composite": total_score},
        "total_score": total_score,
        "played_at": "2026-03-01T12:00:00Z",
        "arguments_final": [{"id": "ai_confidence", "strength": 0.4}],
    });
    std::fs::write(dir.join(name), body.to_string()).unwrap();
}
