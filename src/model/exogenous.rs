//! Exogenous information W_{t+1} ~ P(· | S_t, x_t)

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::{
    decision::Decision,
    state::{ForensicStatus, GovernanceState, SecondaryData},
};
use crate::utils::{clamp_between, weighted_sample};

/// Mean drift of the AI confidence per step.
const CONFIDENCE_DRIFT_MEAN: f64 = 0.02;
const CONFIDENCE_DRIFT_SD: f64 = 0.03;

const SECONDARY_ARRIVAL_PROB: f64 = 0.7;
const SECONDARY_WEIGHTS: [(SecondaryData, f64); 3] = [
    (SecondaryData::Contradicts, 0.6),
    (SecondaryData::Partial, 0.25),
    (SecondaryData::Corroborates, 0.15),
];

const FORENSIC_YIELD_PROB: f64 = 0.6;
const FORENSIC_WEIGHTS: [(ForensicStatus, f64); 2] = [
    (ForensicStatus::ConfirmedAttack, 0.85),
    (ForensicStatus::ConfirmedClean, 0.15),
];

/// Random information revealed after a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExogenousInfo {
    /// New absolute AI confidence (not a delta)
    pub ai_confidence_update: f64,
    pub secondary_signal: Option<SecondaryData>,
    pub forensic_result: Option<ForensicStatus>,
    /// Non-positive change to sensor integrity
    pub sensor_integrity_change: f64,
    /// Seconds consumed by the decision
    pub time_consumed: f64,
}

/// Draw the information that arrives after taking `decision` in `state`.
///
/// Draws happen in a fixed order so a seeded `rng` reproduces an episode:
/// confidence, then secondary arrival and value (stage 1 onwards), then
/// forensic yield and verdict (evidence-producing actions only), then the
/// integrity loss on a compromised network.
pub fn generate_exogenous<R: Rng>(
    state: &GovernanceState,
    decision: Decision,
    rng: &mut R,
) -> ExogenousInfo {
    let profile = decision.profile();

    let z: f64 = rng.sample(StandardNormal);
    let drift = CONFIDENCE_DRIFT_MEAN + CONFIDENCE_DRIFT_SD * z;
    let ai_confidence_update = clamp_between(state.threat_confidence + drift, 0.5, 0.99);

    let secondary_signal = if state.stage >= 1 && rng.random::<f64>() < SECONDARY_ARRIVAL_PROB {
        weighted_sample(rng, &SECONDARY_WEIGHTS)
    } else {
        None
    };

    let forensic_result = if profile.yields_forensics && rng.random::<f64>() < FORENSIC_YIELD_PROB
    {
        weighted_sample(rng, &FORENSIC_WEIGHTS)
    } else {
        None
    };

    let sensor_integrity_change = if state.cyber_detected && !profile.shields_sensors {
        -rng.random_range(0.05_f64..0.15)
    } else {
        0.0
    };

    ExogenousInfo {
        ai_confidence_update,
        secondary_signal,
        forensic_result,
        sensor_integrity_change,
        time_consumed: profile.time_cost,
    }
}
