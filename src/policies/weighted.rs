//! Weighted feature scoring: X^π(S_t | θ) = argmax_x Σ θ_f · φ_f(S_t, x)

use serde::{Deserialize, Serialize};

use super::require_feasible;
use crate::{
    Error, Result,
    model::{Decision, GovernanceState},
    ports::Policy,
};

/// Time cost at which the speed feature reaches zero.
const SPEED_HORIZON_SECS: f64 = 300.0;

/// Evidence feature is worth more when sensors are untrustworthy.
const LOW_INTEGRITY: f64 = 0.5;
const LOW_INTEGRITY_EVIDENCE_BOOST: f64 = 1.3;

/// Duty feature is worth less when the threat looks unlikely.
const LOW_THREAT: f64 = 0.3;
const LOW_THREAT_DUTY_DISCOUNT: f64 = 0.5;

/// Static features of one action, indexed by [`Decision::index`].
struct Features {
    evidence: f64,
    caution: f64,
    duty: f64,
}

const fn features(evidence: f64, caution: f64, duty: f64) -> Features {
    Features {
        evidence,
        caution,
        duty,
    }
}

const FEATURES: [Features; Decision::COUNT] = [
    features(0.1, 0.1, 1.0), // escalate
    features(1.0, 0.9, 0.3), // investigate
    features(0.7, 1.0, 0.7), // parallel
    features(0.6, 0.5, 0.2), // isolate
    features(0.5, 0.6, 0.3), // downgrade
    features(0.2, 0.8, 0.5), // maintain
    features(0.3, 0.2, 0.1), // petrov_call
    features(0.8, 0.4, 0.4), // stand_down
    features(0.4, 0.1, 0.9), // escalate_both
    features(0.9, 0.7, 0.6), // call_allied
    features(0.0, 0.0, 0.0), // timeout
];

/// Feature weights θ of [`WeightedScoringPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    #[serde(rename = "w_evidence")]
    pub evidence: f64,
    #[serde(rename = "w_caution")]
    pub caution: f64,
    #[serde(rename = "w_duty")]
    pub duty: f64,
    #[serde(rename = "w_speed")]
    pub speed: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            evidence: 0.35,
            caution: 0.25,
            duty: 0.20,
            speed: 0.20,
        }
    }
}

impl ScoringWeights {
    /// Reject negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("w_evidence", self.evidence),
            ("w_caution", self.caution),
            ("w_duty", self.duty),
            ("w_speed", self.speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Picks the feasible action with the highest weighted feature score.
#[derive(Debug, Clone)]
pub struct WeightedScoringPolicy {
    weights: ScoringWeights,
    name: String,
}

impl WeightedScoringPolicy {
    /// Create a policy with arbitrary weights. Degenerate weights are
    /// accepted; use [`WeightedScoringPolicy::validated`] to reject them.
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            name: "weighted_scoring".to_string(),
        }
    }

    /// Create a policy after checking the weights are finite and non-negative.
    pub fn validated(weights: ScoringWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self::new(weights))
    }

    /// Override the label reported in results.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score of taking `action` in `state`.
    pub fn score(&self, state: &GovernanceState, action: Decision) -> f64 {
        let f = &FEATURES[action.index()];
        let mut evidence = f.evidence;
        let mut duty = f.duty;
        let speed = 1.0 - action.time_cost() / SPEED_HORIZON_SECS;

        if state.sensor_integrity < LOW_INTEGRITY {
            evidence *= LOW_INTEGRITY_EVIDENCE_BOOST;
        }
        if state.estimated_threat_prob < LOW_THREAT {
            duty *= LOW_THREAT_DUTY_DISCOUNT;
        }

        let w = &self.weights;
        w.evidence * evidence + w.caution * f.caution + w.duty * duty + w.speed * speed
    }
}

impl Default for WeightedScoringPolicy {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl Policy for WeightedScoringPolicy {
    fn decide(&self, state: &GovernanceState) -> Result<Decision> {
        let actions = require_feasible(state)?;
        if let [only] = actions {
            return Ok(*only);
        }

        let mut best = actions[0];
        let mut best_score = self.score(state, best);
        for &action in &actions[1..] {
            let score = self.score(state, action);
            if score > best_score {
                best = action;
                best_score = score;
            }
        }
        Ok(best)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
