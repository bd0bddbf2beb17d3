//! Threshold rules: X^π(S_t | θ) as an analytic function of the state

use serde::{Deserialize, Serialize};

use super::require_feasible;
use crate::{
    Result,
    model::{Decision, ForensicStatus, GovernanceState, SecondaryData},
    ports::Policy,
};

/// Tunable thresholds θ of [`ThresholdPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    /// AI confidence above which the alert is taken at face value
    pub confidence_threshold: f64,
    /// Sensor integrity below which readings are distrusted
    pub integrity_threshold: f64,
    /// Fraction of the decision window below which time forces action
    pub time_urgency: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.90,
            integrity_threshold: 0.5,
            time_urgency: 0.25,
        }
    }
}

/// Rule-based policy over confidence, integrity and time.
#[derive(Debug, Clone)]
pub struct ThresholdPolicy {
    params: ThresholdParams,
    name: String,
}

impl ThresholdPolicy {
    pub fn new(params: ThresholdParams) -> Self {
        Self {
            params,
            name: "threshold".to_string(),
        }
    }

    /// Override the label reported in results.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn params(&self) -> &ThresholdParams {
        &self.params
    }

    fn initial_response(&self, state: &GovernanceState) -> Decision {
        let p = &self.params;
        if state.threat_confidence > p.confidence_threshold
            && state.sensor_integrity > p.integrity_threshold
        {
            Decision::Escalate
        } else if state.cyber_detected && state.sensor_integrity < p.integrity_threshold {
            Decision::Investigate
        } else if state.time_fraction() < p.time_urgency {
            Decision::Escalate
        } else {
            Decision::Parallel
        }
    }

    fn follow_up(&self, state: &GovernanceState) -> Decision {
        if state.secondary_data == SecondaryData::Contradicts {
            Decision::Downgrade
        } else if state.threat_confidence > self.params.confidence_threshold {
            Decision::Maintain
        } else {
            Decision::PetrovCall
        }
    }

    fn final_call(state: &GovernanceState) -> Decision {
        match state.forensic_status {
            ForensicStatus::ConfirmedAttack => Decision::StandDown,
            ForensicStatus::ConfirmedClean => Decision::EscalateBoth,
            ForensicStatus::None | ForensicStatus::InProgress => Decision::CallAllied,
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(ThresholdParams::default())
    }
}

impl Policy for ThresholdPolicy {
    fn decide(&self, state: &GovernanceState) -> Result<Decision> {
        let actions = require_feasible(state)?;
        if let [only] = actions {
            return Ok(*only);
        }
        let decision = match state.stage {
            0 => self.initial_response(state),
            1 => self.follow_up(state),
            2 => Self::final_call(state),
            _ => actions[0],
        };
        Ok(decision)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
