//! Contribution function C(S_t, x_t)
//!
//! Governance quality is scored on five dimensions and collapsed to a scalar
//! with fixed weights when a single number is needed.

use std::{fmt, ops::AddAssign};

use serde::{Deserialize, Serialize};

use super::{
    decision::{Decision, ProportionalityClass},
    state::GovernanceState,
};

/// One axis of governance quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Consistency,
    Proportionality,
    Reversibility,
    Auditability,
    EpistemicRigor,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Consistency,
        Dimension::Proportionality,
        Dimension::Reversibility,
        Dimension::Auditability,
        Dimension::EpistemicRigor,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Dimension::Consistency => "consistency",
            Dimension::Proportionality => "proportionality",
            Dimension::Reversibility => "reversibility",
            Dimension::Auditability => "auditability",
            Dimension::EpistemicRigor => "epistemic_rigor",
        }
    }

    /// Weight of this dimension in [`scalar_contribution`].
    pub const fn weight(self) -> f64 {
        DIMENSION_WEIGHTS[self as usize]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalarisation weights, in [`Dimension::ALL`] order. They sum to one.
pub const DIMENSION_WEIGHTS: [f64; 5] = [0.15, 0.25, 0.20, 0.20, 0.20];

/// Score on every dimension for one decision (or a sum over decisions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionVector {
    pub consistency: f64,
    pub proportionality: f64,
    pub reversibility: f64,
    pub auditability: f64,
    pub epistemic_rigor: f64,
}

impl ContributionVector {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Consistency => self.consistency,
            Dimension::Proportionality => self.proportionality,
            Dimension::Reversibility => self.reversibility,
            Dimension::Auditability => self.auditability,
            Dimension::EpistemicRigor => self.epistemic_rigor,
        }
    }

    fn get_mut(&mut self, dimension: Dimension) -> &mut f64 {
        match dimension {
            Dimension::Consistency => &mut self.consistency,
            Dimension::Proportionality => &mut self.proportionality,
            Dimension::Reversibility => &mut self.reversibility,
            Dimension::Auditability => &mut self.auditability,
            Dimension::EpistemicRigor => &mut self.epistemic_rigor,
        }
    }

    /// `(dimension, value)` pairs in [`Dimension::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Weighted sum of the dimensions.
    pub fn weighted_sum(&self) -> f64 {
        self.iter().map(|(d, v)| v * d.weight()).sum()
    }

    /// Apply `f` to every dimension.
    pub fn map(mut self, f: impl Fn(f64) -> f64) -> Self {
        for dimension in Dimension::ALL {
            let value = self.get_mut(dimension);
            *value = f(*value);
        }
        self
    }
}

impl AddAssign for ContributionVector {
    fn add_assign(&mut self, rhs: Self) {
        for dimension in Dimension::ALL {
            *self.get_mut(dimension) += rhs.get(dimension);
        }
    }
}

const INVESTIGATION_PROPORTIONALITY: f64 = 20.0;
const PROPORTIONALITY_SCALE: f64 = 30.0;

const AUDIT_EVIDENCE_SEEKING: f64 = 25.0;
const AUDIT_ACTING_ON_EVIDENCE: f64 = 20.0;
const AUDIT_UNSUPPORTED: f64 = 8.0;

const CONSISTENCY_FIRST: f64 = 15.0;
const CONSISTENCY_COHERENT: f64 = 25.0;
const CONSISTENCY_INCOHERENT: f64 = 10.0;

/// Score `decision` taken in `state` on every dimension. All values are
/// non-negative.
pub fn contribution(state: &GovernanceState, decision: Decision) -> ContributionVector {
    let profile = decision.profile();
    let p = state.estimated_threat_prob;

    let proportionality = match profile.proportionality {
        ProportionalityClass::Escalation => p * PROPORTIONALITY_SCALE,
        ProportionalityClass::Investigation => INVESTIGATION_PROPORTIONALITY,
        ProportionalityClass::DeEscalation => (1.0 - p) * PROPORTIONALITY_SCALE,
        ProportionalityClass::Neutral => 0.0,
    };

    let auditability = if profile.evidence_seeking {
        AUDIT_EVIDENCE_SEEKING
    } else if state.forensic_status.is_confirmed() {
        AUDIT_ACTING_ON_EVIDENCE
    } else {
        AUDIT_UNSUPPORTED
    };

    let consistency = match state.last_decision() {
        None => CONSISTENCY_FIRST,
        Some(previous) if previous.coheres_with(decision) => CONSISTENCY_COHERENT,
        Some(_) => CONSISTENCY_INCOHERENT,
    };

    ContributionVector {
        consistency,
        proportionality,
        reversibility: profile.reversibility,
        auditability,
        epistemic_rigor: profile.epistemic_rigor,
    }
}

/// Weighted scalar of [`contribution`].
pub fn scalar_contribution(state: &GovernanceState, decision: Decision) -> f64 {
    contribution(state, decision).weighted_sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForensicStatus;

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = DIMENSION_WEIGHTS.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn first_investigation_scores() {
        let state = GovernanceState::default_scenario();
        let c = contribution(&state, Decision::Investigate);
        assert_eq!(
            c,
            ContributionVector {
                consistency: 15.0,
                proportionality: 20.0,
                reversibility: 25.0,
                auditability: 25.0,
                epistemic_rigor: 28.0,
            }
        );
        let expected = 15.0 * 0.15 + 20.0 * 0.25 + 25.0 * 0.2 + 25.0 * 0.2 + 28.0 * 0.2;
        assert!((scalar_contribution(&state, Decision::Investigate) - expected).abs() < 1e-9);
    }

    #[test]
    fn proportionality_tracks_belief() {
        let state = GovernanceState {
            estimated_threat_prob: 0.2,
            ..GovernanceState::default_scenario()
        };
        assert!((contribution(&state, Decision::Escalate).proportionality - 6.0).abs() < 1e-9);
        assert!((contribution(&state, Decision::StandDown).proportionality - 24.0).abs() < 1e-9);
        assert_eq!(contribution(&state, Decision::Maintain).proportionality, 0.0);
    }

    #[test]
    fn auditability_rewards_confirmed_forensics() {
        let mut state = GovernanceState::default_scenario();
        assert_eq!(contribution(&state, Decision::Maintain).auditability, 8.0);
        state.forensic_status = ForensicStatus::ConfirmedClean;
        assert_eq!(contribution(&state, Decision::Maintain).auditability, 20.0);
        assert_eq!(contribution(&state, Decision::CallAllied).auditability, 25.0);
    }

    #[test]
    fn consistency_rewards_coherent_follow_up() {
        let state = GovernanceState {
            decision_history: vec![Decision::Investigate],
            stage: 1,
            ..GovernanceState::default_scenario()
        };
        assert_eq!(contribution(&state, Decision::PetrovCall).consistency, 25.0);
        assert_eq!(contribution(&state, Decision::Maintain).consistency, 10.0);
    }

    #[test]
    fn investigation_is_more_rigorous_than_escalation() {
        let state = GovernanceState::default_scenario();
        let investigate = contribution(&state, Decision::Investigate);
        let escalate = contribution(&state, Decision::Escalate);
        assert!(investigate.epistemic_rigor >= escalate.epistemic_rigor);
        assert!(escalate.reversibility < investigate.reversibility);
    }

    #[test]
    fn contributions_are_non_negative() {
        for p in [0.01, 0.5, 0.99] {
            let state = GovernanceState {
                estimated_threat_prob: p,
                ..GovernanceState::default_scenario()
            };
            for decision in Decision::ALL {
                let c = contribution(&state, decision);
                assert!(c.iter().all(|(_, v)| v >= 0.0), "{decision}: {c:?}");
            }
        }
    }

    #[test]
    fn vectors_accumulate() {
        let mut total = ContributionVector::default();
        let state = GovernanceState::default_scenario();
        total += contribution(&state, Decision::Escalate);
        total += contribution(&state, Decision::Escalate);
        assert_eq!(total.reversibility, 10.0);
        let halved = total.map(|v| v / 2.0);
        assert_eq!(halved.reversibility, 5.0);
    }
}
