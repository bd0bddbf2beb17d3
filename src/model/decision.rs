//! Decision variables and feasibility
//!
//! Every action carries a static [`ActionProfile`] indexed by its discriminant.
//! Adding an action means adding a variant and a table row; the transition,
//! generator and contribution code read the table rather than branching on
//! individual actions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::state::GovernanceState;
use crate::Error;

/// An action the decision-maker can take.
///
/// Each action is legal only in one stage (see [`STAGE_ACTIONS`]), except
/// [`Decision::Timeout`], which is forced once the decision window has closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Escalate,
    Investigate,
    Parallel,
    Isolate,
    Downgrade,
    Maintain,
    PetrovCall,
    StandDown,
    EscalateBoth,
    CallAllied,
    Timeout,
}

impl Decision {
    /// Number of actions in the enumeration.
    pub const COUNT: usize = 11;

    /// All actions in declaration order.
    pub const ALL: [Decision; Decision::COUNT] = [
        Decision::Escalate,
        Decision::Investigate,
        Decision::Parallel,
        Decision::Isolate,
        Decision::Downgrade,
        Decision::Maintain,
        Decision::PetrovCall,
        Decision::StandDown,
        Decision::EscalateBoth,
        Decision::CallAllied,
        Decision::Timeout,
    ];

    /// Position of this action in [`Decision::ALL`] and in the static tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Decision::Escalate => "escalate",
            Decision::Investigate => "investigate",
            Decision::Parallel => "parallel",
            Decision::Isolate => "isolate",
            Decision::Downgrade => "downgrade",
            Decision::Maintain => "maintain",
            Decision::PetrovCall => "petrov_call",
            Decision::StandDown => "stand_down",
            Decision::EscalateBoth => "escalate_both",
            Decision::CallAllied => "call_allied",
            Decision::Timeout => "timeout",
        }
    }

    /// Static profile of this action.
    pub fn profile(self) -> &'static ActionProfile {
        &PROFILES[self.index()]
    }

    /// Seconds of the decision window this action consumes.
    pub fn time_cost(self) -> f64 {
        self.profile().time_cost
    }

    /// Whether `next` is a coherent follow-up to this action.
    pub fn coheres_with(self, next: Decision) -> bool {
        self.profile().coherent_successors.contains(&next)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Decision::ALL
            .iter()
            .copied()
            .find(|decision| decision.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownDecision {
                identifier: s.to_string(),
            })
    }
}

/// How an action moves the escalation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationEffect {
    /// Leave the level unchanged
    Keep,
    /// Raise by the given amount, capped at the maximum level
    Raise(u8),
    /// Lower by the given amount, floored at zero
    Lower(u8),
    /// Force the level to the given value
    Force(u8),
}

impl EscalationEffect {
    /// Highest escalation level.
    pub const MAX_LEVEL: u8 = 3;

    /// Apply the effect to a current level.
    pub fn apply(self, level: u8) -> u8 {
        match self {
            EscalationEffect::Keep => level,
            EscalationEffect::Raise(by) => level.saturating_add(by).min(Self::MAX_LEVEL),
            EscalationEffect::Lower(by) => level.saturating_sub(by),
            EscalationEffect::Force(to) => to,
        }
    }
}

/// Which proportionality rule scores an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProportionalityClass {
    /// Scored by the estimated threat probability
    Escalation,
    /// Flat score
    Investigation,
    /// Scored by the complement of the estimated threat probability
    DeEscalation,
    /// No proportionality credit
    Neutral,
}

/// Additive change to one argument strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgumentEffect {
    /// Argument identifier
    pub argument: &'static str,
    /// Strength assumed when the argument is not yet tracked
    pub base: f64,
    /// Amount added to the strength
    pub delta: f64,
}

impl ArgumentEffect {
    const fn new(argument: &'static str, base: f64, delta: f64) -> Self {
        Self {
            argument,
            base,
            delta,
        }
    }
}

/// Static description of one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionProfile {
    pub decision: Decision,
    /// Seconds consumed by taking the action
    pub time_cost: f64,
    pub escalation: EscalationEffect,
    pub proportionality: ProportionalityClass,
    /// Reversibility contribution (0-25)
    pub reversibility: f64,
    /// Epistemic rigor contribution
    pub epistemic_rigor: f64,
    /// Counts as evidence gathering for auditability
    pub evidence_seeking: bool,
    /// May produce a forensic result
    pub yields_forensics: bool,
    /// Starts a forensic investigation when none is running
    pub opens_investigation: bool,
    /// Leaves sensor integrity intact on a compromised network
    pub shields_sensors: bool,
    pub argument_effects: &'static [ArgumentEffect],
    /// Actions that coherently follow this one
    pub coherent_successors: &'static [Decision],
}

const PROFILES: [ActionProfile; Decision::COUNT] = [
    ActionProfile {
        decision: Decision::Escalate,
        time_cost: 240.0,
        escalation: EscalationEffect::Raise(2),
        proportionality: ProportionalityClass::Escalation,
        reversibility: 5.0,
        epistemic_rigor: 10.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[
            ArgumentEffect::new("duty_to_report", 0.5, 0.3),
            ArgumentEffect::new("proportionality", 0.5, -0.2),
        ],
        coherent_successors: &[Decision::Maintain, Decision::EscalateBoth],
    },
    ActionProfile {
        decision: Decision::Investigate,
        time_cost: 300.0,
        escalation: EscalationEffect::Keep,
        proportionality: ProportionalityClass::Investigation,
        reversibility: 25.0,
        epistemic_rigor: 28.0,
        evidence_seeking: true,
        yields_forensics: true,
        opens_investigation: true,
        shields_sensors: false,
        argument_effects: &[
            ArgumentEffect::new("evidence_based", 0.5, 0.2),
            ArgumentEffect::new("ai_confidence", 0.7, -0.1),
        ],
        coherent_successors: &[
            Decision::Downgrade,
            Decision::StandDown,
            Decision::CallAllied,
            Decision::PetrovCall,
        ],
    },
    ActionProfile {
        decision: Decision::Parallel,
        time_cost: 240.0,
        escalation: EscalationEffect::Raise(1),
        proportionality: ProportionalityClass::Investigation,
        reversibility: 25.0,
        epistemic_rigor: 10.0,
        evidence_seeking: true,
        yields_forensics: true,
        opens_investigation: true,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[Decision::Maintain, Decision::EscalateBoth, Decision::Downgrade],
    },
    ActionProfile {
        decision: Decision::Isolate,
        time_cost: 180.0,
        escalation: EscalationEffect::Keep,
        proportionality: ProportionalityClass::Neutral,
        reversibility: 15.0,
        epistemic_rigor: 22.0,
        evidence_seeking: false,
        yields_forensics: true,
        opens_investigation: false,
        shields_sensors: true,
        argument_effects: &[
            ArgumentEffect::new("clean_data", 0.5, 0.3),
            ArgumentEffect::new("ai_confidence", 0.7, -0.3),
        ],
        coherent_successors: &[Decision::Downgrade, Decision::StandDown],
    },
    ActionProfile {
        decision: Decision::Downgrade,
        time_cost: 120.0,
        escalation: EscalationEffect::Lower(1),
        proportionality: ProportionalityClass::DeEscalation,
        reversibility: 20.0,
        epistemic_rigor: 10.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[],
    },
    ActionProfile {
        decision: Decision::Maintain,
        time_cost: 180.0,
        escalation: EscalationEffect::Keep,
        proportionality: ProportionalityClass::Neutral,
        reversibility: 20.0,
        epistemic_rigor: 10.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[],
    },
    ActionProfile {
        decision: Decision::PetrovCall,
        time_cost: 120.0,
        escalation: EscalationEffect::Force(0),
        proportionality: ProportionalityClass::DeEscalation,
        reversibility: 5.0,
        epistemic_rigor: 15.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[],
    },
    ActionProfile {
        decision: Decision::StandDown,
        time_cost: 0.0,
        escalation: EscalationEffect::Force(0),
        proportionality: ProportionalityClass::DeEscalation,
        reversibility: 10.0,
        epistemic_rigor: 10.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[ArgumentEffect::new("forensic_evidence", 0.5, 0.4)],
        coherent_successors: &[],
    },
    ActionProfile {
        decision: Decision::EscalateBoth,
        time_cost: 0.0,
        escalation: EscalationEffect::Force(EscalationEffect::MAX_LEVEL),
        proportionality: ProportionalityClass::Escalation,
        reversibility: 8.0,
        epistemic_rigor: 10.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[],
    },
    ActionProfile {
        decision: Decision::CallAllied,
        time_cost: 0.0,
        escalation: EscalationEffect::Keep,
        proportionality: ProportionalityClass::Neutral,
        reversibility: 20.0,
        epistemic_rigor: 25.0,
        evidence_seeking: true,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[],
    },
    ActionProfile {
        decision: Decision::Timeout,
        time_cost: 180.0,
        escalation: EscalationEffect::Keep,
        proportionality: ProportionalityClass::Neutral,
        reversibility: 0.0,
        epistemic_rigor: 10.0,
        evidence_seeking: false,
        yields_forensics: false,
        opens_investigation: false,
        shields_sensors: false,
        argument_effects: &[],
        coherent_successors: &[],
    },
];

/// Actions registered for each stage, in the order policies enumerate them.
pub const STAGE_ACTIONS: [&[Decision]; 3] = [
    &[
        Decision::Escalate,
        Decision::Investigate,
        Decision::Parallel,
        Decision::Isolate,
    ],
    &[Decision::Downgrade, Decision::Maintain, Decision::PetrovCall],
    &[
        Decision::StandDown,
        Decision::EscalateBoth,
        Decision::CallAllied,
    ],
];

const TIMEOUT_ONLY: &[Decision] = &[Decision::Timeout];

/// Actions registered for `stage`; empty past the last stage.
pub fn stage_actions(stage: usize) -> &'static [Decision] {
    STAGE_ACTIONS.get(stage).copied().unwrap_or(&[])
}

/// The feasible action set X(S_t).
///
/// Once the decision window has closed only [`Decision::Timeout`] remains.
/// Past the last registered stage the set is empty and callers must treat the
/// episode as over.
pub fn feasible_actions(state: &GovernanceState) -> &'static [Decision] {
    if state.time_remaining <= 0.0 {
        return TIMEOUT_ONLY;
    }
    stage_actions(state.stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_indexed_by_discriminant() {
        for decision in Decision::ALL {
            assert_eq!(decision.profile().decision, decision);
        }
    }

    #[test]
    fn identifiers_round_trip_through_from_str() {
        for decision in Decision::ALL {
            let parsed: Decision = decision.as_str().parse().unwrap();
            assert_eq!(parsed, decision);
        }
        assert!("launch".parse::<Decision>().is_err());
    }

    #[test]
    fn serde_uses_snake_case_identifiers() {
        let json = serde_json::to_string(&Decision::PetrovCall).unwrap();
        assert_eq!(json, "\"petrov_call\"");
    }

    #[test]
    fn stages_are_disjoint() {
        let mut seen = Vec::new();
        for actions in STAGE_ACTIONS {
            for action in actions {
                assert!(!seen.contains(action), "{action} appears in multiple stages");
                seen.push(*action);
            }
        }
        assert!(!seen.contains(&Decision::Timeout));
    }

    #[test]
    fn stage_past_the_horizon_has_no_actions() {
        assert!(stage_actions(3).is_empty());
        assert!(stage_actions(17).is_empty());
    }

    #[test]
    fn escalation_effects_respect_bounds() {
        assert_eq!(EscalationEffect::Raise(2).apply(2), 3);
        assert_eq!(EscalationEffect::Lower(1).apply(0), 0);
        assert_eq!(EscalationEffect::Force(0).apply(3), 0);
        assert_eq!(EscalationEffect::Keep.apply(2), 2);
    }

    #[test]
    fn coherent_successors_follow_table() {
        assert!(Decision::Investigate.coheres_with(Decision::PetrovCall));
        assert!(Decision::Parallel.coheres_with(Decision::Downgrade));
        assert!(!Decision::Parallel.coheres_with(Decision::PetrovCall));
        assert!(!Decision::Downgrade.coheres_with(Decision::CallAllied));
    }
}
