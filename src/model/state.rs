//! State variables S_t = (R_t, I_t, B_t)

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use super::decision::{ArgumentEffect, Decision};
use crate::identifiers::ArgumentId;

/// Length of [`GovernanceState::to_vector`].
pub const STATE_VECTOR_LEN: usize = 10;

/// Length of the decision window in the default scenario, in seconds.
pub const DECISION_WINDOW_SECS: f64 = 720.0;

/// Progress of the forensic investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForensicStatus {
    #[default]
    None,
    InProgress,
    ConfirmedAttack,
    ConfirmedClean,
}

impl ForensicStatus {
    /// Forensics have reached a verdict either way.
    pub fn is_confirmed(self) -> bool {
        matches!(
            self,
            ForensicStatus::ConfirmedAttack | ForensicStatus::ConfirmedClean
        )
    }

    fn feature_value(self) -> f64 {
        match self {
            ForensicStatus::None => 0.0,
            ForensicStatus::InProgress => 0.3,
            ForensicStatus::ConfirmedAttack => 0.8,
            ForensicStatus::ConfirmedClean => 1.0,
        }
    }
}

/// What the independent (secondary) sensor says about the threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryData {
    Corroborates,
    Contradicts,
    Partial,
    #[default]
    Absent,
}

impl SecondaryData {
    fn feature_value(self) -> f64 {
        match self {
            SecondaryData::Corroborates => 1.0,
            SecondaryData::Contradicts => -1.0,
            SecondaryData::Partial => 0.3,
            SecondaryData::Absent => 0.0,
        }
    }
}

/// Strengths of the arguments in play, keyed by argument.
///
/// The mapping is immutable once built. Snapshots share storage until a
/// transition actually changes a strength, so a recorded trajectory holds one
/// copy per change rather than one per stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentStrengths(Arc<BTreeMap<ArgumentId, f64>>);

impl ArgumentStrengths {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(argument, strength)` pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<ArgumentId>,
    {
        Self(Arc::new(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Strength of `argument`, if tracked.
    pub fn get(&self, argument: &str) -> Option<f64> {
        self.0.get(argument).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArgumentId, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Whether both values point at the same underlying mapping.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// New mapping with `effects` applied; untracked arguments start from the
    /// effect's base strength. Without effects the storage is shared.
    pub fn adjusted(&self, effects: &[ArgumentEffect]) -> Self {
        if effects.is_empty() {
            return self.clone();
        }
        let mut next = Arc::clone(&self.0);
        let map = Arc::make_mut(&mut next);
        for effect in effects {
            let current = map.get(effect.argument).copied().unwrap_or(effect.base);
            map.insert(ArgumentId::new(effect.argument), current + effect.delta);
        }
        Self(next)
    }
}

/// The complete state of a governance decision at stage t.
///
/// - Resource: `time_remaining`, `escalation_level`, `staff_available`
/// - Informational: `threat_confidence`, `cyber_detected`, `sensor_integrity`,
///   `forensic_status`, `secondary_data`
/// - Belief: `estimated_threat_prob`, `arg_strengths`
/// - Control: `stage`, `decision_history`
///
/// States are values: a transition always produces a new state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceState {
    /// Seconds left in the decision window
    pub time_remaining: f64,
    /// 0 = normal, 1 = elevated, 2 = crisis, 3 = full escalation
    pub escalation_level: u8,
    pub staff_available: u32,
    /// Confidence reported by the AI early-warning system
    pub threat_confidence: f64,
    pub cyber_detected: bool,
    /// Trust in the primary sensors (0 = compromised, 1 = clean)
    pub sensor_integrity: f64,
    #[serde(default)]
    pub forensic_status: ForensicStatus,
    #[serde(default)]
    pub secondary_data: SecondaryData,
    /// Our own estimate that the threat is real, kept in [0.01, 0.99]
    pub estimated_threat_prob: f64,
    #[serde(default)]
    pub arg_strengths: ArgumentStrengths,
    #[serde(default)]
    pub stage: usize,
    #[serde(default)]
    pub decision_history: Vec<Decision>,
}

impl GovernanceState {
    /// The reference crisis: a high-confidence AI alert on a network with a
    /// detected intrusion, twelve minutes to decide, a skeleton crew.
    pub fn default_scenario() -> Self {
        Self {
            time_remaining: DECISION_WINDOW_SECS,
            escalation_level: 0,
            staff_available: 4,
            threat_confidence: 0.87,
            cyber_detected: true,
            sensor_integrity: 0.7,
            forensic_status: ForensicStatus::None,
            secondary_data: SecondaryData::Absent,
            estimated_threat_prob: 0.45,
            arg_strengths: ArgumentStrengths::from_pairs([
                ("baseline_allow", 0.3),
                ("ai_confidence", 0.7),
                ("sensor_reliability", 0.6),
                ("measured_response", 0.65),
                ("escalation_duty", 0.7),
                ("time_pressure", 0.75),
            ]),
            stage: 0,
            decision_history: Vec::new(),
        }
    }

    /// Fraction of the default decision window still available.
    pub fn time_fraction(&self) -> f64 {
        self.time_remaining / DECISION_WINDOW_SECS
    }

    /// Most recent decision, if any.
    pub fn last_decision(&self) -> Option<Decision> {
        self.decision_history.last().copied()
    }

    /// Numeric feature projection with a fixed length and component order.
    pub fn to_vector(&self) -> [f64; STATE_VECTOR_LEN] {
        [
            self.time_remaining / DECISION_WINDOW_SECS,
            f64::from(self.escalation_level) / 3.0,
            f64::from(self.staff_available) / 20.0,
            self.threat_confidence,
            if self.cyber_detected { 1.0 } else { 0.0 },
            self.sensor_integrity,
            self.forensic_status.feature_value(),
            self.secondary_data.feature_value(),
            self.estimated_threat_prob,
            self.stage as f64 / 3.0,
        ]
    }
}

impl Default for GovernanceState {
    fn default() -> Self {
        Self::default_scenario()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_constants() {
        let s = GovernanceState::default_scenario();
        assert_eq!(s.time_remaining, 720.0);
        assert_eq!(s.escalation_level, 0);
        assert_eq!(s.staff_available, 4);
        assert_eq!(s.threat_confidence, 0.87);
        assert!(s.cyber_detected);
        assert_eq!(s.sensor_integrity, 0.7);
        assert_eq!(s.forensic_status, ForensicStatus::None);
        assert_eq!(s.secondary_data, SecondaryData::Absent);
        assert_eq!(s.estimated_threat_prob, 0.45);
        assert_eq!(s.arg_strengths.len(), 6);
        assert_eq!(s.arg_strengths.get("time_pressure"), Some(0.75));
        assert_eq!(s.stage, 0);
        assert!(s.decision_history.is_empty());
    }

    #[test]
    fn to_vector_is_normalized_for_default_scenario() {
        let vec = GovernanceState::default_scenario().to_vector();
        assert_eq!(vec.len(), STATE_VECTOR_LEN);
        assert!(vec.iter().all(|v| (0.0..=1.0).contains(v)), "{vec:?}");
        assert_eq!(vec[0], 1.0);
        assert_eq!(vec[2], 0.2);
    }

    #[test]
    fn to_vector_encodes_categorical_fields() {
        let s = GovernanceState {
            forensic_status: ForensicStatus::ConfirmedAttack,
            secondary_data: SecondaryData::Contradicts,
            stage: 3,
            escalation_level: 3,
            ..GovernanceState::default_scenario()
        };
        let vec = s.to_vector();
        assert_eq!(vec[1], 1.0);
        assert_eq!(vec[6], 0.8);
        assert_eq!(vec[7], -1.0);
        assert_eq!(vec[9], 1.0);
    }

    #[test]
    fn adjusted_without_effects_shares_storage() {
        let args = ArgumentStrengths::from_pairs([("ai_confidence", 0.7)]);
        let same = args.adjusted(&[]);
        assert!(same.shares_storage_with(&args));
    }

    #[test]
    fn adjusted_uses_base_for_missing_arguments() {
        let args = ArgumentStrengths::from_pairs([("ai_confidence", 0.9)]);
        let next = args.adjusted(&[
            ArgumentEffect {
                argument: "evidence_based",
                base: 0.5,
                delta: 0.2,
            },
            ArgumentEffect {
                argument: "ai_confidence",
                base: 0.7,
                delta: -0.1,
            },
        ]);
        assert!(!next.shares_storage_with(&args));
        assert!((next.get("evidence_based").unwrap() - 0.7).abs() < 1e-12);
        assert!((next.get("ai_confidence").unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(args.get("ai_confidence"), Some(0.9), "prior mapping is untouched");
    }

    #[test]
    fn state_deserializes_with_defaults() {
        let json = r#"{
            "time_remaining": 360.0,
            "escalation_level": 1,
            "staff_available": 6,
            "threat_confidence": 0.95,
            "cyber_detected": false,
            "sensor_integrity": 0.3,
            "estimated_threat_prob": 0.8
        }"#;
        let s: GovernanceState = serde_json::from_str(json).unwrap();
        assert_eq!(s.forensic_status, ForensicStatus::None);
        assert_eq!(s.secondary_data, SecondaryData::Absent);
        assert!(s.arg_strengths.is_empty());
        assert_eq!(s.stage, 0);
    }
}
