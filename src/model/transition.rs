//! Transition function S_{t+1} = S^M(S_t, x_t, W_{t+1})

use super::{
    decision::Decision,
    exogenous::ExogenousInfo,
    state::{ForensicStatus, GovernanceState, SecondaryData},
};
use crate::utils::clamp_between;

/// Belief multiplier once forensics confirm a cyber attack.
const CONFIRMED_ATTACK_FACTOR: f64 = 0.15;
/// Belief multiplier when the secondary sensor contradicts the alert.
const CONTRADICTS_FACTOR: f64 = 0.4;
/// Belief multiplier when the secondary sensor corroborates the alert.
const CORROBORATES_FACTOR: f64 = 1.5;
/// Belief multiplier for rising confidence on compromised sensors.
const MANIPULATION_FACTOR: f64 = 0.8;
/// Integrity below which rising AI confidence is treated as suspect.
const MANIPULATION_INTEGRITY: f64 = 0.5;

const MIN_THREAT_PROB: f64 = 0.01;
const MAX_THREAT_PROB: f64 = 0.99;

/// Compute the successor state. Pure: the input state is left untouched.
pub fn transition(
    state: &GovernanceState,
    decision: Decision,
    info: &ExogenousInfo,
) -> GovernanceState {
    let profile = decision.profile();

    let time_remaining = (state.time_remaining - info.time_consumed).max(0.0);
    let escalation_level = profile.escalation.apply(state.escalation_level);
    let sensor_integrity = clamp_between(
        state.sensor_integrity + info.sensor_integrity_change,
        0.0,
        1.0,
    );

    let forensic_status = match info.forensic_result {
        Some(result) => result,
        None if profile.opens_investigation && state.forensic_status == ForensicStatus::None => {
            ForensicStatus::InProgress
        }
        None => state.forensic_status,
    };
    let secondary_data = info.secondary_signal.unwrap_or(state.secondary_data);

    let mut prob = state.estimated_threat_prob;
    if forensic_status == ForensicStatus::ConfirmedAttack {
        prob *= CONFIRMED_ATTACK_FACTOR;
    }
    match secondary_data {
        SecondaryData::Contradicts => prob *= CONTRADICTS_FACTOR,
        SecondaryData::Corroborates => prob = MAX_THREAT_PROB.min(prob * CORROBORATES_FACTOR),
        SecondaryData::Partial | SecondaryData::Absent => {}
    }
    if info.ai_confidence_update > state.threat_confidence
        && sensor_integrity < MANIPULATION_INTEGRITY
    {
        prob *= MANIPULATION_FACTOR;
    }
    let estimated_threat_prob = clamp_between(prob, MIN_THREAT_PROB, MAX_THREAT_PROB);

    let mut decision_history = Vec::with_capacity(state.decision_history.len() + 1);
    decision_history.extend_from_slice(&state.decision_history);
    decision_history.push(decision);

    GovernanceState {
        time_remaining,
        escalation_level,
        staff_available: state.staff_available,
        threat_confidence: info.ai_confidence_update,
        cyber_detected: state.cyber_detected,
        sensor_integrity,
        forensic_status,
        secondary_data,
        estimated_threat_prob,
        arg_strengths: state.arg_strengths.adjusted(profile.argument_effects),
        stage: state.stage + 1,
        decision_history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_info(state: &GovernanceState) -> ExogenousInfo {
        ExogenousInfo {
            ai_confidence_update: state.threat_confidence,
            secondary_signal: None,
            forensic_result: None,
            sensor_integrity_change: 0.0,
            time_consumed: 0.0,
        }
    }

    #[test]
    fn confirmed_attack_scales_belief() {
        let state = GovernanceState::default_scenario();
        let info = ExogenousInfo {
            forensic_result: Some(ForensicStatus::ConfirmedAttack),
            time_consumed: 300.0,
            ..quiet_info(&state)
        };
        let next = transition(&state, Decision::Investigate, &info);
        assert!((next.estimated_threat_prob - 0.45 * 0.15).abs() < 1e-12);
        assert_eq!(next.forensic_status, ForensicStatus::ConfirmedAttack);
    }

    #[test]
    fn contradicting_secondary_scales_belief() {
        let state = GovernanceState {
            stage: 1,
            ..GovernanceState::default_scenario()
        };
        let info = ExogenousInfo {
            secondary_signal: Some(SecondaryData::Contradicts),
            ..quiet_info(&state)
        };
        let next = transition(&state, Decision::Maintain, &info);
        assert!((next.estimated_threat_prob - 0.45 * 0.4).abs() < 1e-12);
    }

    #[test]
    fn corroborating_secondary_is_capped() {
        let state = GovernanceState {
            estimated_threat_prob: 0.9,
            ..GovernanceState::default_scenario()
        };
        let info = ExogenousInfo {
            secondary_signal: Some(SecondaryData::Corroborates),
            ..quiet_info(&state)
        };
        let next = transition(&state, Decision::Maintain, &info);
        assert_eq!(next.estimated_threat_prob, 0.99);
    }

    #[test]
    fn rising_confidence_on_weak_sensors_is_suspect() {
        let state = GovernanceState {
            sensor_integrity: 0.55,
            ..GovernanceState::default_scenario()
        };
        let info = ExogenousInfo {
            ai_confidence_update: 0.9,
            sensor_integrity_change: -0.1,
            ..quiet_info(&state)
        };
        let next = transition(&state, Decision::Escalate, &info);
        assert!((next.estimated_threat_prob - 0.45 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn belief_never_drops_below_floor() {
        let state = GovernanceState {
            estimated_threat_prob: 0.02,
            secondary_data: SecondaryData::Contradicts,
            ..GovernanceState::default_scenario()
        };
        let info = ExogenousInfo {
            forensic_result: Some(ForensicStatus::ConfirmedAttack),
            ..quiet_info(&state)
        };
        let next = transition(&state, Decision::Isolate, &info);
        assert_eq!(next.estimated_threat_prob, 0.01);
    }

    #[test]
    fn investigation_opens_forensics() {
        let state = GovernanceState::default_scenario();
        let next = transition(&state, Decision::Investigate, &quiet_info(&state));
        assert_eq!(next.forensic_status, ForensicStatus::InProgress);

        let next = transition(&state, Decision::Isolate, &quiet_info(&state));
        assert_eq!(next.forensic_status, ForensicStatus::None);
    }

    #[test]
    fn escalation_levels_follow_decision() {
        let state = GovernanceState::default_scenario();
        let info = quiet_info(&state);
        assert_eq!(transition(&state, Decision::Escalate, &info).escalation_level, 2);
        assert_eq!(transition(&state, Decision::Parallel, &info).escalation_level, 1);
        assert_eq!(transition(&state, Decision::EscalateBoth, &info).escalation_level, 3);
        assert_eq!(transition(&state, Decision::Downgrade, &info).escalation_level, 0);

        let high = GovernanceState {
            escalation_level: 2,
            ..GovernanceState::default_scenario()
        };
        assert_eq!(transition(&high, Decision::Escalate, &info).escalation_level, 3);
        assert_eq!(transition(&high, Decision::PetrovCall, &info).escalation_level, 0);
        assert_eq!(transition(&high, Decision::Downgrade, &info).escalation_level, 1);
    }

    #[test]
    fn time_never_goes_negative() {
        let state = GovernanceState {
            time_remaining: 100.0,
            ..GovernanceState::default_scenario()
        };
        let info = ExogenousInfo {
            time_consumed: 300.0,
            ..quiet_info(&state)
        };
        let next = transition(&state, Decision::Investigate, &info);
        assert_eq!(next.time_remaining, 0.0);
    }

    #[test]
    fn input_state_is_not_mutated() {
        let state = GovernanceState::default_scenario();
        let before = state.clone();
        let next = transition(&state, Decision::Escalate, &quiet_info(&state));
        assert_eq!(state, before);
        assert_eq!(next.stage, 1);
        assert_eq!(next.decision_history, vec![Decision::Escalate]);
        assert!(state.decision_history.is_empty());
    }

    #[test]
    fn unchanged_arguments_are_shared() {
        let state = GovernanceState::default_scenario();
        let next = transition(&state, Decision::Maintain, &quiet_info(&state));
        assert!(next.arg_strengths.shares_storage_with(&state.arg_strengths));

        let next = transition(&state, Decision::Escalate, &quiet_info(&state));
        assert!(!next.arg_strengths.shares_storage_with(&state.arg_strengths));
        assert!((next.arg_strengths.get("duty_to_report").unwrap() - 0.8).abs() < 1e-12);
        assert!((next.arg_strengths.get("proportionality").unwrap() - 0.3).abs() < 1e-12);
    }
}
