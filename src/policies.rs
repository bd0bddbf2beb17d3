//! Analytic decision policies
//!
//! - [`ThresholdPolicy`]: a policy function approximation, rule-based on
//!   tunable thresholds
//! - [`WeightedScoringPolicy`]: a cost function approximation, the argmax of
//!   a weighted feature score

pub mod threshold;
pub mod weighted;

pub use threshold::{ThresholdParams, ThresholdPolicy};
pub use weighted::{ScoringWeights, WeightedScoringPolicy};

use crate::{
    Error, Result,
    model::{Decision, GovernanceState, feasible_actions},
};

/// Feasible actions for `state`, failing when there are none.
pub(crate) fn require_feasible(state: &GovernanceState) -> Result<&'static [Decision]> {
    let actions = feasible_actions(state);
    if actions.is_empty() {
        return Err(Error::NoFeasibleActions { stage: state.stage });
    }
    Ok(actions)
}
