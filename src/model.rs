//! The governance decision process
//!
//! The five elements of a sequential decision problem, each in its own module:
//! - [`state`]: everything known at a decision point
//! - [`decision`]: the closed action set and its per-stage feasibility
//! - [`exogenous`]: random information arriving after a decision
//! - [`transition`]: the deterministic state update
//! - [`contribution`]: the five-dimensional reward

pub mod contribution;
pub mod decision;
pub mod exogenous;
pub mod state;
pub mod transition;

pub use contribution::{
    ContributionVector, DIMENSION_WEIGHTS, Dimension, contribution, scalar_contribution,
};
pub use decision::{
    ActionProfile, ArgumentEffect, Decision, EscalationEffect, ProportionalityClass,
    STAGE_ACTIONS, feasible_actions, stage_actions,
};
pub use exogenous::{ExogenousInfo, generate_exogenous};
pub use state::{
    ArgumentStrengths, ForensicStatus, GovernanceState, STATE_VECTOR_LEN, SecondaryData,
};
pub use transition::transition;
