//! Sequential decision model for governance under uncertainty
//!
//! This crate provides:
//! - The governance state, decisions, exogenous information and transition
//!   function of the reference AI-alert scenario
//! - Accountability scoring of decisions on five dimensions
//! - Threshold and weighted-scoring policies
//! - Episode simulation, policy grid search and policy comparison on common
//!   random numbers
//! - Loading and summarising Decision Arena playthroughs

pub mod analysis;
pub mod arena;
pub mod cli;
pub mod error;
pub mod export;
pub mod identifiers;
pub mod model;
pub mod pipeline;
pub mod policies;
pub mod ports;
pub mod utils;

pub use error::{Error, Result};
pub use model::{Decision, GovernanceState};
pub use pipeline::{EpisodeResult, simulate};
pub use ports::Policy;
