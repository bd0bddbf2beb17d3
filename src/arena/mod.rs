//! Decision Arena playthrough records
//!
//! The Arena game exports each human playthrough as a JSON file. This module
//! normalises those records into the model's decision identifiers and
//! summarises a directory of them.

pub mod batch;
pub mod export;

pub use batch::{BatchAnalysis, DecisionCount, EXPORT_PREFIX, StageFrequency, batch_analyze};
pub use export::{ArenaEpisode, load_export, normalize_choice};
