//! Simulation, search and comparison pipelines
//!
//! This module provides composable pipelines for:
//! - Simulating single episodes of a policy
//! - Searching a policy family's parameter grid
//! - Comparing policies on common seeds
//! - Recording observations along the way

pub mod comparison;
pub mod observers;
pub mod search;
pub mod simulation;

pub use comparison::{ComparisonConfig, ComparisonResult, PolicyComparison, PolicyScores};
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver,
    StepObservation,
};
pub use search::{
    GridAxis, ParameterGrid, Parameters, PolicyFamily, PolicySearch, ScoringFamily, SearchConfig,
    SearchOutcome, SearchRecord, ThresholdFamily,
};
pub use simulation::{DEFAULT_STAGES, EpisodeResult, SimulationConfig, Simulator, simulate};

pub use crate::ports::{Observer, Policy};
