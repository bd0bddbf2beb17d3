//! Policy parameter search: max_θ F^π(θ) by grid enumeration
//!
//! F^π(θ) is estimated as the mean total score over a fixed set of seeds, so
//! every combination faces the same sample paths of exogenous information.

use std::{fmt, path::Path};

use log::info;
use serde::{Deserialize, Serialize, Serializer};

use super::simulation::{DEFAULT_STAGES, SimulationConfig, run_episode};
use crate::{
    Error, Result,
    model::GovernanceState,
    policies::{ScoringWeights, ThresholdParams, ThresholdPolicy, WeightedScoringPolicy},
    ports::{Observer, Policy},
};

/// Candidate values for one named parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub name: String,
    pub values: Vec<f64>,
}

/// Ordered mapping from parameter name to candidate values.
///
/// Enumeration order is the axis order: the first axis varies slowest and
/// the last fastest, and candidates keep their listed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterGrid {
    axes: Vec<GridAxis>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis, or replace the candidates of an existing one in place.
    pub fn with_axis(mut self, name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: impl Into<Vec<f64>>) {
        let name = name.into();
        let values = values.into();
        match self.axes.iter_mut().find(|axis| axis.name == name) {
            Some(axis) => axis.values = values,
            None => self.axes.push(GridAxis { name, values }),
        }
    }

    pub fn axes(&self) -> &[GridAxis] {
        &self.axes
    }

    /// Parameter names in axis order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|axis| axis.name.as_str())
    }

    /// Number of combinations. An empty grid has exactly one (all defaults);
    /// a grid with an empty axis has none.
    pub fn len(&self) -> usize {
        self.axes.iter().map(|axis| axis.values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate the cartesian product in odometer order.
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            grid: self,
            indices: vec![0; self.axes.len()],
            done: self.is_empty(),
        }
    }
}

/// Iterator over the combinations of a [`ParameterGrid`].
pub struct Combinations<'a> {
    grid: &'a ParameterGrid,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Combinations<'_> {
    type Item = Parameters;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = Parameters(
            self.grid
                .axes
                .iter()
                .zip(&self.indices)
                .map(|(axis, &i)| (axis.name.clone(), axis.values[i]))
                .collect(),
        );

        let mut position = self.indices.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.grid.axes[position].values.len() {
                break;
            }
            self.indices[position] = 0;
        }
        Some(current)
    }
}

/// One assignment of values to parameter names, in grid order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(Vec<(String, f64)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(defaults)");
        }
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// A parameterised family of policies the search can instantiate.
pub trait PolicyFamily {
    type Policy: Policy;

    /// Family label used in errors and reports.
    fn name(&self) -> &str;

    /// Parameter names the family understands.
    fn parameter_names(&self) -> &'static [&'static str];

    /// Build the policy for one combination. Parameters not present keep the
    /// family's base values.
    fn instantiate(&self, params: &Parameters) -> Result<Self::Policy>;

    /// Fail on the first grid axis the family does not understand.
    fn check_grid(&self, grid: &ParameterGrid) -> Result<()> {
        match grid
            .names()
            .find(|name| !self.parameter_names().contains(name))
        {
            Some(name) => Err(self.unknown_parameter(name)),
            None => Ok(()),
        }
    }

    fn unknown_parameter(&self, name: &str) -> Error {
        Error::UnknownParameter {
            name: name.to_string(),
            family: self.name().to_string(),
            expected: self.parameter_names().join(", "),
        }
    }
}

/// [`ThresholdPolicy`] over `confidence_threshold`, `integrity_threshold`
/// and `time_urgency`.
#[derive(Debug, Clone, Default)]
pub struct ThresholdFamily {
    pub base: ThresholdParams,
}

impl PolicyFamily for ThresholdFamily {
    type Policy = ThresholdPolicy;

    fn name(&self) -> &str {
        "threshold"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["confidence_threshold", "integrity_threshold", "time_urgency"]
    }

    fn instantiate(&self, params: &Parameters) -> Result<ThresholdPolicy> {
        let mut theta = self.base;
        for (name, value) in params.iter() {
            match name {
                "confidence_threshold" => theta.confidence_threshold = value,
                "integrity_threshold" => theta.integrity_threshold = value,
                "time_urgency" => theta.time_urgency = value,
                other => return Err(self.unknown_parameter(other)),
            }
        }
        Ok(ThresholdPolicy::new(theta))
    }
}

/// [`WeightedScoringPolicy`] over `w_evidence`, `w_caution`, `w_duty` and
/// `w_speed`. Weights are not validated, so degenerate corners of a grid
/// are still evaluated.
#[derive(Debug, Clone, Default)]
pub struct ScoringFamily {
    pub base: ScoringWeights,
}

impl PolicyFamily for ScoringFamily {
    type Policy = WeightedScoringPolicy;

    fn name(&self) -> &str {
        "scoring"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["w_evidence", "w_caution", "w_duty", "w_speed"]
    }

    fn instantiate(&self, params: &Parameters) -> Result<WeightedScoringPolicy> {
        let mut theta = self.base;
        for (name, value) in params.iter() {
            match name {
                "w_evidence" => theta.evidence = value,
                "w_caution" => theta.caution = value,
                "w_duty" => theta.duty = value,
                "w_speed" => theta.speed = value,
                other => return Err(self.unknown_parameter(other)),
            }
        }
        Ok(WeightedScoringPolicy::new(theta))
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Seeds `0..n_simulations` are run for every combination
    pub n_simulations: usize,

    /// Starting state; the default scenario when absent
    pub initial_state: Option<GovernanceState>,

    /// Decisions per episode
    pub num_stages: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            n_simulations: 100,
            initial_state: None,
            num_stages: DEFAULT_STAGES,
        }
    }
}

impl SearchConfig {
    pub fn with_simulations(mut self, n_simulations: usize) -> Self {
        self.n_simulations = n_simulations;
        self
    }

    pub fn with_initial_state(mut self, state: GovernanceState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn with_stages(mut self, num_stages: usize) -> Self {
        self.num_stages = num_stages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_simulations == 0 {
            return Err(Error::InvalidConfiguration {
                message: "n_simulations must be at least 1".to_string(),
            });
        }
        self.simulation().validate()
    }

    fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            num_stages: self.num_stages,
            initial_state: self.initial_state.clone(),
        }
    }
}

/// Mean score of one parameter combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecord {
    pub parameters: Parameters,
    pub average_score: f64,
}

/// All evaluated combinations, in enumeration order, and the best of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub family: String,
    pub n_simulations: usize,
    /// First combination with the strictly greatest average score
    pub best: Option<SearchRecord>,
    pub results: Vec<SearchRecord>,
}

impl SearchOutcome {
    /// `None` when the grid produced no combination.
    pub fn best_parameters(&self) -> Option<&Parameters> {
        self.best.as_ref().map(|record| &record.parameters)
    }

    /// `None` when the grid produced no combination.
    pub fn best_score(&self) -> Option<f64> {
        self.best.as_ref().map(|record| record.average_score)
    }

    /// Save the outcome to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Grid search over the parameters of a [`PolicyFamily`]
pub struct PolicySearch {
    config: SearchConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl PolicySearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the search
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Evaluate every combination of `grid` and keep the best.
    ///
    /// Combinations run sequentially in enumeration order; each runs seeds
    /// `0..n_simulations` in order.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] for zero simulations or stages
    /// - [`Error::UnknownParameter`] for a grid axis the family lacks
    /// - any error raised while simulating an episode
    pub fn search<F: PolicyFamily + ?Sized>(
        &mut self,
        family: &F,
        grid: &ParameterGrid,
    ) -> Result<SearchOutcome> {
        self.config.validate()?;
        family.check_grid(grid)?;

        let initial = self.config.simulation().initial_state();
        let n = self.config.n_simulations;
        let total_combinations = grid.len();

        for observer in &mut self.observers {
            observer.on_search_start(total_combinations)?;
        }

        let mut results = Vec::with_capacity(total_combinations);
        let mut best: Option<SearchRecord> = None;

        for (index, parameters) in grid.combinations().enumerate() {
            let policy = family.instantiate(&parameters)?;

            let mut total = 0.0;
            for seed in 0..n as u64 {
                let episode = run_episode(
                    &policy,
                    &initial,
                    seed,
                    self.config.num_stages,
                    &mut self.observers,
                )?;
                total += episode.total_score;
            }

            let record = SearchRecord {
                parameters,
                average_score: total / n as f64,
            };
            info!(
                "{} [{}/{}] {}: average {:.3}",
                family.name(),
                index + 1,
                total_combinations,
                record.parameters,
                record.average_score
            );

            for observer in &mut self.observers {
                observer.on_combination_end(index, &record)?;
            }

            if best
                .as_ref()
                .is_none_or(|current| record.average_score > current.average_score)
            {
                best = Some(record.clone());
            }
            results.push(record);
        }

        for observer in &mut self.observers {
            observer.on_search_end()?;
        }

        Ok(SearchOutcome {
            family: family.name().to_string(),
            n_simulations: n,
            best,
            results,
        })
    }
}
