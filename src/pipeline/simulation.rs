//! Episode simulator: (S_0, x_0, W_1, S_1, x_1, W_2, ..., S_T)

use std::path::Path;

use log::debug;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    model::{
        ContributionVector, Decision, GovernanceState, contribution, generate_exogenous, transition,
    },
    ports::{Observer, Policy},
};

/// Number of stages in the reference scenario.
pub const DEFAULT_STAGES: usize = 3;

/// Nominal per-stage maximum of any dimension, used to normalise totals.
const NOMINAL_STAGE_MAX: f64 = 28.0;

/// Complete record of one simulated episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Snapshots S_0..S_T (one more than the number of decisions)
    pub states: Vec<GovernanceState>,
    pub decisions: Vec<Decision>,
    /// Per-stage contribution vectors
    pub contributions: Vec<ContributionVector>,
    /// Sum of the scalar contributions
    pub total_score: f64,
    /// Per-dimension totals on a 0-100 scale
    pub dimension_scores: ContributionVector,
    pub policy_name: String,
    pub seed: u64,
}

impl EpisodeResult {
    /// Number of decisions taken.
    pub fn num_stages(&self) -> usize {
        self.decisions.len()
    }

    /// Terminal state S_T.
    pub fn final_state(&self) -> Option<&GovernanceState> {
        self.states.last()
    }

    /// Scalar contribution of each stage.
    pub fn scalar_contributions(&self) -> impl Iterator<Item = f64> + '_ {
        self.contributions.iter().map(ContributionVector::weighted_sum)
    }

    /// Save the episode to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load an episode from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Decisions per episode
    pub num_stages: usize,

    /// Starting state; the default scenario when absent
    pub initial_state: Option<GovernanceState>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_stages: DEFAULT_STAGES,
            initial_state: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_stages(mut self, num_stages: usize) -> Self {
        self.num_stages = num_stages;
        self
    }

    pub fn with_initial_state(mut self, state: GovernanceState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Reject configurations no episode can run under.
    pub fn validate(&self) -> Result<()> {
        if self.num_stages == 0 {
            return Err(Error::InvalidConfiguration {
                message: "num_stages must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn initial_state(&self) -> GovernanceState {
        self.initial_state
            .clone()
            .unwrap_or_else(GovernanceState::default_scenario)
    }
}

/// Runs episodes under a fixed configuration and reports them to observers
pub struct Simulator {
    config: SimulationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulator {
    /// Create a new simulator
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulator
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one episode of `policy` from the configured initial state.
    pub fn run<P: Policy + ?Sized>(&mut self, policy: &P, seed: u64) -> Result<EpisodeResult> {
        self.config.validate()?;
        let initial = self.config.initial_state();
        run_episode(
            policy,
            &initial,
            seed,
            self.config.num_stages,
            &mut self.observers,
        )
    }

    /// Run one episode per seed, in order.
    pub fn run_many<P: Policy + ?Sized>(
        &mut self,
        policy: &P,
        seeds: impl IntoIterator<Item = u64>,
    ) -> Result<Vec<EpisodeResult>> {
        seeds.into_iter().map(|seed| self.run(policy, seed)).collect()
    }
}

/// Simulate one episode.
///
/// Uses the default scenario when `initial_state` is `None`. The episode is
/// fully determined by `seed`.
///
/// # Errors
///
/// - [`Error::InvalidConfiguration`] if `num_stages` is zero
/// - [`Error::NoFeasibleActions`] if the episode runs past the last stage
///   with actions (more than [`DEFAULT_STAGES`] stages with time left)
///
/// # Examples
///
/// ```
/// use sdam::{pipeline::simulate, policies::ThresholdPolicy};
///
/// let episode = simulate(&ThresholdPolicy::default(), None, 42, 3).unwrap();
/// assert_eq!(episode.states.len(), 4);
/// assert!(episode.total_score > 0.0);
/// ```
pub fn simulate<P: Policy + ?Sized>(
    policy: &P,
    initial_state: Option<&GovernanceState>,
    seed: u64,
    num_stages: usize,
) -> Result<EpisodeResult> {
    let mut config = SimulationConfig::default().with_stages(num_stages);
    config.validate()?;
    if let Some(state) = initial_state {
        config = config.with_initial_state(state.clone());
    }
    run_episode(policy, &config.initial_state(), seed, num_stages, &mut [])
}

pub(crate) fn run_episode<P: Policy + ?Sized>(
    policy: &P,
    initial: &GovernanceState,
    seed: u64,
    num_stages: usize,
    observers: &mut [Box<dyn Observer>],
) -> Result<EpisodeResult> {
    let mut rng = StdRng::seed_from_u64(seed);

    for observer in observers.iter_mut() {
        observer.on_episode_start(seed)?;
    }

    let mut states = Vec::with_capacity(num_stages + 1);
    let mut decisions = Vec::with_capacity(num_stages);
    let mut contributions = Vec::with_capacity(num_stages);
    let mut totals = ContributionVector::default();
    let mut total_score = 0.0;

    let mut state = initial.clone();
    states.push(state.clone());

    for stage in 0..num_stages {
        let decision = policy.decide(&state)?;
        let reward = contribution(&state, decision);
        let scalar = reward.weighted_sum();

        debug!(
            "seed {seed} stage {stage}: {} chose {decision} (scalar {scalar:.3}, p={:.3})",
            policy.name(),
            state.estimated_threat_prob
        );
        for observer in observers.iter_mut() {
            observer.on_step(stage, &state, decision, &reward)?;
        }

        total_score += scalar;
        totals += reward;
        decisions.push(decision);
        contributions.push(reward);

        let info = generate_exogenous(&state, decision, &mut rng);
        state = transition(&state, decision, &info);
        states.push(state.clone());
    }

    let max_possible = num_stages as f64 * NOMINAL_STAGE_MAX;
    let dimension_scores = totals.map(|total| (total / max_possible * 100.0).min(100.0));

    let result = EpisodeResult {
        states,
        decisions,
        contributions,
        total_score,
        dimension_scores,
        policy_name: policy.name().to_string(),
        seed,
    };

    for observer in observers.iter_mut() {
        observer.on_episode_end(&result)?;
    }

    Ok(result)
}
