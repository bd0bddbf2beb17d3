//! Comparison framework for evaluating policies on common random numbers
//!
//! Every policy faces the same seeds from the same initial state, so score
//! differences come from the decisions rather than from the draws.

use std::ops::Range;

use log::info;
use serde::{Deserialize, Serialize};

use super::simulation::{DEFAULT_STAGES, SimulationConfig, run_episode};
use crate::{
    Error, Result,
    analysis::ScoreSummary,
    model::GovernanceState,
    ports::{Observer, Policy},
};

/// Comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Episodes per policy
    pub episodes: usize,

    /// Seeds are `base_seed..base_seed + episodes`
    pub base_seed: u64,

    pub num_stages: usize,

    pub initial_state: Option<GovernanceState>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            base_seed: 0,
            num_stages: DEFAULT_STAGES,
            initial_state: None,
        }
    }
}

impl ComparisonConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_base_seed(mut self, base_seed: u64) -> Self {
        self.base_seed = base_seed;
        self
    }

    pub fn with_initial_state(mut self, state: GovernanceState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "episodes must be at least 1".to_string(),
            });
        }
        if self.base_seed.checked_add(self.episodes as u64).is_none() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "base seed {} leaves no room for {} episodes",
                    self.base_seed, self.episodes
                ),
            });
        }
        SimulationConfig {
            num_stages: self.num_stages,
            initial_state: None,
        }
        .validate()
    }

    /// Seeds every policy is run on, in order.
    ///
    /// Truncated at `u64::MAX`; [`validate`](Self::validate) rejects such
    /// configurations.
    pub fn seeds(&self) -> Range<u64> {
        self.base_seed..self.base_seed.saturating_add(self.episodes as u64)
    }
}

/// Per-seed scores of one policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyScores {
    pub name: String,
    /// Total score per seed, in seed order
    pub scores: Vec<f64>,
    pub summary: ScoreSummary,
}

/// Results of a comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub seeds: Vec<u64>,
    pub policies: Vec<PolicyScores>,
}

impl ComparisonResult {
    /// Position of the policy called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.policies.iter().position(|p| p.name == name)
    }

    /// Number of seeds on which policy `a` scored strictly higher than `b`.
    pub fn wins(&self, a: usize, b: usize) -> usize {
        match (self.policies.get(a), self.policies.get(b)) {
            (Some(a), Some(b)) => a
                .scores
                .iter()
                .zip(&b.scores)
                .filter(|(x, y)| x > y)
                .count(),
            _ => 0,
        }
    }

    /// Policy with the highest mean score; the first listed wins ties.
    pub fn leader(&self) -> Option<&PolicyScores> {
        self.policies.iter().fold(None, |best: Option<&PolicyScores>, p| match best {
            Some(b) if b.summary.mean >= p.summary.mean => Some(b),
            _ => Some(p),
        })
    }
}

/// Runs several policies on the same seeds
pub struct PolicyComparison {
    config: ComparisonConfig,
    policies: Vec<Box<dyn Policy>>,
    observers: Vec<Box<dyn Observer>>,
}

impl PolicyComparison {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            config,
            policies: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Add a policy to compare
    pub fn with_policy(mut self, policy: Box<dyn Policy>) -> Self {
        self.policies.push(policy);
        self
    }

    /// Add an observer notified of every episode
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run every policy on every seed.
    pub fn run(&mut self) -> Result<ComparisonResult> {
        self.config.validate()?;
        if self.policies.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "no policies to compare".to_string(),
            });
        }

        let initial = self
            .config
            .initial_state
            .clone()
            .unwrap_or_else(GovernanceState::default_scenario);
        let seeds: Vec<u64> = self.config.seeds().collect();

        let mut policies = Vec::with_capacity(self.policies.len());
        for policy in &self.policies {
            let mut scores = Vec::with_capacity(seeds.len());
            for &seed in &seeds {
                let episode = run_episode(
                    &**policy,
                    &initial,
                    seed,
                    self.config.num_stages,
                    &mut self.observers,
                )?;
                scores.push(episode.total_score);
            }
            let summary = ScoreSummary::from_scores(&scores).ok_or_else(|| {
                Error::InvalidConfiguration {
                    message: "comparison produced no scores".to_string(),
                }
            })?;
            info!(
                "{}: mean {:.3} (sd {:.3}, min {:.3}, max {:.3}) over {} episodes",
                policy.name(),
                summary.mean,
                summary.std_dev,
                summary.min,
                summary.max,
                summary.count
            );
            policies.push(PolicyScores {
                name: policy.name().to_string(),
                scores,
                summary,
            });
        }

        Ok(ComparisonResult { seeds, policies })
    }
}
