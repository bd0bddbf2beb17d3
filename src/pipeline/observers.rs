//! Observer implementations for simulations and searches
//!
//! Observers allow composable data collection without coupling the episode
//! loop to specific output formats.

use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::{search::SearchRecord, simulation::EpisodeResult};
use crate::{
    Error, Result,
    analysis::ScoreSummary,
    model::{ContributionVector, Decision, GovernanceState},
    ports::Observer,
};

/// Observation of a single stage of an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub stage: usize,
    pub decision: Decision,
    pub time_remaining: f64,
    pub estimated_threat_prob: f64,
    pub contribution: ContributionVector,
    pub scalar: f64,
}

/// Complete observation of an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub seed: u64,
    pub policy: String,
    pub steps: Vec<StepObservation>,
    pub total_score: f64,
    pub dimension_scores: ContributionVector,
}

fn progress_style(template: &str) -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template(template)
        .map_err(|e| Error::ProgressBarTemplate {
            message: e.to_string(),
        })?
        .progress_chars("=>-"))
}

enum ProgressMode {
    Combinations,
    Episodes(u64),
}

/// Progress bar observer - shows search or simulation progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    mode: ProgressMode,
    best: Option<f64>,
}

impl ProgressObserver {
    /// Track combinations of a parameter search
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            mode: ProgressMode::Combinations,
            best: None,
        }
    }

    /// Track a known number of episodes instead of search combinations
    pub fn for_episodes(total: usize) -> Self {
        Self {
            progress_bar: None,
            mode: ProgressMode::Episodes(total as u64),
            best: None,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_episode_start(&mut self, _seed: u64) -> Result<()> {
        if let ProgressMode::Episodes(total) = self.mode
            && self.progress_bar.is_none()
        {
            let pb = ProgressBar::new(total);
            pb.set_style(progress_style(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes",
            )?);
            self.progress_bar = Some(pb);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _result: &EpisodeResult) -> Result<()> {
        if let (ProgressMode::Episodes(total), Some(pb)) = (&self.mode, &self.progress_bar) {
            pb.inc(1);
            if pb.position() >= *total {
                pb.finish();
            }
        }
        Ok(())
    }

    fn on_search_start(&mut self, total_combinations: usize) -> Result<()> {
        let pb = ProgressBar::new(total_combinations as u64);
        pb.set_style(progress_style(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} combinations (best: {msg})",
        )?);
        self.progress_bar = Some(pb);
        self.best = None;
        Ok(())
    }

    fn on_combination_end(&mut self, index: usize, record: &SearchRecord) -> Result<()> {
        if self
            .best
            .is_none_or(|best| record.average_score > best)
        {
            self.best = Some(record.average_score);
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(index as u64 + 1);
            if let Some(best) = self.best {
                pb.set_message(format!("{best:.3}"));
            }
        }
        Ok(())
    }

    fn on_search_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish();
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Metrics {
    episodes: usize,
    decisions_by_stage: Vec<BTreeMap<Decision, usize>>,
    scores: Vec<f64>,
}

/// Metrics observer - tracks decision frequencies and scores
///
/// Clones share the same counters, so one clone can be handed to a pipeline
/// while another is kept to read the summary.
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    inner: Arc<Mutex<Metrics>>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    fn metrics(&self) -> MutexGuard<'_, Metrics> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of completed episodes
    pub fn episodes(&self) -> usize {
        self.metrics().episodes
    }

    /// How often `decision` was taken at `stage`
    pub fn decision_count(&self, stage: usize, decision: Decision) -> usize {
        self.metrics()
            .decisions_by_stage
            .get(stage)
            .and_then(|counts| counts.get(&decision))
            .copied()
            .unwrap_or(0)
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let metrics = self.metrics();
        MetricsSummary {
            episodes: metrics.episodes,
            decisions_by_stage: metrics.decisions_by_stage.clone(),
            scores: ScoreSummary::from_scores(&metrics.scores),
        }
    }
}

/// Summary of collected metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    /// Decision counts, indexed by stage
    pub decisions_by_stage: Vec<BTreeMap<Decision, usize>>,
    pub scores: Option<ScoreSummary>,
}

impl Observer for MetricsObserver {
    fn on_step(
        &mut self,
        stage: usize,
        _state: &GovernanceState,
        decision: Decision,
        _contribution: &ContributionVector,
    ) -> Result<()> {
        let mut metrics = self.metrics();
        if metrics.decisions_by_stage.len() <= stage {
            metrics.decisions_by_stage.resize_with(stage + 1, BTreeMap::new);
        }
        *metrics.decisions_by_stage[stage].entry(decision).or_insert(0) += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, result: &EpisodeResult) -> Result<()> {
        let mut metrics = self.metrics();
        metrics.episodes += 1;
        metrics.scores.push(result.total_score);
        Ok(())
    }
}

/// JSONL observer - exports one episode per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer appending to `path`, which is created if
    /// missing
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::Io {
                operation: format!("open {} for appending", path.display()),
                source,
            })?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _seed: u64) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(
        &mut self,
        stage: usize,
        state: &GovernanceState,
        decision: Decision,
        contribution: &ContributionVector,
    ) -> Result<()> {
        self.current_steps.push(StepObservation {
            stage,
            decision,
            time_remaining: state.time_remaining,
            estimated_threat_prob: state.estimated_threat_prob,
            contribution: *contribution,
            scalar: contribution.weighted_sum(),
        });
        Ok(())
    }

    fn on_episode_end(&mut self, result: &EpisodeResult) -> Result<()> {
        let observation = Observation {
            seed: result.seed,
            policy: result.policy_name.clone(),
            steps: std::mem::take(&mut self.current_steps),
            total_score: result.total_score,
            dimension_scores: result.dimension_scores,
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
