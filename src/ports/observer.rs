//! Observer port - abstraction for simulation observation and data collection
//!
//! Observers let the simulator and search report progress and collect data
//! without coupling either loop to an output format.

use crate::{
    Result,
    model::{ContributionVector, Decision, GovernanceState},
    pipeline::{EpisodeResult, SearchRecord},
};

/// Observer trait for monitoring simulations and parameter searches
///
/// Every hook has a no-op default, so implementations override only what
/// they need. Examples include:
/// - Progress bars over search combinations
/// - JSONL export of episodes
/// - Decision frequency and score metrics
///
/// # Event Sequence
///
/// For a single episode:
/// 1. `on_episode_start(seed)`
/// 2. `on_step(...)` once per stage, after the decision is scored and before
///    the transition
/// 3. `on_episode_end(result)`
///
/// A search wraps episodes:
/// 1. `on_search_start(total_combinations)`
/// 2. For each combination: the episode events for every seed, then
///    `on_combination_end(index, record)`
/// 3. `on_search_end()`
///
/// # Examples
///
/// ```no_run
/// use sdam::{pipeline::EpisodeResult, ports::Observer};
///
/// struct ScoreCollector {
///     scores: Vec<f64>,
/// }
///
/// impl Observer for ScoreCollector {
///     fn on_episode_end(&mut self, result: &EpisodeResult) -> sdam::Result<()> {
///         self.scores.push(result.total_score);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called before the first decision of an episode.
    fn on_episode_start(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Called for each stage of an episode.
    ///
    /// # Parameters
    ///
    /// * `stage` - Stage index (0-based)
    /// * `state` - State the decision was taken in
    /// * `decision` - Action chosen by the policy
    /// * `contribution` - Score of the action on every dimension
    fn on_step(
        &mut self,
        _stage: usize,
        _state: &GovernanceState,
        _decision: Decision,
        _contribution: &ContributionVector,
    ) -> Result<()> {
        Ok(())
    }

    /// Called with the finished episode.
    fn on_episode_end(&mut self, _result: &EpisodeResult) -> Result<()> {
        Ok(())
    }

    /// Called once before a parameter search enumerates its grid.
    fn on_search_start(&mut self, _total_combinations: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every seed of one parameter combination has been run.
    fn on_combination_end(&mut self, _index: usize, _record: &SearchRecord) -> Result<()> {
        Ok(())
    }

    /// Called once when the search completes. Use this to flush outputs.
    fn on_search_end(&mut self) -> Result<()> {
        Ok(())
    }
}
