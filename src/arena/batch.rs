//! Summaries over a directory of Arena exports

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::export::{ArenaEpisode, load_export};
use crate::{Error, Result, analysis::ScoreSummary};

/// File name prefix of Arena exports.
pub const EXPORT_PREFIX: &str = "agora-arena-";

/// Stages reported in the most common path.
const PATH_STAGES: usize = 3;

/// How many playthroughs chose `decision`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionCount {
    pub decision: String,
    pub count: usize,
}

/// Choice counts at one stage, in order of first appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFrequency {
    /// 1-based stage number
    pub stage: usize,
    pub counts: Vec<DecisionCount>,
}

impl StageFrequency {
    fn new(stage: usize) -> Self {
        Self {
            stage,
            counts: Vec::new(),
        }
    }

    fn record(&mut self, decision: &str) {
        match self.counts.iter_mut().find(|c| c.decision == decision) {
            Some(entry) => entry.count += 1,
            None => self.counts.push(DecisionCount {
                decision: decision.to_string(),
                count: 1,
            }),
        }
    }

    /// Times `decision` was chosen at this stage.
    pub fn count(&self, decision: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.decision == decision)
            .map_or(0, |c| c.count)
    }

    /// Most frequent choice; the first one seen wins ties.
    pub fn most_common(&self) -> Option<&str> {
        self.counts
            .iter()
            .fold(None, |best: Option<&DecisionCount>, c| match best {
                Some(b) if b.count >= c.count => Some(b),
                _ => Some(c),
            })
            .map(|c| c.decision.as_str())
    }
}

/// Aggregate view of many playthroughs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub total_playthroughs: usize,
    pub decision_frequency_by_stage: Vec<StageFrequency>,
    pub score_stats: ScoreSummary,
    /// Most common choice at stages 1 to 3, `"none"` where nobody played
    pub most_common_path: Vec<String>,
}

impl BatchAnalysis {
    /// Summarise already loaded playthroughs, or `None` for an empty batch.
    pub fn from_episodes(episodes: &[ArenaEpisode]) -> Option<Self> {
        let scores: Vec<f64> = episodes.iter().map(|e| e.total_score).collect();
        let score_stats = ScoreSummary::from_scores(&scores)?;

        let longest = episodes
            .iter()
            .map(|e| e.decisions.len())
            .max()
            .unwrap_or(0)
            .max(PATH_STAGES);
        let mut frequencies: Vec<StageFrequency> = (1..=longest).map(StageFrequency::new).collect();
        for episode in episodes {
            for (frequency, decision) in frequencies.iter_mut().zip(&episode.decisions) {
                frequency.record(decision);
            }
        }

        let most_common_path = frequencies[..PATH_STAGES]
            .iter()
            .map(|f| f.most_common().unwrap_or("none").to_string())
            .collect();

        Some(Self {
            total_playthroughs: episodes.len(),
            decision_frequency_by_stage: frequencies,
            score_stats,
            most_common_path,
        })
    }

    /// Frequencies at 1-based `stage`.
    pub fn stage(&self, stage: usize) -> Option<&StageFrequency> {
        self.decision_frequency_by_stage
            .iter()
            .find(|f| f.stage == stage)
    }
}

fn export_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        operation: format!("read directory {}", dir.display()),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_export = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(EXPORT_PREFIX) && name.ends_with(".json"));
        if is_export && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load every `agora-arena-*.json` file in `dir` and summarise them.
///
/// Files that cannot be read or parsed are skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::NoValidExports`] when no export could be loaded, or an
/// I/O error if `dir` cannot be listed.
pub fn batch_analyze<P: AsRef<Path>>(dir: P) -> Result<BatchAnalysis> {
    let dir = dir.as_ref();
    let mut episodes = Vec::new();
    for path in export_paths(dir)? {
        match load_export(&path) {
            Ok(episode) => episodes.push(episode),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }
    info!("loaded {} playthroughs from {}", episodes.len(), dir.display());

    BatchAnalysis::from_episodes(&episodes).ok_or_else(|| Error::NoValidExports {
        directory: dir.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn export(choices: &[&str], total: f64) -> String {
        let decisions: Vec<_> = choices
            .iter()
            .enumerate()
            .map(|(i, c)| serde_json::json!({"stage": i + 1, "choice": c, "time_remaining": 600}))
            .collect();
        serde_json::json!({
            "scenario_id": "petrov-1983",
            "decisions": decisions,
            "scores": {"reversibility": 80, "composite": total},
            "total_score": total,
        })
        .to_string()
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = batch_analyze(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NoValidExports { .. }));
    }

    #[test]
    fn valid_export_loads() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "agora-arena-1.json", &export(&["d1_investigate", "d2_maintain"], 71.0));

        let episode = load_export(dir.path().join("agora-arena-1.json")).unwrap();
        assert_eq!(episode.scenario_id, "petrov-1983");
        assert_eq!(episode.decisions, vec!["investigate", "maintain"]);
        assert_eq!(episode.total_score, 71.0);
        assert_eq!(episode.scores["composite"], 71.0);
        assert_eq!(episode.actions().unwrap().len(), 2);
    }

    #[test]
    fn batch_counts_and_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "agora-arena-a.json",
            &export(&["d1_investigate", "d2_maintain", "d3_allied"], 60.0),
        );
        write(
            dir.path(),
            "agora-arena-b.json",
            &export(&["d1_parallel", "d2_petrov", "d3_allied"], 80.0),
        );
        write(
            dir.path(),
            "agora-arena-c.json",
            &export(&["d1_parallel", "d2_maintain"], 70.0),
        );
        write(dir.path(), "agora-arena-d.json", "not json");
        write(dir.path(), "notes.json", &export(&["d1_escalate"], 0.0));

        let analysis = batch_analyze(dir.path()).unwrap();
        assert_eq!(analysis.total_playthroughs, 3);
        assert_eq!(analysis.score_stats.mean, 70.0);
        assert_eq!(analysis.score_stats.min, 60.0);
        assert_eq!(analysis.score_stats.max, 80.0);

        let first = analysis.stage(1).unwrap();
        assert_eq!(first.count("parallel"), 2);
        assert_eq!(first.count("escalate"), 0);
        assert_eq!(analysis.stage(3).unwrap().count("call_allied"), 2);
        assert_eq!(
            analysis.most_common_path,
            vec!["parallel", "maintain", "call_allied"]
        );
    }

    #[test]
    fn ties_go_to_first_seen_and_empty_stages_report_none() {
        let episodes: Vec<ArenaEpisode> = [
            r#"{"decisions": [{"choice": "d1_isolate"}]}"#,
            r#"{"decisions": [{"choice": "d1_escalate"}]}"#,
        ]
        .iter()
        .map(|body| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("agora-arena-x.json");
            fs::write(&path, body).unwrap();
            load_export(&path).unwrap()
        })
        .collect();

        let analysis = BatchAnalysis::from_episodes(&episodes).unwrap();
        assert_eq!(analysis.most_common_path, vec!["isolate", "none", "none"]);
        assert_eq!(analysis.decision_frequency_by_stage.len(), 3);
    }
}
