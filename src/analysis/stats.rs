//! Summary statistics of score samples

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Location and spread of a set of scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; zero for a single score
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ScoreSummary {
    /// Summarise `scores`, or `None` when there are none.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let std_dev = if scores.len() > 1 {
            Statistics::std_dev(scores.iter())
        } else {
            0.0
        };
        Some(Self {
            count: scores.len(),
            mean: Statistics::mean(scores.iter()),
            std_dev,
            min: Statistics::min(scores.iter()),
            max: Statistics::max(scores.iter()),
        })
    }
}
