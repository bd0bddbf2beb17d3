//! Analysis tools for episode and playthrough scores

pub mod stats;

pub use stats::ScoreSummary;
