//! Export functionality for analysis and reporting
//!
//! JSON export lives on the result types themselves
//! ([`EpisodeResult::save`](crate::pipeline::EpisodeResult::save),
//! [`SearchOutcome::save`](crate::pipeline::SearchOutcome::save)). This module
//! adds flat CSV tables for spreadsheets and plotting.

pub mod csv;

pub use self::csv::{write_episode, write_search_results};
