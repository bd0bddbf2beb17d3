//! CLI infrastructure for the decision model toolkit
//!
//! This module provides the command-line interface for simulating episodes,
//! searching policy parameters, comparing policies, and summarising Arena
//! playthroughs.

pub mod commands;
pub mod config;
pub mod output;
