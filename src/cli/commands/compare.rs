//! Compare command - Threshold and weighted-scoring policies side-by-side

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        config::load_initial_state,
        output::{format_percent, print_score_summary, print_section, print_subsection},
    },
    pipeline::{ComparisonConfig, MetricsObserver, PolicyComparison},
    policies::{ThresholdPolicy, WeightedScoringPolicy},
};

#[derive(Parser, Debug)]
#[command(about = "Compare the default policies on common random numbers")]
pub struct CompareArgs {
    /// Episodes per policy
    #[arg(long, short = 'e', default_value_t = 200)]
    pub episodes: usize,

    /// First seed; episodes use consecutive seeds
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Initial state overrides (JSON)
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Save per-seed scores as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let config = ComparisonConfig::default()
        .with_episodes(args.episodes)
        .with_base_seed(args.seed)
        .with_initial_state(load_initial_state(args.scenario.as_deref())?);

    let metrics = MetricsObserver::new();
    let result = PolicyComparison::new(config)
        .with_policy(Box::new(ThresholdPolicy::default()))
        .with_policy(Box::new(WeightedScoringPolicy::default()))
        .with_observer(Box::new(metrics.clone()))
        .run()?;

    print_section("Policy comparison");
    for policy in &result.policies {
        print_subsection(&policy.name);
        print_score_summary(&policy.summary);
    }

    print_subsection("Head-to-head");
    let episodes = result.seeds.len();
    for a in 0..result.policies.len() {
        for b in (a + 1)..result.policies.len() {
            let (wins_a, wins_b) = (result.wins(a, b), result.wins(b, a));
            println!(
                "  {} vs {} | {}-{}-{} ({} wins for {})",
                result.policies[a].name,
                result.policies[b].name,
                wins_a,
                episodes - wins_a - wins_b,
                wins_b,
                format_percent(wins_a, episodes),
                result.policies[a].name
            );
        }
    }
    if let Some(leader) = result.leader() {
        println!("\nHighest mean: {} ({:.3})", leader.name, leader.summary.mean);
    }

    print_subsection("Decisions by stage (both policies)");
    let summary = metrics.summary();
    for (stage, counts) in summary.decisions_by_stage.iter().enumerate() {
        let total: usize = counts.values().sum();
        let line: Vec<String> = counts
            .iter()
            .map(|(decision, count)| format!("{decision} {}", format_percent(*count, total)))
            .collect();
        println!("  stage {}: {}", stage + 1, line.join(", "));
    }

    if let Some(path) = &args.output {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &result)?;
        println!("\nResults saved to: {}", path.display());
    }

    Ok(())
}
