//! Simulate command - Run one episode and report every stage

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::build_policy,
        config::{FamilyKind, load_initial_state},
        output::{print_dimensions, print_kv, print_section, print_subsection},
    },
    export,
    pipeline::{DEFAULT_STAGES, JsonlObserver, SimulationConfig, Simulator},
};

#[derive(Parser, Debug)]
#[command(about = "Simulate one episode under a policy")]
pub struct SimulateArgs {
    /// Policy family
    #[arg(long, short = 'p', value_enum, default_value = "threshold")]
    pub policy: FamilyKind,

    /// Parameter override (name=value), repeatable
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of decision stages
    #[arg(long, default_value_t = DEFAULT_STAGES)]
    pub stages: usize,

    /// Initial state overrides (JSON)
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Save the episode as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Export per-stage contributions to CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Append a JSON-lines trace of the episode
    #[arg(long)]
    pub trace: Option<PathBuf>,
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let policy = build_policy(args.policy, &args.params)?;
    let initial = load_initial_state(args.scenario.as_deref())?;

    let config = SimulationConfig::default()
        .with_stages(args.stages)
        .with_initial_state(initial);
    let mut simulator = Simulator::new(config);
    if let Some(path) = &args.trace {
        simulator = simulator.with_observer(Box::new(JsonlObserver::new(path)?));
    }
    let episode = simulator.run(&policy, args.seed)?;

    print_section(&format!("Episode: {} (seed {})", episode.policy_name, episode.seed));
    for (stage, (decision, state)) in episode.decisions.iter().zip(&episode.states).enumerate() {
        let scalar = episode.contributions[stage].weighted_sum();
        println!(
            "  stage {}: {:14} p={:.3} time={:>5.0}s  contribution {:.3}",
            stage + 1,
            decision.as_str(),
            state.estimated_threat_prob,
            state.time_remaining,
            scalar
        );
    }

    print_subsection("Dimension scores (0-100)");
    print_dimensions(&episode.dimension_scores);
    println!();
    print_kv("Total score", &format!("{:.3}", episode.total_score));
    if let Some(last) = episode.final_state() {
        print_kv("Final threat p", &format!("{:.3}", last.estimated_threat_prob));
        print_kv("Time remaining", &format!("{:.0}s", last.time_remaining));
    }

    if let Some(path) = &args.output {
        episode.save(path)?;
        println!("\nEpisode saved to: {}", path.display());
    }
    if let Some(path) = &args.csv {
        let rows = export::write_episode(path, &episode)?;
        println!("Exported {rows} stages to: {}", path.display());
    }

    Ok(())
}
