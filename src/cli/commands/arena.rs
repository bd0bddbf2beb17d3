//! Arena command - Summarise human playthroughs

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    arena::{ArenaEpisode, BatchAnalysis, batch_analyze, load_export},
    cli::output::{format_percent, print_kv, print_score_summary, print_section, print_subsection},
};

#[derive(Parser, Debug)]
#[command(about = "Analyse Decision Arena exports")]
pub struct ArenaArgs {
    /// Directory of agora-arena-*.json exports
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub dir: Option<PathBuf>,

    /// A single export instead of a directory
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Print the analysis as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ArenaArgs) -> Result<()> {
    if let Some(path) = &args.file {
        let episode = load_export(path)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&episode)?);
        } else {
            print_episode(&episode);
        }
        return Ok(());
    }

    if let Some(dir) = &args.dir {
        let analysis = batch_analyze(dir)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            print_analysis(&analysis);
        }
    }
    Ok(())
}

fn print_episode(episode: &ArenaEpisode) {
    print_section(&format!("Playthrough: {}", episode.scenario_id));
    if !episode.played_at.is_empty() {
        print_kv("Played at", &episode.played_at);
    }
    print_kv("Total score", &format!("{:.1}", episode.total_score));
    print_kv("Path", &episode.decisions.join(" -> "));
    if let Err(e) = episode.actions() {
        println!("  note: {e}");
    }
    if !episode.scores.is_empty() {
        print_subsection("Scores");
        for (name, value) in &episode.scores {
            print_kv(name, &value.to_string());
        }
    }
}

fn print_analysis(analysis: &BatchAnalysis) {
    print_section(&format!("Arena batch: {} playthroughs", analysis.total_playthroughs));
    print_score_summary(&analysis.score_stats);

    for frequency in &analysis.decision_frequency_by_stage {
        print_subsection(&format!("Stage {}", frequency.stage));
        let total: usize = frequency.counts.iter().map(|c| c.count).sum();
        for entry in &frequency.counts {
            println!(
                "  {:16} {:>4} ({})",
                entry.decision,
                entry.count,
                format_percent(entry.count, total)
            );
        }
    }

    println!("\nMost common path: {}", analysis.most_common_path.join(" -> "));
}
