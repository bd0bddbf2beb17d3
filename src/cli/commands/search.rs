//! Search command - Grid search over policy parameters

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::{
        config::{FamilyKind, GridFile, grid_from_params, load_initial_state},
        output::{print_kv, print_section, print_subsection},
    },
    export,
    pipeline::{
        ParameterGrid, PolicyFamily, PolicySearch, ProgressObserver, ScoringFamily,
        SearchConfig, SearchOutcome, ThresholdFamily,
    },
};

/// Results listed in the report
const TOP_RESULTS: usize = 5;

#[derive(Parser, Debug)]
#[command(about = "Search policy parameters on common random numbers")]
pub struct SearchArgs {
    /// Grid description (JSON); replaces --policy and --param
    #[arg(long, conflicts_with_all = ["policy", "params"])]
    pub grid: Option<PathBuf>,

    /// Policy family
    #[arg(long, short = 'p', value_enum)]
    pub policy: Option<FamilyKind>,

    /// Candidate values (name=v1,v2,...), repeatable
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Episodes per combination (default: the grid file's, else 100)
    #[arg(long, short = 'n')]
    pub simulations: Option<usize>,

    /// Initial state overrides (JSON)
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Export every combination to CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Save the outcome as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

pub fn execute(args: SearchArgs) -> Result<()> {
    let (family, file_simulations, grid) = match &args.grid {
        Some(path) => {
            let file = GridFile::load(path)?;
            (file.family, file.simulations, file.parameters)
        }
        None => match args.policy {
            Some(kind) => (kind, None, grid_from_params(&args.params)?),
            None => bail!("either --grid or --policy is required"),
        },
    };

    let mut config = SearchConfig::default()
        .with_initial_state(load_initial_state(args.scenario.as_deref())?);
    if let Some(n) = args.simulations.or(file_simulations) {
        config = config.with_simulations(n);
    }

    println!(
        "Searching {} combinations x {} episodes",
        grid.len(),
        config.n_simulations
    );

    let mut search = PolicySearch::new(config);
    if args.progress {
        search = search.with_observer(Box::new(ProgressObserver::new()));
    }

    let outcome = match family {
        FamilyKind::Threshold => run(&mut search, &ThresholdFamily::default(), &grid)?,
        FamilyKind::Scoring => run(&mut search, &ScoringFamily::default(), &grid)?,
    };

    report(&outcome);

    if let Some(path) = &args.csv {
        let rows = export::write_search_results(path, &outcome)?;
        println!("\nExported {rows} combinations to: {}", path.display());
    }
    if let Some(path) = &args.output {
        outcome.save(path)?;
        println!("Outcome saved to: {}", path.display());
    }

    Ok(())
}

fn run<F: PolicyFamily>(
    search: &mut PolicySearch,
    family: &F,
    grid: &ParameterGrid,
) -> Result<SearchOutcome> {
    Ok(search.search(family, grid)?)
}

fn report(outcome: &SearchOutcome) {
    print_section(&format!("Search results: {}", outcome.family));
    print_kv("Combinations", &outcome.results.len().to_string());
    print_kv("Episodes each", &outcome.n_simulations.to_string());

    if let Some(best) = &outcome.best {
        print_kv("Best parameters", &best.parameters.to_string());
        print_kv("Best average", &format!("{:.3}", best.average_score));
    }

    let mut ranked: Vec<_> = outcome.results.iter().collect();
    ranked.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    print_subsection(&format!("Top {}", TOP_RESULTS.min(ranked.len())));
    for record in ranked.iter().take(TOP_RESULTS) {
        println!("  {:8.3}  {}", record.average_score, record.parameters);
    }
}
