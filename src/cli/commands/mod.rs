//! Subcommand implementations

pub mod arena;
pub mod compare;
pub mod search;
pub mod simulate;

use anyhow::{Result, bail};

use crate::{
    cli::config::{FamilyKind, grid_from_params},
    pipeline::{PolicyFamily, ScoringFamily, ThresholdFamily},
    ports::Policy,
};

/// Build one policy of `kind` from `name=value` overrides.
pub fn build_policy(kind: FamilyKind, params: &[String]) -> Result<Box<dyn Policy>> {
    let grid = grid_from_params(params)?;
    if grid.len() != 1 {
        bail!("expected exactly one value per parameter, got {} combinations", grid.len());
    }
    let parameters = grid.combinations().next().unwrap_or_default();

    let policy: Box<dyn Policy> = match kind {
        FamilyKind::Threshold => {
            let family = ThresholdFamily::default();
            family.check_grid(&grid)?;
            Box::new(family.instantiate(&parameters)?)
        }
        FamilyKind::Scoring => {
            let family = ScoringFamily::default();
            family.check_grid(&grid)?;
            let policy = family.instantiate(&parameters)?;
            policy.weights().validate()?;
            Box::new(policy)
        }
    };
    Ok(policy)
}
