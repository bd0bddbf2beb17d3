//! CSV export of episodes and search results

use std::{fs::File, io::Write, path::Path};

use crate::{
    Error, Result,
    model::Dimension,
    pipeline::{EpisodeResult, SearchOutcome},
};

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })
}

/// Write one row per evaluated combination: the parameter columns in grid
/// order, then `average_score`.
///
/// Returns the number of data rows written.
pub fn write_search_results<P: AsRef<Path>>(path: P, outcome: &SearchOutcome) -> Result<usize> {
    let file = create(path.as_ref())?;
    write_search_rows(file, outcome)?;
    Ok(outcome.results.len())
}

fn write_search_rows<W: Write>(writer: W, outcome: &SearchOutcome) -> Result<()> {
    let mut writer = ::csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = outcome
        .results
        .first()
        .map(|record| record.parameters.iter().map(|(name, _)| name).collect())
        .unwrap_or_default();
    header.push("average_score");
    writer.write_record(&header)?;

    for record in &outcome.results {
        let row = record
            .parameters
            .iter()
            .map(|(_, value)| value.to_string())
            .chain(std::iter::once(record.average_score.to_string()));
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one row per stage: stage, decision, the five dimensions and the
/// scalar contribution.
///
/// Returns the number of data rows written.
pub fn write_episode<P: AsRef<Path>>(path: P, episode: &EpisodeResult) -> Result<usize> {
    let file = create(path.as_ref())?;
    write_episode_rows(file, episode)?;
    Ok(episode.decisions.len())
}

fn write_episode_rows<W: Write>(writer: W, episode: &EpisodeResult) -> Result<()> {
    let mut writer = ::csv::Writer::from_writer(writer);

    let mut header = vec!["stage".to_string(), "decision".to_string()];
    header.extend(Dimension::ALL.iter().map(ToString::to_string));
    header.push("scalar".to_string());
    writer.write_record(&header)?;

    for (stage, (decision, contribution)) in episode
        .decisions
        .iter()
        .zip(&episode.contributions)
        .enumerate()
    {
        let mut row = vec![stage.to_string(), decision.to_string()];
        row.extend(contribution.iter().map(|(_, value)| value.to_string()));
        row.push(contribution.weighted_sum().to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
