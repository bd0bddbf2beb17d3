//! Loading a single Arena export

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, model::Decision};

/// Arena choice identifiers and the decisions they stand for.
const CHOICE_MAP: [(&str, &str); 10] = [
    ("d1_escalate", "escalate"),
    ("d1_investigate", "investigate"),
    ("d1_parallel", "parallel"),
    ("d1_isolate", "isolate"),
    ("d2_downgrade", "downgrade"),
    ("d2_maintain", "maintain"),
    ("d2_petrov", "petrov_call"),
    ("d3_stand_down", "stand_down"),
    ("d3_escalate_both", "escalate_both"),
    ("d3_allied", "call_allied"),
];

/// Translate an Arena choice identifier; unknown identifiers pass through.
///
/// # Examples
///
/// ```
/// use sdam::arena::normalize_choice;
///
/// assert_eq!(normalize_choice("d2_petrov"), "petrov_call");
/// assert_eq!(normalize_choice("investigate"), "investigate");
/// ```
pub fn normalize_choice(choice: &str) -> &str {
    CHOICE_MAP
        .iter()
        .find(|(arena, _)| *arena == choice)
        .map_or(choice, |(_, decision)| *decision)
}

#[derive(Deserialize)]
struct RawExport {
    #[serde(default = "unknown_scenario")]
    scenario_id: String,
    #[serde(default)]
    decisions: Vec<RawDecision>,
    #[serde(default)]
    scores: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    total_score: f64,
    #[serde(default)]
    played_at: String,
    #[serde(default)]
    arguments_final: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawDecision {
    choice: String,
}

fn unknown_scenario() -> String {
    "unknown".to_string()
}

/// One playthrough with choices translated to decision identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaEpisode {
    pub scenario_id: String,
    /// Normalised choice per stage, in play order
    pub decisions: Vec<String>,
    /// Per-dimension scores as reported by the game
    pub scores: BTreeMap<String, serde_json::Value>,
    pub total_score: f64,
    pub played_at: String,
    pub arguments_final: Vec<serde_json::Value>,
}

impl ArenaEpisode {
    /// Parse the choices into model decisions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDecision`] for the first choice that is not a
    /// model decision.
    pub fn actions(&self) -> Result<Vec<Decision>> {
        self.decisions.iter().map(|id| id.parse()).collect()
    }
}

impl From<RawExport> for ArenaEpisode {
    fn from(raw: RawExport) -> Self {
        Self {
            scenario_id: raw.scenario_id,
            decisions: raw
                .decisions
                .iter()
                .map(|d| normalize_choice(&d.choice).to_string())
                .collect(),
            scores: raw.scores,
            total_score: raw.total_score,
            played_at: raw.played_at,
            arguments_final: raw.arguments_final,
        }
    }
}

/// Load an Arena export, filling absent fields with defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a JSON object
/// whose decisions each carry a `choice`.
pub fn load_export<P: AsRef<Path>>(path: P) -> Result<ArenaEpisode> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open {}", path.display()),
        source,
    })?;
    let raw: RawExport = serde_json::from_reader(BufReader::new(file))?;
    Ok(raw.into())
}
