//! Shared configuration types for CLI commands

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufReader,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    model::{ArgumentStrengths, Decision, ForensicStatus, GovernanceState, SecondaryData},
    pipeline::ParameterGrid,
};

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open {}", path.display()),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Initial state overrides; absent fields keep the reference scenario's
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFile {
    pub time_remaining: Option<f64>,
    pub escalation_level: Option<u8>,
    pub staff_available: Option<u32>,
    pub threat_confidence: Option<f64>,
    pub cyber_detected: Option<bool>,
    pub sensor_integrity: Option<f64>,
    pub forensic_status: Option<ForensicStatus>,
    pub secondary_data: Option<SecondaryData>,
    pub estimated_threat_prob: Option<f64>,
    /// Replaces the whole argument mapping when present
    pub arg_strengths: Option<BTreeMap<String, f64>>,
    pub stage: Option<usize>,
    pub decision_history: Option<Vec<Decision>>,
}

impl ScenarioFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Apply the overrides to [`GovernanceState::default_scenario`].
    pub fn into_state(self) -> GovernanceState {
        let mut state = GovernanceState::default_scenario();
        if let Some(v) = self.time_remaining {
            state.time_remaining = v;
        }
        if let Some(v) = self.escalation_level {
            state.escalation_level = v;
        }
        if let Some(v) = self.staff_available {
            state.staff_available = v;
        }
        if let Some(v) = self.threat_confidence {
            state.threat_confidence = v;
        }
        if let Some(v) = self.cyber_detected {
            state.cyber_detected = v;
        }
        if let Some(v) = self.sensor_integrity {
            state.sensor_integrity = v;
        }
        if let Some(v) = self.forensic_status {
            state.forensic_status = v;
        }
        if let Some(v) = self.secondary_data {
            state.secondary_data = v;
        }
        if let Some(v) = self.estimated_threat_prob {
            state.estimated_threat_prob = v;
        }
        if let Some(v) = self.arg_strengths {
            state.arg_strengths = ArgumentStrengths::from_pairs(v);
        }
        if let Some(v) = self.stage {
            state.stage = v;
        }
        if let Some(v) = self.decision_history {
            state.decision_history = v;
        }
        state
    }
}

/// Load the initial state from an optional scenario file.
pub fn load_initial_state(path: Option<&Path>) -> Result<GovernanceState> {
    match path {
        Some(path) => Ok(ScenarioFile::load(path)?.into_state()),
        None => Ok(GovernanceState::default_scenario()),
    }
}

/// Policy families selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    Threshold,
    Scoring,
}

/// Parameter search description read from JSON
///
/// ```json
/// {"family": "scoring", "simulations": 50,
///  "parameters": [{"name": "w_evidence", "values": [0.2, 0.4]}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFile {
    pub family: FamilyKind,
    #[serde(default)]
    pub simulations: Option<usize>,
    #[serde(default)]
    pub parameters: ParameterGrid,
}

impl GridFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let grid: Self = read_json(path.as_ref())?;
        grid.validate()?;
        Ok(grid)
    }

    /// Each parameter may name at most one axis.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        match self.parameters.names().find(|name| !seen.insert(*name)) {
            Some(name) => Err(Error::InvalidConfiguration {
                message: format!("parameter '{name}' is listed more than once in the grid"),
            }),
            None => Ok(()),
        }
    }
}

/// Parse `name=value` or `name=v1,v2,...` into a name and its values.
///
/// # Examples
///
/// ```
/// use sdam::cli::config::parse_param;
///
/// let (name, values) = parse_param("w_speed=0.1,0.3").unwrap();
/// assert_eq!(name, "w_speed");
/// assert_eq!(values, vec![0.1, 0.3]);
/// ```
pub fn parse_param(input: &str) -> Result<(String, Vec<f64>)> {
    let invalid = |reason: &str| Error::ParseParameter {
        input: input.to_string(),
        reason: reason.to_string(),
    };
    let (name, values) = input
        .split_once('=')
        .ok_or_else(|| invalid("expected name=value"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("missing parameter name"));
    }
    let values = values
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| invalid(&format!("'{}': {e}", v.trim())))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok((name.to_string(), values))
}

/// Build a grid from repeated `--param` arguments; later axes with the same
/// name replace earlier ones.
pub fn grid_from_params(params: &[String]) -> Result<ParameterGrid> {
    let mut grid = ParameterGrid::new();
    for param in params {
        let (name, values) = parse_param(param)?;
        grid.insert(name, values);
    }
    Ok(grid)
}
