//! Domain identifier types for argument strengths in the belief state.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Identifier of an argument whose strength is tracked in the belief state.
///
/// The key set is open: transitions introduce new arguments (for example
/// `evidence_based` after an investigation) as decisions are made.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentId(String);

impl ArgumentId {
    /// # Examples
    ///
    /// ```
    /// use sdam::identifiers::ArgumentId;
    ///
    /// let arg = ArgumentId::new("evidence_based");
    /// assert_eq!(arg.as_str(), "evidence_based");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArgumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets argument maps be queried with plain `&str` keys.
impl Borrow<str> for ArgumentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArgumentId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ArgumentId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn maps_are_queried_by_str() {
        let map: BTreeMap<ArgumentId, f64> =
            [(ArgumentId::new("time_pressure"), 0.75)].into_iter().collect();
        assert_eq!(map.get("time_pressure"), Some(&0.75));
        assert_eq!(ArgumentId::from("a".to_string()).to_string(), "a");
    }

    #[test]
    fn serialises_as_plain_string() {
        let json = serde_json::to_string(&ArgumentId::new("clean_data")).unwrap();
        assert_eq!(json, "\"clean_data\"");
    }
}
