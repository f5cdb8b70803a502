use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::committee::Committee;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read committee table: {0}")]
    Io(#[from] std::io::Error),
    #[error("committee table parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Committee names and seat counts, in slot order.
///
/// Stored as an array of tables so the file order is the slot order:
///
/// ```toml
/// [[committee]]
/// name = "Social"
/// capacity = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeTable {
    #[serde(default)]
    pub committee: Vec<Committee>,
}

impl Default for CommitteeTable {
    fn default() -> Self {
        let committee = [
            ("Social", 2),
            ("Brotherhood", 2),
            ("Philanthropy", 2),
            ("Community Service", 2),
            ("Outreach", 2),
            ("Recruitment", 2),
            ("Phi Ed", 2),
            ("Greek Sing", 2),
            ("Housing", 2),
            ("Scholarship", 2),
            ("Risk", 1),
            ("Buggy", 1),
            ("Bylaws", 1),
        ]
        .into_iter()
        .map(|(name, capacity)| Committee::new(name, capacity))
        .collect();

        CommitteeTable { committee }
    }
}

impl CommitteeTable {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn committees(&self) -> &[Committee] {
        &self.committee
    }

    pub fn total_capacity(&self) -> usize {
        self.committee.iter().map(|c| c.capacity).sum()
    }
}
