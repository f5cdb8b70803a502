use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::committee::SlotLayout;
use crate::error::AssignError;
use crate::person::Person;

pub const DEFAULT_NUM_CHOICES: usize = 6;

/// Ceiling for the unranked penalty, and so for `num_choices`. Rosters of up
/// to about a million people stay inside the solver's cost limit at this size.
pub const MAX_PENALTY: i64 = 1 << 40;

/// Knobs for turning preference lists into edge weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConfig {
    pub num_choices: usize,
    /// Cost of a committee the person did not list. Defaults to `num_choices`.
    pub unranked_penalty: Option<i64>,
}

impl Default for CostConfig {
    fn default() -> Self {
        CostConfig::with_choices(DEFAULT_NUM_CHOICES)
    }
}

impl CostConfig {
    pub fn with_choices(num_choices: usize) -> Self {
        CostConfig {
            num_choices,
            unranked_penalty: None,
        }
    }

    /// The configured penalty, or `num_choices` (saturating) when unset.
    pub fn penalty(&self) -> i64 {
        self.unranked_penalty
            .unwrap_or_else(|| i64::try_from(self.num_choices).unwrap_or(i64::MAX))
    }

    pub fn validate(&self) -> Result<(), AssignError> {
        let choices = i64::try_from(self.num_choices)
            .ok()
            .filter(|&n| n <= MAX_PENALTY)
            .ok_or(AssignError::ChoicesOutOfRange {
                num_choices: self.num_choices,
                max: MAX_PENALTY,
            })?;
        let worst = choices - 1;

        let penalty = self.penalty();
        if penalty <= worst || penalty > MAX_PENALTY {
            return Err(AssignError::InvalidPenalty {
                penalty,
                worst,
                max: MAX_PENALTY,
            });
        }
        Ok(())
    }
}

/// People by committee slots; entry `(i, s)` is the rank person `i` gave
/// the committee owning slot `s`, or the unranked penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    costs: DMatrix<i64>,
    penalty: i64,
}

impl CostMatrix {
    pub fn costs(&self) -> &DMatrix<i64> {
        &self.costs
    }

    pub fn penalty(&self) -> i64 {
        self.penalty
    }

    pub fn get(&self, person: usize, slot: usize) -> Option<i64> {
        self.costs.get((person, slot)).copied()
    }

    /// The preference rank behind a cell, `None` when the cell holds the penalty.
    pub fn rank(&self, person: usize, slot: usize) -> Option<usize> {
        self.get(person, slot)
            .filter(|&c| c != self.penalty)
            .map(|c| c as usize)
    }
}

pub struct CostMatrixBuilder {
    config: CostConfig,
}

impl CostMatrixBuilder {
    pub fn new(config: CostConfig) -> Self {
        CostMatrixBuilder { config }
    }

    pub fn build(&self, people: &[Person], layout: &SlotLayout) -> Result<CostMatrix, AssignError> {
        self.config.validate()?;
        let penalty = self.config.penalty();
        let mut costs = DMatrix::from_element(people.len(), layout.total_slots(), penalty);

        for (i, person) in people.iter().enumerate() {
            if person.choices.len() > self.config.num_choices {
                return Err(AssignError::TooManyChoices {
                    person: person.name.clone(),
                    found: person.choices.len(),
                    max: self.config.num_choices,
                });
            }

            // walk from the last choice up so a repeated name keeps its best rank
            for (rank, committee) in person.choices.iter().enumerate().rev() {
                let range = layout
                    .range_of(committee)
                    .ok_or_else(|| AssignError::UnknownCommittee {
                        person: person.name.clone(),
                        committee: committee.clone(),
                    })?;
                costs.view_mut((i, range.start), (1, range.len())).fill(rank as i64);
            }
        }

        tracing::debug!(
            people = people.len(),
            slots = layout.total_slots(),
            penalty,
            "built cost matrix"
        );
        Ok(CostMatrix { costs, penalty })
    }
}
