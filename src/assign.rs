use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::committee::{Committee, SlotLayout};
use crate::cost::{CostConfig, CostMatrixBuilder};
use crate::error::AssignError;
use crate::hungarian::hungarian;
use crate::person::Person;

/// Where a placement sits in the person's own list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "rank")]
pub enum Rank {
    /// 0-based position in the preference list.
    Choice(usize),
    /// Placed on a committee the person did not list.
    Unranked,
    /// No slot left; only happens when people outnumber slots.
    Unassigned,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Choice(n) => write!(f, "choice #{}", n + 1),
            Rank::Unranked => write!(f, "not among choices"),
            Rank::Unassigned => write!(f, "unassigned"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub person: String,
    pub committee: Option<String>,
    pub slot: Option<usize>,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitteeAssignment {
    placements: Vec<Placement>,
    committees: Vec<Committee>,
    total_cost: i64,
}

impl CommitteeAssignment {
    /// One placement per person, in roster order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn committees(&self) -> &[Committee] {
        &self.committees
    }

    /// Sum of matrix costs over placed people, unranked placements counted
    /// at the penalty.
    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    pub fn rank_histogram(&self) -> BTreeMap<Rank, usize> {
        let mut histogram = BTreeMap::new();
        for p in &self.placements {
            *histogram.entry(p.rank).or_insert(0) += 1;
        }
        histogram
    }

    pub fn members_of(&self, committee: &str) -> Vec<&str> {
        self.placements
            .iter()
            .filter(|p| p.committee.as_deref() == Some(committee))
            .map(|p| p.person.as_str())
            .collect()
    }

    /// Committees with seats nobody took, and how many.
    pub fn unfilled_slots(&self) -> Vec<(&str, usize)> {
        self.committees
            .iter()
            .filter_map(|c| {
                let open = c.capacity - self.members_of(&c.name).len();
                (open > 0).then_some((c.name.as_str(), open))
            })
            .collect()
    }
}

/// Places every person on one committee slot so the summed preference
/// ranks are as small as possible.
pub fn assign(
    people: &[Person],
    committees: &[Committee],
    config: CostConfig,
) -> Result<CommitteeAssignment, AssignError> {
    let layout = SlotLayout::new(committees)?;
    let slots = layout.total_slots();
    if people.is_empty() || slots == 0 {
        return Err(AssignError::Infeasible {
            people: people.len(),
            slots,
        });
    }
    if people.len() != slots {
        tracing::warn!(
            people = people.len(),
            slots,
            "roster size differs from committee capacity"
        );
    }

    let matrix = CostMatrixBuilder::new(config).build(people, &layout)?;
    let allocations = hungarian(matrix.costs())?;

    let mut total_cost = 0;
    let placements = people
        .iter()
        .enumerate()
        .map(|(i, person)| {
            let Some(slot) = allocations.col_for(i) else {
                tracing::warn!(person = %person.name, "left without a slot");
                return Placement {
                    person: person.name.clone(),
                    committee: None,
                    slot: None,
                    rank: Rank::Unassigned,
                };
            };
            total_cost += matrix.costs()[(i, slot)];

            let committee = layout.committee_of(slot).map(|c| c.name.clone());
            let rank = match matrix.rank(i, slot) {
                Some(r) => Rank::Choice(r),
                None => {
                    tracing::warn!(
                        person = %person.name,
                        committee = committee.as_deref().unwrap_or_default(),
                        "placed outside listed choices"
                    );
                    Rank::Unranked
                }
            };

            Placement {
                person: person.name.clone(),
                committee,
                slot: Some(slot),
                rank,
            }
        })
        .collect();

    tracing::info!(
        people = people.len(),
        committees = committees.len(),
        total_cost,
        "assignment complete"
    );

    Ok(CommitteeAssignment {
        placements,
        committees: committees.to_vec(),
        total_cost,
    })
}
