use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::AssignError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub name: String,
    pub capacity: usize,
}

impl Committee {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Committee {
            name: name.into(),
            capacity,
        }
    }
}

/// Contiguous slot ranges for an ordered list of committees.
///
/// Committee `k` owns slots `[ends[k-1], ends[k])`, so the slot order is
/// exactly the order the committees were given in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLayout {
    committees: Vec<Committee>,
    ends: Vec<usize>,
    by_name: HashMap<String, usize>,
}

impl SlotLayout {
    pub fn new(committees: &[Committee]) -> Result<Self, AssignError> {
        let mut ends = Vec::with_capacity(committees.len());
        let mut by_name = HashMap::with_capacity(committees.len());
        let mut next = 0;

        for (index, committee) in committees.iter().enumerate() {
            if committee.capacity == 0 {
                return Err(AssignError::ZeroCapacity {
                    committee: committee.name.clone(),
                });
            }
            if by_name.insert(committee.name.clone(), index).is_some() {
                return Err(AssignError::DuplicateCommittee {
                    committee: committee.name.clone(),
                });
            }
            next += committee.capacity;
            ends.push(next);
        }

        Ok(SlotLayout {
            committees: committees.to_vec(),
            ends,
            by_name,
        })
    }

    pub fn total_slots(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn committees(&self) -> &[Committee] {
        &self.committees
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn range_of_index(&self, index: usize) -> Range<usize> {
        let start = if index == 0 { 0 } else { self.ends[index - 1] };
        start..self.ends[index]
    }

    pub fn range_of(&self, name: &str) -> Option<Range<usize>> {
        self.index_of(name).map(|i| self.range_of_index(i))
    }

    /// Index of the committee owning `slot`, found by binary search over
    /// the cumulative range ends.
    pub fn committee_index_of(&self, slot: usize) -> Option<usize> {
        if slot >= self.total_slots() {
            return None;
        }
        Some(self.ends.partition_point(|&end| end <= slot))
    }

    pub fn committee_of(&self, slot: usize) -> Option<&Committee> {
        self.committee_index_of(slot).map(|i| &self.committees[i])
    }
}
