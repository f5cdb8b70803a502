use thiserror::Error;

use crate::hungarian::SolveError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssignError {
    #[error("{person} lists unknown committee '{committee}'")]
    UnknownCommittee { person: String, committee: String },
    #[error("{person} lists {found} choices, at most {max} allowed")]
    TooManyChoices {
        person: String,
        found: usize,
        max: usize,
    },
    #[error("committee '{committee}' is listed more than once")]
    DuplicateCommittee { committee: String },
    #[error("committee '{committee}' has no slots")]
    ZeroCapacity { committee: String },
    #[error("unranked penalty {penalty} must exceed the worst rank {worst} and be at most {max}")]
    InvalidPenalty { penalty: i64, worst: i64, max: i64 },
    #[error("{num_choices} choices per person is more than the supported {max}")]
    ChoicesOutOfRange { num_choices: usize, max: i64 },
    #[error("nothing to assign: {people} people, {slots} slots")]
    Infeasible { people: usize, slots: usize },
    #[error(transparent)]
    Solve(#[from] SolveError),
}
