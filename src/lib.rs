//! Places people on committee seats by ranked preference.
//!
//! Each committee with capacity `k` becomes `k` slots, every person gets a
//! row of costs (their rank for the slot's committee, or a penalty when they
//! did not list it), and a minimum-cost perfect matching over that matrix
//! gives the placement with the smallest total rank.

pub mod assign;
pub mod committee;
pub mod config;
pub mod cost;
pub mod error;
pub mod hungarian;
pub mod person;
pub mod report;
pub mod roster;

pub use assign::{assign, CommitteeAssignment, Placement, Rank};
pub use committee::{Committee, SlotLayout};
pub use config::{CommitteeTable, ConfigError};
pub use cost::{CostConfig, CostMatrix, CostMatrixBuilder, MAX_PENALTY};
pub use error::AssignError;
pub use hungarian::{cost_limit, hungarian, hungarian_rows, Allocation, Allocations, SolveError};
pub use person::Person;
pub use roster::{read_roster, read_roster_path, RosterError, RosterFormat};
