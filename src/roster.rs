//! Reading a preference form export into [`Person`] records.
//!
//! The default layout matches the signup form the tool was built around:
//! a header row, then `timestamp, email, name, id, year, choice 1..6`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::cost::DEFAULT_NUM_CHOICES;
use crate::person::Person;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("cannot read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: missing column {column}")]
    MissingColumn { line: u64, column: usize },
    #[error("line {line}: empty name")]
    EmptyName { line: u64 },
    #[error("line {line}: blank choice in column {column} before a later answer")]
    GapInChoices { line: u64, column: usize },
}

/// Column positions (0-based) of the fields a roster row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterFormat {
    pub name_column: usize,
    pub first_choice_column: usize,
    pub num_choices: usize,
    pub has_header: bool,
}

impl Default for RosterFormat {
    fn default() -> Self {
        RosterFormat {
            name_column: 2,
            first_choice_column: 5,
            num_choices: DEFAULT_NUM_CHOICES,
            has_header: true,
        }
    }
}

pub fn read_roster<R: Read>(reader: R, format: &RosterFormat) -> Result<Vec<Person>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(format.has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut people = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let name = record
            .get(format.name_column)
            .ok_or(RosterError::MissingColumn {
                line,
                column: format.name_column,
            })?;
        if name.is_empty() {
            return Err(RosterError::EmptyName { line });
        }

        // exporters may drop blank trailing answers, but the first choice
        // column has to be there
        if format.num_choices > 0 && record.len() <= format.first_choice_column {
            return Err(RosterError::MissingColumn {
                line,
                column: format.first_choice_column,
            });
        }

        // a choice's rank is its column offset, so only trailing blanks may
        // be dropped
        let last_choice = format.first_choice_column + format.num_choices;
        let cells: Vec<&str> = (format.first_choice_column..last_choice)
            .map_while(|c| record.get(c))
            .collect();
        let answered = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        if let Some(gap) = cells[..answered].iter().position(|c| c.is_empty()) {
            return Err(RosterError::GapInChoices {
                line,
                column: format.first_choice_column + gap,
            });
        }
        let choices = cells[..answered]
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        people.push(Person {
            name: name.to_owned(),
            choices,
        });
    }

    tracing::debug!(people = people.len(), "read roster");
    Ok(people)
}

pub fn read_roster_path(
    path: impl AsRef<Path>,
    format: &RosterFormat,
) -> Result<Vec<Person>, RosterError> {
    let file = File::open(path)?;
    read_roster(file, format)
}
