use std::io::{self, Write};

use serde::Serialize;

use crate::assign::{CommitteeAssignment, Placement, Rank};

#[derive(Serialize)]
struct RankCount {
    rank: Rank,
    people: usize,
}

#[derive(Serialize)]
struct CommitteeFill<'a> {
    name: &'a str,
    capacity: usize,
    members: Vec<&'a str>,
}

#[derive(Serialize)]
struct Report<'a> {
    placements: &'a [Placement],
    total_cost: i64,
    ranks: Vec<RankCount>,
    committees: Vec<CommitteeFill<'a>>,
}

impl<'a> Report<'a> {
    fn new(assignment: &'a CommitteeAssignment) -> Self {
        Report {
            placements: assignment.placements(),
            total_cost: assignment.total_cost(),
            ranks: assignment
                .rank_histogram()
                .into_iter()
                .map(|(rank, people)| RankCount { rank, people })
                .collect(),
            committees: assignment
                .committees()
                .iter()
                .map(|c| CommitteeFill {
                    name: &c.name,
                    capacity: c.capacity,
                    members: assignment.members_of(&c.name),
                })
                .collect(),
        }
    }
}

/// `name : committee` per person, then a summary block.
pub fn write_text<W: Write>(w: &mut W, assignment: &CommitteeAssignment) -> io::Result<()> {
    for p in assignment.placements() {
        writeln!(w, "{} : {}", p.person, p.committee.as_deref().unwrap_or("-"))?;
    }

    let report = Report::new(assignment);
    writeln!(w)?;
    writeln!(w, "Total dissatisfaction: {}", report.total_cost)?;
    for RankCount { rank, people } in &report.ranks {
        writeln!(w, "  {rank}: {people}")?;
    }

    writeln!(w)?;
    for c in &report.committees {
        writeln!(w, "{} ({}/{})", c.name, c.members.len(), c.capacity)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(w: &mut W, assignment: &CommitteeAssignment) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, &Report::new(assignment))?;
    writeln!(w)
}
