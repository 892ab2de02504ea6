//! Partitioning of riders into cooperating lines.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IntakeError;
use crate::rider::Rider;

/// Position within a line when the rider races alone.
pub const SOLO: usize = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub label: String,
    /// Members in racing order; the first is the lead.
    pub members: Vec<Rider>,
}
impl Line {
    pub fn new(label: impl Into<String>, members: Vec<Rider>) -> Self {
        Self {
            label: label.into(),
            members,
        }
    }

    /// Builds a line from free-form text, taking each digit in turn as a rider number. Any other
    /// character, a zero, or a repeat of a number already taken is skipped.
    pub fn parse(label: impl Into<String>, text: &str) -> Self {
        let mut members = vec![];
        for c in text.chars() {
            if let Some(rider) = digit_value(c).and_then(|digit| Rider::try_number(digit).ok()) {
                if !members.contains(&rider) {
                    members.push(rider);
                }
            }
        }
        Self::new(label, members)
    }

    pub fn is_solo(&self) -> bool {
        self.members.len() == 1
    }
}

pub(crate) fn digit_value(c: char) -> Option<usize> {
    match c {
        '0'..='9' => c.to_digit(10).map(|digit| digit as usize),
        '０'..='９' => Some(c as usize - '０' as usize),
        _ => None,
    }
}

/// Where a rider sits: the index of its line within the partition and its position in that line
/// (`1` = lead, [SOLO] when alone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub line: usize,
    pub position: usize,
}

/// The active riders grouped into lines. Every active rider belongs to exactly one line; riders
/// not named in any line form a solo line of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePartition {
    lines: Vec<Line>,
    seats: FxHashMap<Rider, Seat>,
}
impl LinePartition {
    /// `declared` lines keep their order, followed by a solo line for every remaining rider in
    /// `active` order. Inactive riders are removed from their lines, and lines left with no
    /// members are dropped.
    pub fn new(declared: Vec<Line>, active: &[Rider]) -> Result<Self, IntakeError> {
        let mut owners: FxHashMap<Rider, String> = FxHashMap::default();
        for line in &declared {
            for &rider in &line.members {
                if let Some(first) = owners.insert(rider, line.label.clone()) {
                    return Err(IntakeError::DuplicateMember {
                        rider,
                        first,
                        second: line.label.clone(),
                    });
                }
            }
        }

        let mut lines: Vec<Line> = declared
            .into_iter()
            .map(|Line { label, members }| Line {
                label,
                members: members
                    .into_iter()
                    .filter(|rider| active.contains(rider))
                    .collect(),
            })
            .filter(|line| !line.members.is_empty())
            .collect();

        for &rider in active {
            if !owners.contains_key(&rider) {
                debug!("rider {rider} is not in any line; racing solo");
                lines.push(Line::new(format!("solo {rider}"), vec![rider]));
            }
        }

        let mut seats = FxHashMap::default();
        for (line_index, line) in lines.iter().enumerate() {
            for (member_index, &rider) in line.members.iter().enumerate() {
                let position = if line.is_solo() { SOLO } else { member_index + 1 };
                seats.insert(
                    rider,
                    Seat {
                        line: line_index,
                        position,
                    },
                );
            }
        }
        Ok(Self { lines, seats })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn seat(&self, rider: Rider) -> Option<Seat> {
        self.seats.get(&rider).copied()
    }

    pub fn line_of(&self, rider: Rider) -> Option<&Line> {
        self.seat(rider).map(|seat| &self.lines[seat.line])
    }
}
