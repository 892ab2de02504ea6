//! The request-scoped data model: participants, track conditions and the line partition.

use tracing::debug;

use crate::error::IntakeError;
use crate::line::{Line, LinePartition};
use crate::rider::{Finish, Rider};
use crate::style::Style;
use crate::track::TrackCondition;

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub rider: Rider,
    pub style: Style,
    /// The older race first, the most recent second.
    pub finishes: [Option<Finish>; 2],
    pub rating: f64,
    /// Starting queue position. A participant without one takes no part in the computation.
    pub queue: Option<usize>,
    pub s_count: u32,
    pub b_count: u32,
}
impl Participant {
    pub fn is_active(&self) -> bool {
        self.queue.is_some()
    }
}

/// Everything one prediction needs. Built afresh for every request and never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Race {
    track: TrackCondition,
    participants: Vec<Participant>,
    lines: LinePartition,
}
impl Race {
    pub fn new(
        track: TrackCondition,
        mut participants: Vec<Participant>,
        declared_lines: Vec<Line>,
    ) -> Result<Self, IntakeError> {
        track.validate().map_err(IntakeError::InvalidTrack)?;
        participants.sort_by_key(|participant| participant.rider);
        for pair in participants.windows(2) {
            if pair[0].rider == pair[1].rider {
                return Err(IntakeError::DuplicateEntry(pair[0].rider));
            }
        }
        for participant in &participants {
            if participant.is_active() && !participant.rating.is_finite() {
                return Err(IntakeError::InvalidRating {
                    rider: participant.rider,
                    rating: participant.rating,
                });
            }
            if !participant.is_active() {
                debug!("rider {} has no queue position; excluded", participant.rider);
            }
        }
        let active: Vec<_> = participants
            .iter()
            .filter(|participant| participant.is_active())
            .map(|participant| participant.rider)
            .collect();
        let lines = LinePartition::new(declared_lines, &active)?;
        Ok(Self {
            track,
            participants,
            lines,
        })
    }

    pub fn track(&self) -> &TrackCondition {
        &self.track
    }

    /// All participants, active or not, in rider number order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Active participants in rider number order.
    pub fn active(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|participant| participant.is_active())
    }

    pub fn excluded(&self) -> impl Iterator<Item = Rider> + '_ {
        self.participants
            .iter()
            .filter(|participant| !participant.is_active())
            .map(|participant| participant.rider)
    }

    pub fn lines(&self) -> &LinePartition {
        &self.lines
    }
}
