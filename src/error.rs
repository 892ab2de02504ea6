//! Structural intake errors. These are raised before scoring starts; once a [Race](crate::race::Race)
//! has been assembled, nothing downstream fails.

use thiserror::Error;

use crate::rider::Rider;
use crate::style::UnknownStyle;
use crate::track::UnknownWindDirection;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{0}")]
    UnknownStyle(#[from] UnknownStyle),

    #[error("{0}")]
    UnknownWindDirection(#[from] UnknownWindDirection),

    #[error("invalid rider number {0}")]
    InvalidRider(usize),

    #[error("rider {0} is listed more than once")]
    DuplicateEntry(Rider),

    #[error("rider {rider} appears in both line '{first}' and line '{second}'")]
    DuplicateMember {
        rider: Rider,
        first: String,
        second: String,
    },

    #[error("rider {rider} has a non-finite rating {rating}")]
    InvalidRating { rider: Rider, rating: f64 },

    #[error("unknown venue '{0}'")]
    UnknownVenue(String),

    #[error("track {0} must be given when no venue preset applies")]
    MissingTrackField(&'static str),

    #[error("{0}")]
    InvalidTrack(anyhow::Error),
}
