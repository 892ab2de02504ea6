//! The race card: the raw, form-like description of a race as supplied by the intake collaborator,
//! and its conversion into a validated [Race].
//!
//! Text fields are interpreted leniently. Finishes that are not a rank become absent, line text
//! contributes only its digits, and a rider without a queue position is simply excluded.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IntakeError;
use crate::line::{digit_value, Line};
use crate::race::{Participant, Race};
use crate::rider::{Finish, Rider};
use crate::style::Style;
use crate::track::{TrackCondition, WindDirection};
use crate::venue::{self, TrackPreset, Venues};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceCard {
    pub track: TrackCard,
    pub riders: Vec<RiderCard>,
    #[serde(default)]
    pub lines: Vec<LineCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCard {
    /// Names a [TrackPreset](crate::venue::TrackPreset) that fills in the geometry. Absent, or a
    /// manual-entry token, means every geometry field must be given.
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub straight: Option<f64>,
    #[serde(default)]
    pub bank_angle: Option<f64>,
    #[serde(default)]
    pub bank_length: Option<f64>,
    pub laps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderCard {
    pub number: usize,
    pub style: String,
    /// Older race first, most recent second. Missing entries are absent finishes.
    #[serde(default)]
    pub finishes: Vec<String>,
    pub rating: f64,
    #[serde(default)]
    pub queue: String,
    #[serde(default)]
    pub s: u32,
    #[serde(default)]
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCard {
    pub label: String,
    pub riders: String,
}

/// A queue position is present only when its text is a non-empty run of digits, half- or
/// full-width alike. Values too large to represent saturate rather than dropping the rider.
fn parse_queue(text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.chars().try_fold(0_usize, |queue, c| {
        digit_value(c).map(|digit| queue.saturating_mul(10).saturating_add(digit))
    })
}

impl TrackCard {
    /// Resolves the track against `venues`. Geometry given on the card overrides the preset field by
    /// field.
    pub fn resolve(self, venues: &Venues) -> Result<TrackCondition, IntakeError> {
        let preset = match self.venue.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) if venue::is_manual(name) => None,
            Some(name) => {
                let preset = venues
                    .get(name)
                    .copied()
                    .ok_or_else(|| IntakeError::UnknownVenue(name.into()))?;
                debug!("venue {name}: {preset:?}");
                Some(preset)
            }
        };
        let pick = |given: Option<f64>, from_preset: fn(&TrackPreset) -> f64, field: &'static str| {
            given
                .or(preset.as_ref().map(from_preset))
                .ok_or(IntakeError::MissingTrackField(field))
        };
        Ok(TrackCondition {
            wind_direction: WindDirection::from_str(&self.wind_direction)?,
            wind_speed: self.wind_speed,
            straight: pick(self.straight, |preset| preset.straight, "straight")?,
            bank_angle: pick(self.bank_angle, |preset| preset.bank_angle, "bank angle")?,
            bank_length: pick(self.bank_length, |preset| preset.bank_length, "bank length")?,
            laps: self.laps,
        })
    }
}

impl TryFrom<TrackCard> for TrackCondition {
    type Error = IntakeError;

    fn try_from(card: TrackCard) -> Result<Self, Self::Error> {
        card.resolve(&Venues::default())
    }
}

impl TryFrom<RiderCard> for Participant {
    type Error = IntakeError;

    fn try_from(card: RiderCard) -> Result<Self, Self::Error> {
        let rider =
            Rider::try_number(card.number).map_err(|_| IntakeError::InvalidRider(card.number))?;
        let finish = |slot: usize| card.finishes.get(slot).and_then(|text| Finish::parse(text));
        Ok(Self {
            rider,
            style: Style::from_str(&card.style)?,
            finishes: [finish(0), finish(1)],
            rating: card.rating,
            queue: parse_queue(&card.queue),
            s_count: card.s,
            b_count: card.b,
        })
    }
}

impl RaceCard {
    /// Builds the [Race], looking up a named venue in `venues`.
    pub fn into_race(self, venues: &Venues) -> Result<Race, IntakeError> {
        let track = self.track.resolve(venues)?;
        let participants = self
            .riders
            .into_iter()
            .map(Participant::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let lines = self
            .lines
            .iter()
            .map(|line| Line::parse(line.label.clone(), &line.riders))
            .collect();
        Race::new(track, participants, lines)
    }
}

impl TryFrom<RaceCard> for Race {
    type Error = IntakeError;

    fn try_from(card: RaceCard) -> Result<Self, Self::Error> {
        card.into_race(&Venues::default())
    }
}
