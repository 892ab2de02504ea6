//! The score aggregator: applies every adjustment to each active participant and records the
//! itemised [Breakdown].

use std::ops::Index;

use ordinalizer::Ordinal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::adjust;
use crate::race::Race;
use crate::rank::min_ranks;
use crate::rider::Rider;
use crate::style::Style;
use crate::tunables::Tunables;

/// A named term of the total score, in the order the terms are listed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, strum_macros::EnumCount, EnumIter, Display, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Base,
    Wind,
    Finish,
    Rating,
    Laps,
    Occurrence,
    LinePosition,
    BankCharacter,
    BankLength,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub rider: Rider,
    pub style: Style,
    pub rating: f64,
    pub rating_rank: usize,
    pub line: String,
    pub position: usize,
    #[serde(serialize_with = "serialize_deltas")]
    deltas: [f64; Factor::COUNT],
    total: f64,
}
impl Breakdown {
    pub(crate) fn new(
        rider: Rider,
        style: Style,
        rating: f64,
        rating_rank: usize,
        line: String,
        position: usize,
    ) -> Self {
        Self {
            rider,
            style,
            rating,
            rating_rank,
            line,
            position,
            deltas: [0.0; Factor::COUNT],
            total: 0.0,
        }
    }

    /// Sets the value of one term, keeping the total equal to the sum of the terms.
    pub fn set(&mut self, factor: Factor, value: f64) {
        let slot = &mut self.deltas[factor.ordinal()];
        self.total += value - *slot;
        *slot = value;
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn deltas(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::iter().zip(self.deltas.iter().copied())
    }
}

impl Index<Factor> for Breakdown {
    type Output = f64;

    fn index(&self, factor: Factor) -> &Self::Output {
        &self.deltas[factor.ordinal()]
    }
}

fn serialize_deltas<S: Serializer>(deltas: &[f64; Factor::COUNT], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(Factor::COUNT))?;
    for (factor, delta) in Factor::iter().zip(deltas) {
        map.serialize_entry(&factor, delta)?;
    }
    map.end()
}

/// Scores every active participant of the `race`, in rider number order. The [Factor::Group] term
/// is left at zero; it is filled in by the [bonus](crate::bonus) stage.
pub fn aggregate(race: &Race, tunables: &Tunables) -> Vec<Breakdown> {
    let active: Vec<_> = race.active().collect();
    let ratings: Vec<_> = active.iter().map(|participant| participant.rating).collect();
    let rating_ranks = min_ranks(&ratings);
    let rating_deltas = adjust::rating(&ratings, &rating_ranks, &tunables.rating);
    let track = race.track();

    active
        .iter()
        .enumerate()
        .filter_map(|(index, participant)| {
            let Some(seat) = race.lines().seat(participant.rider) else {
                debug!("rider {} has no seat; skipped", participant.rider);
                return None;
            };
            let line = &race.lines().lines()[seat.line];
            let style = participant.style;
            let mut breakdown = Breakdown::new(
                participant.rider,
                style,
                participant.rating,
                rating_ranks[index],
                line.label.clone(),
                seat.position,
            );
            breakdown.set(Factor::Base, *tunables.base.get(style));
            breakdown.set(
                Factor::Wind,
                adjust::wind(style, track, seat.position, &tunables.wind),
            );
            breakdown.set(
                Factor::Finish,
                adjust::finish_history(&participant.finishes, &tunables.finish),
            );
            breakdown.set(Factor::Rating, rating_deltas[index]);
            breakdown.set(Factor::Laps, adjust::laps(style, track.laps, &tunables.laps));
            breakdown.set(
                Factor::Occurrence,
                adjust::occurrence(participant.s_count, participant.b_count, &tunables.occurrence),
            );
            breakdown.set(
                Factor::LinePosition,
                adjust::line_position(seat.position, &tunables.line_position),
            );
            breakdown.set(
                Factor::BankCharacter,
                adjust::bank_character(style, track, &tunables.bank_character),
            );
            breakdown.set(
                Factor::BankLength,
                adjust::bank_length(style, track.bank_length, &tunables.bank_length),
            );
            debug!("rider {}: total {:.3}", breakdown.rider, breakdown.total());
            Some(breakdown)
        })
        .collect()
}

/// Orders breakdowns by descending total, keeping rider number order among equal totals.
pub fn sort_descending(breakdowns: &mut [Breakdown]) {
    breakdowns.sort_by(|a, b| b.total().total_cmp(&a.total()));
}
