//! Testing helpers.

use assert_float_eq::*;

use crate::line::Line;
use crate::race::{Participant, Race};
use crate::rider::Rider;
use crate::score::{Breakdown, Factor};
use crate::style::Style;
use crate::track::TrackCondition;

/// An active participant with no finishing history and no S/B counts, queued at its own number.
pub fn participant(number: usize, style: Style, rating: f64) -> Participant {
    Participant {
        rider: Rider::number(number),
        style,
        finishes: [None, None],
        rating,
        queue: Some(number),
        s_count: 0,
        b_count: 0,
    }
}

/// A race on a default track where every rider is a solo front-runner, numbered from 1 in the order
/// of `ratings`.
pub fn solo_field(ratings: &[f64]) -> Race {
    Race::new(
        TrackCondition::default(),
        ratings
            .iter()
            .enumerate()
            .map(|(index, &rating)| participant(index + 1, Style::Front, rating))
            .collect(),
        Vec::<Line>::new(),
    )
    .unwrap()
}

/// A standalone breakdown whose total is carried entirely by the base term.
pub fn breakdown(number: usize, rating_rank: usize, total: f64) -> Breakdown {
    let mut breakdown = Breakdown::new(
        Rider::number(number),
        Style::Versatile,
        100.0 - rating_rank as f64,
        rating_rank,
        format!("solo {number}"),
        0,
    );
    breakdown.set(Factor::Base, total);
    breakdown
}

/// Asserts that every total equals the sum of its itemised terms.
pub fn assert_totals_consistent(breakdowns: &[Breakdown]) {
    for breakdown in breakdowns {
        let sum: f64 = breakdown.deltas().map(|(_, delta)| delta).sum();
        assert_float_absolute_eq!(sum, breakdown.total(), 1e-3);
    }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}
