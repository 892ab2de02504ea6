//! The adjustment library: pure functions that each turn a subset of rider and track attributes
//! into a bounded delta on the rider's score.

use crate::rider::{Finish, MAX_RIDERS};
use crate::style::Style;
use crate::track::TrackCondition;
use crate::tunables::{
    BankCharacterTunables, BankLengthTunables, FinishTunables, LapTunables, OccurrenceTunables,
    RatingTunables, WindTunables,
};

/// Number of decimal places every adjustment is rounded to.
pub const DECIMALS: i32 = 3;

pub fn round(value: f64) -> f64 {
    let scale = 10_f64.powi(DECIMALS);
    (value * scale).round() / scale
}

/// Looks up a table indexed by position in line. Positions past the end take the last entry.
pub fn by_position(table: &[f64], position: usize) -> f64 {
    table
        .get(position)
        .or(table.last())
        .copied()
        .unwrap_or_default()
}

pub fn wind(style: Style, track: &TrackCondition, position: usize, cf: &WindTunables) -> f64 {
    if track.wind_speed < cf.calm_below {
        return 0.0;
    }
    let Some(&coefficient) = cf.coefficients.get(track.wind_direction) else {
        return 0.0;
    };
    let delta = coefficient
        * track.wind_speed
        * by_position(&cf.position_multipliers, position)
        * cf.style_coefficients.get(style);
    round(delta.clamp(-cf.cap, cf.cap))
}

/// `finishes` holds the older race first and the most recent second. Each valid rank maps to
/// `(N + 1 - rank) / N`; the most recent is further scaled by the recent weight.
pub fn finish_history(finishes: &[Option<Finish>; 2], cf: &FinishTunables) -> f64 {
    let field = MAX_RIDERS as f64;
    let contributions: Vec<_> = finishes
        .iter()
        .enumerate()
        .filter_map(|(slot, finish)| {
            finish.map(|finish| {
                let contribution = (field + 1.0 - finish.rank() as f64) / field;
                if slot == 1 {
                    contribution * cf.recent_weight
                } else {
                    contribution
                }
            })
        })
        .collect();
    if contributions.is_empty() {
        return 0.0;
    }
    round(contributions.iter().sum::<f64>() / contributions.len() as f64)
}

/// Rating bonus for every rider, aligned with `ratings` and their precomputed `ranks`. Only riders
/// ranked within the favoured band receive a (non-negative) bonus, proportional to how far their
/// rating lies from the mean rating of the baseline band.
pub fn rating(ratings: &[f64], ranks: &[usize], cf: &RatingTunables) -> Vec<f64> {
    debug_assert_eq!(ratings.len(), ranks.len(), "ratings and ranks must align");
    let baseline: Vec<_> = ratings
        .iter()
        .zip(ranks)
        .filter(|(_, rank)| cf.baseline_ranks.contains(rank))
        .map(|(&rating, _)| rating)
        .collect();
    if baseline.is_empty() {
        return vec![0.0; ratings.len()];
    }
    let baseline = baseline.iter().sum::<f64>() / baseline.len() as f64;
    ratings
        .iter()
        .zip(ranks)
        .map(|(&rating, rank)| {
            if cf.favoured_ranks.contains(rank) {
                round(((rating - baseline).abs() * cf.factor).min(cf.cap))
            } else {
                0.0
            }
        })
        .collect()
}

pub fn laps(style: Style, laps: u32, cf: &LapTunables) -> f64 {
    let extra_laps = laps.saturating_sub(cf.free_laps);
    round((cf.per_lap.get(style) * extra_laps as f64).clamp(-cf.cap, cf.cap))
}

pub fn occurrence(s_count: u32, b_count: u32, cf: &OccurrenceTunables) -> f64 {
    let delta = s_count as f64 * cf.per_s + b_count as f64 * cf.per_b;
    round(delta.clamp(-cf.cap, cf.cap))
}

pub fn line_position(position: usize, table: &[f64]) -> f64 {
    by_position(table, position)
}

/// A short straight and a steep bank give a positive factor, favouring riders who go from the
/// front; a long straight on a shallow bank favours those who finish from behind.
pub fn bank_character(style: Style, track: &TrackCondition, cf: &BankCharacterTunables) -> f64 {
    let straight_factor = (track.straight - cf.straight_reference) / cf.straight_scale;
    let angle_factor = (track.bank_angle - cf.angle_reference) / cf.angle_scale;
    let factor = cf.straight_weight * straight_factor + cf.angle_weight * angle_factor;
    round(cf.style_scale.get(style) * factor)
}

pub fn bank_length(style: Style, bank_length: f64, cf: &BankLengthTunables) -> f64 {
    let normalised = ((bank_length - cf.reference) / cf.scale).clamp(-cf.bound, cf.bound);
    round(normalised * cf.style_multiplier.get(style))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use strum::IntoEnumIterator;
    use tinyrand::{RandRange, StdRand};

    use super::*;
    use crate::rank::min_ranks;
    use crate::track::WindDirection;
    use crate::tunables::Tunables;

    fn finishes(older: &str, recent: &str) -> [Option<Finish>; 2] {
        [Finish::parse(older), Finish::parse(recent)]
    }

    #[test]
    fn wind_calm_or_directionless() {
        let cf = Tunables::default().wind;
        for direction in WindDirection::iter() {
            let track = TrackCondition {
                wind_direction: direction,
                wind_speed: 0.0,
                ..TrackCondition::default()
            };
            for style in Style::iter() {
                assert_eq!(0.0, wind(style, &track, 1, &cf));
            }
        }
        let track = TrackCondition {
            wind_direction: WindDirection::None,
            wind_speed: 6.0,
            ..TrackCondition::default()
        };
        assert_eq!(0.0, wind(Style::Front, &track, 1, &cf));
        let track = TrackCondition {
            wind_direction: WindDirection::North,
            wind_speed: 0.4,
            ..TrackCondition::default()
        };
        assert_eq!(0.0, wind(Style::Front, &track, 1, &cf));
    }

    #[test]
    fn wind_product() {
        let cf = Tunables::default().wind;
        let track = TrackCondition {
            wind_direction: WindDirection::North,
            wind_speed: 4.0,
            ..TrackCondition::default()
        };
        // -0.05 * 4.0 * 1.0 (lead) * 1.0 (front)
        assert_float_absolute_eq!(-0.2, wind(Style::Front, &track, 1, &cf), 1e-9);
        // -0.05 * 4.0 * 0.6 (second) * 0.5 (chaser)
        assert_float_absolute_eq!(-0.06, wind(Style::Chaser, &track, 2, &cf), 1e-9);
        // deep positions reuse the last multiplier: -0.05 * 4.0 * 0.1 * 0.8
        assert_float_absolute_eq!(-0.016, wind(Style::Versatile, &track, 7, &cf), 1e-9);
    }

    #[test]
    fn finish_history_mean_of_valid() {
        let cf = Tunables::default().finish;
        // (9 + 1 - 1) / 9 = 1.0, (9 + 1 - 1) / 9 * 0.35 = 0.35
        assert_float_absolute_eq!(0.675, finish_history(&finishes("1", "1"), &cf), 1e-9);
        // only the older race is valid
        assert_float_absolute_eq!(0.556, finish_history(&finishes("5", "落"), &cf), 1e-9);
        // only the recent race is valid: 5/9 * 0.35
        assert_float_absolute_eq!(0.194, finish_history(&finishes("", "5"), &cf), 1e-9);
        assert_eq!(0.0, finish_history(&finishes("", "x"), &cf));
    }

    #[test]
    fn finish_history_swap_only_moves_weight() {
        let cf = Tunables::default().finish;
        let forward = finish_history(&finishes("2", "6"), &cf);
        let reverse = finish_history(&finishes("6", "2"), &cf);
        let (good, poor) = (8.0 / 9.0, 4.0 / 9.0);
        assert_float_absolute_eq!((good + poor * 0.35) / 2.0, forward, 1e-3);
        assert_float_absolute_eq!((poor + good * 0.35) / 2.0, reverse, 1e-3);
    }

    #[test]
    fn rating_band_gated() {
        let cf = Tunables::default().rating;
        let ratings = [100.0, 78.0, 74.0, 70.0, 66.0, 62.0, 40.0];
        let ranks = min_ranks(&ratings);
        let deltas = rating(&ratings, &ranks, &cf);
        // baseline over ranks 2..=6 is 70
        assert_eq!(0.0, deltas[0]);
        assert_float_absolute_eq!(0.24, deltas[1], 1e-9);
        assert_float_absolute_eq!(0.12, deltas[2], 1e-9);
        assert_float_absolute_eq!(0.0, deltas[3], 1e-9);
        assert_eq!(vec![0.0; 3], deltas[4..].to_vec());
    }

    #[test]
    fn rating_ties_skip_ranks() {
        let cf = Tunables::default().rating;
        let ratings = [90.0, 80.0, 80.0, 70.0, 60.0];
        let ranks = min_ranks(&ratings);
        assert_eq!(vec![1, 2, 2, 4, 5], ranks);
        let deltas = rating(&ratings, &ranks, &cf);
        // baseline over ranks 2..=6 is 72.5; nobody holds rank 3
        assert_eq!(0.0, deltas[0]);
        assert_float_absolute_eq!(0.225, deltas[1], 1e-9);
        assert_float_absolute_eq!(0.225, deltas[2], 1e-9);
        assert_float_absolute_eq!(0.075, deltas[3], 1e-9);
        assert_eq!(0.0, deltas[4]);
    }

    #[test]
    fn rating_capped() {
        let cf = Tunables::default().rating;
        let ratings = [120.0, 119.0, 60.0, 58.0, 57.0, 56.0];
        let deltas = rating(&ratings, &min_ranks(&ratings), &cf);
        assert_eq!(cf.cap, deltas[1]);
        assert!(deltas.iter().all(|&delta| delta <= cf.cap));
    }

    #[test]
    fn rating_gated_on_random_fields() {
        let cf = Tunables::default().rating;
        let mut rand = StdRand::default();
        for _ in 0..200 {
            let riders = rand.next_range(2..10usize);
            // coarse steps so that ties are common
            let ratings: Vec<_> = (0..riders)
                .map(|_| 60.0 + rand.next_range(0..8u32) as f64 * 5.0)
                .collect();
            let ranks = min_ranks(&ratings);
            let deltas = rating(&ratings, &ranks, &cf);
            assert_eq!(ratings.len(), deltas.len());
            for (&rank, &delta) in ranks.iter().zip(&deltas) {
                if cf.favoured_ranks.contains(&rank) {
                    assert!(delta >= 0.0, "rank {rank} got {delta} for {ratings:?}");
                    assert!(delta <= cf.cap, "rank {rank} got {delta} for {ratings:?}");
                } else {
                    assert_eq!(0.0, delta, "rank {rank} for {ratings:?}");
                }
            }
        }
    }

    #[test]
    fn rating_without_baseline() {
        let cf = Tunables::default().rating;
        let ratings = [80.0, 80.0];
        let ranks = min_ranks(&ratings);
        assert_eq!(vec![0.0, 0.0], rating(&ratings, &ranks, &cf));
    }

    #[test]
    fn wind_capped() {
        let cf = Tunables::default().wind;
        let track = TrackCondition {
            wind_direction: WindDirection::South,
            wind_speed: 40.0,
            ..TrackCondition::default()
        };
        assert_eq!(cf.cap, wind(Style::Front, &track, 1, &cf));
        let track = TrackCondition {
            wind_direction: WindDirection::North,
            ..track
        };
        assert_eq!(-cf.cap, wind(Style::Front, &track, 1, &cf));
    }

    #[test]
    fn laps_capped() {
        let cf = Tunables::default().laps;
        assert_eq!(-cf.cap, laps(Style::Front, 30, &cf));
        assert_eq!(cf.cap, laps(Style::Chaser, 30, &cf));
    }

    #[test]
    fn laps_beyond_free() {
        let cf = Tunables::default().laps;
        assert_eq!(0.0, laps(Style::Front, 2, &cf));
        assert_eq!(0.0, laps(Style::Front, 1, &cf));
        assert_float_absolute_eq!(-0.04, laps(Style::Front, 4, &cf), 1e-9);
        assert_float_absolute_eq!(0.02, laps(Style::Chaser, 4, &cf), 1e-9);
        assert_eq!(0.0, laps(Style::Versatile, 6, &cf));
    }

    #[test]
    fn occurrence_linear() {
        let cf = Tunables::default().occurrence;
        assert_eq!(0.0, occurrence(0, 0, &cf));
        assert_float_absolute_eq!(-0.03, occurrence(3, 0, &cf), 1e-9);
        assert_float_absolute_eq!(0.02, occurrence(1, 3, &cf), 1e-9);
    }

    #[test]
    fn occurrence_capped() {
        let cf = Tunables::default().occurrence;
        assert_eq!(cf.cap, occurrence(0, 200, &cf));
        assert_eq!(-cf.cap, occurrence(200, 0, &cf));
    }

    #[test]
    fn line_position_lookup() {
        let table = Tunables::default().line_position;
        assert_eq!(-0.03, line_position(0, &table));
        assert_eq!(0.05, line_position(1, &table));
        assert_eq!(0.04, line_position(2, &table));
        assert_eq!(-0.01, line_position(8, &table));
        assert_eq!(0.0, line_position(1, &[]));
    }

    #[test]
    fn bank_character_signs() {
        let cf = Tunables::default().bank_character;
        let neutral = TrackCondition {
            straight: 40.0,
            bank_angle: 25.0,
            ..TrackCondition::default()
        };
        for style in Style::iter() {
            assert_eq!(0.0, bank_character(style, &neutral, &cf));
        }
        let tight = TrackCondition {
            straight: 30.0,
            bank_angle: 35.0,
            ..TrackCondition::default()
        };
        // factor = -0.5 * -1.0 + 0.5 * 2.0 = 1.5
        assert_float_absolute_eq!(0.03, bank_character(Style::Front, &tight, &cf), 1e-9);
        assert_float_absolute_eq!(-0.03, bank_character(Style::Chaser, &tight, &cf), 1e-9);
        let open = TrackCondition {
            straight: 60.0,
            bank_angle: 25.0,
            ..TrackCondition::default()
        };
        assert!(bank_character(Style::Front, &open, &cf) < 0.0);
        assert!(bank_character(Style::Chaser, &open, &cf) > 0.0);
    }

    #[test]
    fn bank_length_clamped() {
        let cf = Tunables::default().bank_length;
        assert_eq!(0.0, bank_length(Style::Chaser, 411.0, &cf));
        // (414 - 411) / 100 = 0.03
        assert_float_absolute_eq!(0.015, bank_length(Style::Chaser, 414.0, &cf), 1e-9);
        assert_float_absolute_eq!(0.025, bank_length(Style::Chaser, 500.0, &cf), 1e-9);
        assert_float_absolute_eq!(0.025, bank_length(Style::Front, 333.0, &cf), 1e-9);
        assert_eq!(0.0, bank_length(Style::Versatile, 333.0, &cf));
    }
}
