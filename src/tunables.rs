//! The versioned set of constants that parametrise the scoring model and the bet constructor.
//!
//! Every formula in [adjust](crate::adjust), [bonus](crate::bonus) and [bet](crate::bet) reads its
//! constants from a single [Tunables] instance that is injected once per prediction. The
//! [Default] implementation carries the reference values; alternative sets may be loaded from JSON
//! via [ReadJsonFile](crate::file::ReadJsonFile).

use std::ops::RangeInclusive;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::style::StyleTable;
use crate::track::OctantTable;

pub const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    pub version: u32,
    pub base: StyleTable<f64>,
    pub wind: WindTunables,
    pub finish: FinishTunables,
    pub rating: RatingTunables,
    pub laps: LapTunables,
    pub occurrence: OccurrenceTunables,
    /// Indexed by position in line: solo, lead, second, third, and deeper positions thereafter.
    /// The last entry applies to every position beyond the end of the table.
    pub line_position: Vec<f64>,
    pub bank_character: BankCharacterTunables,
    pub bank_length: BankLengthTunables,
    /// Descending bonus curve, assigned to lines by rank. Lines beyond its length receive nothing.
    pub line_bonus: Vec<f64>,
    pub selection: SelectionTunables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindTunables {
    /// Wind speeds strictly below this are treated as calm.
    pub calm_below: f64,
    pub coefficients: OctantTable<f64>,
    /// Indexed by position in line, with the same layout as [Tunables::line_position].
    pub position_multipliers: Vec<f64>,
    pub style_coefficients: StyleTable<f64>,
    /// Largest magnitude of the wind term.
    pub cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishTunables {
    /// Down-weight applied to the most recent of the two finishes.
    pub recent_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTunables {
    /// Rating ranks whose mean rating forms the baseline.
    pub baseline_ranks: RangeInclusive<usize>,
    /// Rating ranks eligible for a bonus.
    pub favoured_ranks: RangeInclusive<usize>,
    /// Fraction of the absolute deviation from the baseline awarded as the bonus.
    pub factor: f64,
    /// Largest bonus awarded.
    pub cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTunables {
    /// Laps raced before any lap adjustment applies.
    pub free_laps: u32,
    pub per_lap: StyleTable<f64>,
    pub cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceTunables {
    pub per_s: f64,
    pub per_b: f64,
    pub cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankCharacterTunables {
    pub straight_reference: f64,
    pub straight_scale: f64,
    pub angle_reference: f64,
    pub angle_scale: f64,
    pub straight_weight: f64,
    pub angle_weight: f64,
    pub style_scale: StyleTable<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankLengthTunables {
    pub reference: f64,
    pub scale: f64,
    /// Symmetric clamp applied to the normalised length before the style multiplier.
    pub bound: f64,
    pub style_multiplier: StyleTable<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTunables {
    /// Rating ranks from which the anchor and the extra mid-rank candidate are drawn.
    pub anchor_ranks: RangeInclusive<usize>,
    /// Offset into the anchor candidates once sorted by ascending score.
    pub anchor_pick: usize,
    /// Rating ranks from which the supporting pair and the second fallback are drawn.
    pub low_ranks: RangeInclusive<usize>,
    pub supporting_pair: usize,
    pub second_tier: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            version: VERSION,
            base: StyleTable::new(4.7, 4.8, 5.0),
            wind: WindTunables {
                calm_below: 0.5,
                coefficients: OctantTable {
                    north: -0.05,
                    north_east: -0.035,
                    east: -0.05,
                    south_east: 0.035,
                    south: 0.05,
                    south_west: 0.035,
                    west: 0.05,
                    north_west: -0.03,
                },
                position_multipliers: vec![0.8, 1.0, 0.6, 0.3, 0.1],
                style_coefficients: StyleTable::new(1.0, 0.8, 0.5),
                cap: 0.3,
            },
            finish: FinishTunables {
                recent_weight: 0.35,
            },
            rating: RatingTunables {
                baseline_ranks: 2..=6,
                favoured_ranks: 2..=4,
                factor: 0.03,
                cap: 0.3,
            },
            laps: LapTunables {
                free_laps: 2,
                per_lap: StyleTable::new(-0.02, 0.0, 0.01),
                cap: 0.06,
            },
            occurrence: OccurrenceTunables {
                per_s: -0.01,
                per_b: 0.01,
                cap: 0.1,
            },
            line_position: vec![-0.03, 0.05, 0.04, 0.01, -0.01],
            bank_character: BankCharacterTunables {
                straight_reference: 40.0,
                straight_scale: 10.0,
                angle_reference: 25.0,
                angle_scale: 5.0,
                straight_weight: -0.5,
                angle_weight: 0.5,
                style_scale: StyleTable::new(0.02, 0.01, -0.02),
            },
            bank_length: BankLengthTunables {
                reference: 411.0,
                scale: 100.0,
                bound: 0.05,
                style_multiplier: StyleTable::new(-0.5, 0.0, 0.5),
            },
            line_bonus: vec![0.25, 0.20, 0.15, 0.10, 0.08, 0.05, 0.03, 0.02, 0.01],
            selection: SelectionTunables {
                anchor_ranks: 2..=4,
                anchor_pick: 1,
                low_ranks: 5..=9,
                supporting_pair: 2,
                second_tier: 2,
            },
        }
    }
}

impl Tunables {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.version != VERSION {
            bail!("unsupported tunables version {}, expected {VERSION}", self.version);
        }
        if self.base.values().into_iter().any(|base| !base.is_finite()) {
            bail!("base scores must be finite");
        }
        for (name, cap) in [
            ("wind", self.wind.cap),
            ("rating", self.rating.cap),
            ("laps", self.laps.cap),
            ("occurrence", self.occurrence.cap),
        ] {
            if !cap.is_finite() || cap < 0.0 {
                bail!("{name} cap must be a non-negative number, got {cap}");
            }
        }
        if self.wind.calm_below < 0.0 {
            bail!("calm wind threshold cannot be negative");
        }
        if self.wind.position_multipliers.is_empty() {
            bail!("wind position multipliers cannot be empty");
        }
        if self.line_position.is_empty() {
            bail!("line position table cannot be empty");
        }
        if !(0.0..=1.0).contains(&self.finish.recent_weight) {
            bail!("recent finish weight must be in the range 0..=1");
        }
        if self.rating.factor < 0.0 {
            bail!("rating factor cannot be negative");
        }
        validate_ranks("rating baseline", &self.rating.baseline_ranks)?;
        validate_ranks("rating favoured", &self.rating.favoured_ranks)?;
        validate_ranks("anchor", &self.selection.anchor_ranks)?;
        validate_ranks("low", &self.selection.low_ranks)?;
        if self.bank_character.straight_scale == 0.0 || self.bank_character.angle_scale == 0.0 {
            bail!("bank character scales must be non-zero");
        }
        if self.bank_length.scale == 0.0 {
            bail!("bank length scale must be non-zero");
        }
        if self.bank_length.bound < 0.0 {
            bail!("bank length bound cannot be negative");
        }
        if self.line_bonus.iter().any(|&bonus| bonus < 0.0) {
            bail!("line bonuses cannot be negative");
        }
        if self
            .line_bonus
            .windows(2)
            .any(|pair| pair[1] > pair[0])
        {
            bail!("line bonuses must be non-increasing");
        }
        Ok(())
    }
}

fn validate_ranks(name: &str, ranks: &RangeInclusive<usize>) -> Result<(), anyhow::Error> {
    if *ranks.start() == 0 || ranks.is_empty() {
        bail!("{name} ranks must be a non-empty range starting from 1 or above");
    }
    Ok(())
}
