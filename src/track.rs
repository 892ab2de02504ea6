//! Track and environmental conditions for a single race.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Wind direction relative to the home straight, as one of eight octants. `None` means calm, or
/// that no direction was recorded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WindDirection {
    #[default]
    None,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

#[derive(Debug, Error, PartialEq)]
#[error("unrecognised wind direction '{0}'")]
pub struct UnknownWindDirection(pub String);

impl FromStr for WindDirection {
    type Err = UnknownWindDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "無風" | "none" => Ok(WindDirection::None),
            "上" | "n" | "north" => Ok(WindDirection::North),
            "右上" | "ne" | "north_east" => Ok(WindDirection::NorthEast),
            "右" | "e" | "east" => Ok(WindDirection::East),
            "右下" | "se" | "south_east" => Ok(WindDirection::SouthEast),
            "下" | "s" | "south" => Ok(WindDirection::South),
            "左下" | "sw" | "south_west" => Ok(WindDirection::SouthWest),
            "左" | "w" | "west" => Ok(WindDirection::West),
            "左上" | "nw" | "north_west" => Ok(WindDirection::NorthWest),
            _ => Err(UnknownWindDirection(s.into())),
        }
    }
}

/// One value per wind octant. Calm air has no entry; it never contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctantTable<T> {
    pub north: T,
    pub north_east: T,
    pub east: T,
    pub south_east: T,
    pub south: T,
    pub south_west: T,
    pub west: T,
    pub north_west: T,
}
impl<T> OctantTable<T> {
    pub fn get(&self, direction: WindDirection) -> Option<&T> {
        match direction {
            WindDirection::None => None,
            WindDirection::North => Some(&self.north),
            WindDirection::NorthEast => Some(&self.north_east),
            WindDirection::East => Some(&self.east),
            WindDirection::SouthEast => Some(&self.south_east),
            WindDirection::South => Some(&self.south),
            WindDirection::SouthWest => Some(&self.south_west),
            WindDirection::West => Some(&self.west),
            WindDirection::NorthWest => Some(&self.north_west),
        }
    }
}

/// Conditions fixed for the duration of one computation. The wind direction travels with the
/// request rather than being remembered between reruns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCondition {
    #[serde(default)]
    pub wind_direction: WindDirection,
    /// Metres per second.
    #[serde(default)]
    pub wind_speed: f64,
    /// Length of the home straight, in metres.
    pub straight: f64,
    /// Bank angle, in degrees.
    pub bank_angle: f64,
    /// Circumference of the bank, in metres.
    pub bank_length: f64,
    pub laps: u32,
}
impl Default for TrackCondition {
    fn default() -> Self {
        Self {
            wind_direction: WindDirection::None,
            wind_speed: 0.0,
            straight: 52.0,
            bank_angle: 32.0,
            bank_length: 400.0,
            laps: 2,
        }
    }
}
impl TrackCondition {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.wind_speed.is_finite() || self.wind_speed < 0.0 {
            anyhow::bail!("wind speed must be a non-negative number, got {}", self.wind_speed);
        }
        for (name, value) in [
            ("straight", self.straight),
            ("bank angle", self.bank_angle),
            ("bank length", self.bank_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("{name} must be a positive number, got {value}");
            }
        }
        Ok(())
    }
}
