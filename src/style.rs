//! Riding [Style] of a participant and the per-style lookup [StyleTable].

use std::str::FromStr;

use ordinalizer::Ordinal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;

/// How a rider races. Each style maps to exactly one entry of every [StyleTable].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Leads from the front and commits early (逃).
    Front,
    /// Can either lead or follow (両).
    Versatile,
    /// Sits in and finishes from behind (追).
    Chaser,
}

#[derive(Debug, Error, PartialEq)]
#[error("unrecognised style '{0}'")]
pub struct UnknownStyle(pub String);

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "逃" | "f" | "front" => Ok(Style::Front),
            "両" | "v" | "versatile" => Ok(Style::Versatile),
            "追" | "c" | "chaser" => Ok(Style::Chaser),
            _ => Err(UnknownStyle(s.into())),
        }
    }
}

/// One value per [Style]. The fields are exhaustive, so there is no way to construct a table that
/// silently lacks a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTable<T> {
    pub front: T,
    pub versatile: T,
    pub chaser: T,
}
impl<T> StyleTable<T> {
    pub const fn new(front: T, versatile: T, chaser: T) -> Self {
        Self {
            front,
            versatile,
            chaser,
        }
    }

    pub fn get(&self, style: Style) -> &T {
        match style {
            Style::Front => &self.front,
            Style::Versatile => &self.versatile,
            Style::Chaser => &self.chaser,
        }
    }

    pub fn values(&self) -> [&T; 3] {
        [&self.front, &self.versatile, &self.chaser]
    }
}
