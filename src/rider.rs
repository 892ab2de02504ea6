//! Identification of riders by their saddle-cloth number, and their past finishing positions.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Largest field supported. Rider numbers and finishing positions fall in `1..=MAX_RIDERS`.
pub const MAX_RIDERS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Rider(usize);

impl Rider {
    pub fn number(number: usize) -> Self {
        assert!((1..=MAX_RIDERS).contains(&number), "invalid rider number {number}");
        Self(number)
    }

    pub fn try_number(number: usize) -> anyhow::Result<Self> {
        if !(1..=MAX_RIDERS).contains(&number) {
            bail!("invalid rider number {number}");
        }
        Ok(Self(number))
    }

    pub fn as_number(&self) -> usize {
        self.0
    }
}

impl Display for Rider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: usize = s.trim().parse().context("rider number must be numeric")?;
        Rider::try_number(number)
    }
}

impl TryFrom<usize> for Rider {
    type Error = anyhow::Error;

    fn try_from(number: usize) -> Result<Self, Self::Error> {
        Rider::try_number(number)
    }
}

impl From<Rider> for usize {
    fn from(rider: Rider) -> Self {
        rider.0
    }
}

/// A past finishing position in `1..=MAX_RIDERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finish(usize);

impl Finish {
    pub fn rank(&self) -> usize {
        self.0
    }

    /// Interprets free-form finish text. Anything other than a whole number in range (a blank, a
    /// fall or disqualification mark, an out-of-range value) means the finish is absent.
    pub fn parse(text: &str) -> Option<Self> {
        let rank: usize = text.trim().parse().ok()?;
        (1..=MAX_RIDERS).contains(&rank).then_some(Self(rank))
    }
}
