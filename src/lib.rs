//! Keirin line-race prediction. Scores every rider with an itemised sum of track, form and
//! formation adjustments, rewards strong lines with a group bonus, and constructs a set of
//! trifecta-box triples around a chosen anchor.

pub mod adjust;
pub mod advisory;
pub mod bet;
pub mod bonus;
pub mod comb;
pub mod error;
pub mod file;
pub mod intake;
pub mod line;
pub mod predict;
pub mod print;
pub mod race;
pub mod rank;
pub mod rider;
pub mod score;
pub mod style;
pub mod timed;
pub mod track;
pub mod tunables;
pub mod venue;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
