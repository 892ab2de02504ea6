//! Advisories: conditions that reduce or empty the result without failing the computation.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::rider::Rider;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The rider has no queue position and takes no part in the computation.
    Excluded { rider: Rider },
    /// Too few riders in the anchor band to pick an anchor; no bets are constructed.
    TooFewAnchorCandidates { found: usize, required: usize },
    NoRivalLine,
    NoThirdLine,
    /// The third-tier pool had to be completed but neither fallback had a candidate left.
    CompletionExhausted { pool: usize },
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::Excluded { rider } => {
                write!(f, "rider {rider} has no queue position and was excluded")
            }
            Advisory::TooFewAnchorCandidates { found, required } => write!(
                f,
                "{found} anchor candidate(s) found, at least {required} required; no bets constructed"
            ),
            Advisory::NoRivalLine => write!(f, "no rival line"),
            Advisory::NoThirdLine => write!(f, "no third line"),
            Advisory::CompletionExhausted { pool } => write!(
                f,
                "no fallback candidate to complete the third tier; betting on {pool} candidates"
            ),
        }
    }
}
