//! End-to-end prediction: scores every active rider, applies the line bonus and constructs the
//! ticket.

use serde::Serialize;
use tracing::debug;

use crate::advisory::Advisory;
use crate::bet::{self, Ticket};
use crate::bonus::{self, LineBonus};
use crate::race::Race;
use crate::score::{self, Breakdown};
use crate::timed::Timed;
use crate::tunables::Tunables;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Breakdowns in descending order of total.
    pub ranking: Vec<Breakdown>,
    /// Line awards in rank order.
    pub line_bonuses: Vec<LineBonus>,
    pub ticket: Ticket,
    /// Intake-level advisories. Selection advisories are carried by the [Ticket].
    pub advisories: Vec<Advisory>,
}
impl Prediction {
    pub fn all_advisories(&self) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().chain(self.ticket.advisories.iter())
    }
}

/// Holds a validated set of [Tunables] and runs predictions against it. Holds no per-race state.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictor {
    tunables: Tunables,
}
impl Predictor {
    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn predict(&self, race: &Race) -> Prediction {
        let Timed { value, elapsed } = Timed::of(|| {
            let advisories: Vec<_> = race
                .excluded()
                .map(|rider| Advisory::Excluded { rider })
                .collect();
            let mut breakdowns = score::aggregate(race, &self.tunables);
            let line_bonuses = bonus::apply(&mut breakdowns, race.lines(), &self.tunables.line_bonus);
            let ticket = bet::construct(&breakdowns, race.lines(), &self.tunables.selection);
            score::sort_descending(&mut breakdowns);
            Prediction {
                ranking: breakdowns,
                line_bonuses,
                ticket,
                advisories,
            }
        });
        debug!("prediction took {elapsed:?}");
        value
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self {
            tunables: Tunables::default(),
        }
    }
}

impl TryFrom<Tunables> for Predictor {
    type Error = anyhow::Error;

    fn try_from(tunables: Tunables) -> Result<Self, Self::Error> {
        tunables.validate()?;
        Ok(Self { tunables })
    }
}
