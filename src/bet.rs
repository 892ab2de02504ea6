//! The bet constructor. From the finalised scores it selects an anchor, a second tier and a
//! third-tier pool, and enumerates every triple made of the anchor and two members of the pool.
//!
//! Selection never fails: when a step runs short of candidates, the corresponding part of the
//! [Ticket] is left empty and an [Advisory] explains why.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::advisory::Advisory;
use crate::bonus;
use crate::comb::{count_pairs, push_unique, Pairs};
use crate::line::LinePartition;
use crate::rider::Rider;
use crate::score::Breakdown;
use crate::tunables::SelectionTunables;

/// An unordered combination of three riders, held in ascending rider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Triple([Rider; 3]);

impl Triple {
    pub fn new(a: Rider, b: Rider, c: Rider) -> Self {
        let mut riders = [a, b, c];
        riders.sort();
        Self(riders)
    }

    pub fn riders(&self) -> &[Rider; 3] {
        &self.0
    }

    pub fn contains(&self, rider: Rider) -> bool {
        self.0.contains(&rider)
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Strategies for completing a third-tier pool that came up one short, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// The best rival leader, third leader or line-completion candidate not yet used.
    Contender,
    /// The best rider from the low rating-rank band not yet used.
    LowRank,
}
impl Fallback {
    pub const ORDER: [Fallback; 2] = [Fallback::Contender, Fallback::LowRank];

    fn find(&self, selection: &Selection) -> Option<Rider> {
        let candidates = match self {
            Fallback::Contender => selection.contenders.clone(),
            Fallback::LowRank => selection.field.in_ranks(&selection.cf.low_ranks),
        };
        selection.field.best(
            candidates
                .into_iter()
                .filter(|&rider| rider != selection.anchor && !selection.pool.contains(&rider)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Completion {
    pub fallback: Fallback,
    pub rider: Rider,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ticket {
    pub anchor: Option<Rider>,
    pub primary_line: Option<String>,
    pub rival_line: Option<String>,
    pub third_line: Option<String>,
    pub rival_leader: Option<Rider>,
    pub third_leader: Option<Rider>,
    /// Line-completion candidate.
    pub tertiary: Option<Rider>,
    pub second_tier: Vec<Rider>,
    pub spare: Vec<Rider>,
    pub supporting: Vec<Rider>,
    pub extra: Option<Rider>,
    pub third_tier: Vec<Rider>,
    pub completion: Option<Completion>,
    pub triples: Vec<Triple>,
    pub advisories: Vec<Advisory>,
}

/// Read-only view over the scored riders.
struct Field<'a> {
    breakdowns: &'a [Breakdown],
    by_rider: FxHashMap<Rider, &'a Breakdown>,
}
impl<'a> Field<'a> {
    fn new(breakdowns: &'a [Breakdown]) -> Self {
        Self {
            breakdowns,
            by_rider: breakdowns
                .iter()
                .map(|breakdown| (breakdown.rider, breakdown))
                .collect(),
        }
    }

    fn score(&self, rider: Rider) -> f64 {
        self.by_rider
            .get(&rider)
            .map(|breakdown| breakdown.total())
            .unwrap_or(f64::NEG_INFINITY)
    }

    fn rating_rank(&self, rider: Rider) -> usize {
        self.by_rider
            .get(&rider)
            .map(|breakdown| breakdown.rating_rank)
            .unwrap_or(usize::MAX)
    }

    fn is_scored(&self, rider: Rider) -> bool {
        self.by_rider.contains_key(&rider)
    }

    /// Riders whose rating rank lies in `ranks`, in rider number order.
    fn in_ranks(&self, ranks: &RangeInclusive<usize>) -> Vec<Rider> {
        self.breakdowns
            .iter()
            .filter(|breakdown| ranks.contains(&breakdown.rating_rank))
            .map(|breakdown| breakdown.rider)
            .collect()
    }

    /// Sorts by descending score; equal scores keep their relative order.
    fn sort_descending(&self, riders: &mut [Rider]) {
        riders.sort_by(|&a, &b| self.score(b).total_cmp(&self.score(a)));
    }

    /// The highest-scoring rider, the earliest one on a tie.
    fn best(&self, riders: impl IntoIterator<Item = Rider>) -> Option<Rider> {
        riders.into_iter().fold(None, |best, rider| match best {
            Some(best) if self.score(best) >= self.score(rider) => Some(best),
            _ => Some(rider),
        })
    }
}

/// State carried into the completion fallbacks.
struct Selection<'a> {
    field: &'a Field<'a>,
    cf: &'a SelectionTunables,
    anchor: Rider,
    contenders: Vec<Rider>,
    pool: Vec<Rider>,
}

/// Builds the [Ticket] from finalised `breakdowns` (including the group bonus).
pub fn construct(breakdowns: &[Breakdown], lines: &LinePartition, cf: &SelectionTunables) -> Ticket {
    let field = Field::new(breakdowns);
    let mut ticket = Ticket::default();

    // anchor: the second-lowest scorer among the anchor band
    let mut candidates = field.in_ranks(&cf.anchor_ranks);
    candidates.sort_by(|&a, &b| field.score(a).total_cmp(&field.score(b)));
    debug!("anchor candidates (ascending): {candidates:?}");
    let Some(&anchor) = candidates.get(cf.anchor_pick) else {
        let advisory = Advisory::TooFewAnchorCandidates {
            found: candidates.len(),
            required: cf.anchor_pick + 1,
        };
        warn!("{advisory}");
        ticket.advisories.push(advisory);
        return ticket;
    };
    ticket.anchor = Some(anchor);

    // line classification
    let primary = lines.seat(anchor).map(|seat| seat.line);
    let ranked: Vec<_> = bonus::rank_lines(&bonus::line_sums(breakdowns, lines))
        .into_iter()
        .map(|(line, _)| line)
        .filter(|&line| Some(line) != primary)
        .collect();
    let leader = |line: usize| {
        field.best(
            lines.lines()[line]
                .members
                .iter()
                .copied()
                .filter(|&rider| field.is_scored(rider)),
        )
    };
    ticket.primary_line = lines.line_of(anchor).map(|line| line.label.clone());
    match ranked.first() {
        Some(&rival) => {
            ticket.rival_line = Some(lines.lines()[rival].label.clone());
            ticket.rival_leader = leader(rival);
        }
        None => ticket.advisories.push(Advisory::NoRivalLine),
    }
    match ranked.get(1) {
        Some(&third) => {
            ticket.third_line = Some(lines.lines()[third].label.clone());
            ticket.third_leader = leader(third);
        }
        None => ticket.advisories.push(Advisory::NoThirdLine),
    }

    // line completion: the best-rated partner of the anchor, or the best-rated rider overall
    // when the anchor races alone
    let partners: Vec<_> = primary
        .map(|line| {
            lines.lines()[line]
                .members
                .iter()
                .copied()
                .filter(|&rider| field.is_scored(rider))
                .collect()
        })
        .unwrap_or_default();
    ticket.tertiary = if partners.len() <= 1 {
        breakdowns
            .iter()
            .min_by_key(|breakdown| breakdown.rating_rank)
            .map(|breakdown| breakdown.rider)
    } else {
        partners
            .iter()
            .copied()
            .filter(|&rider| rider != anchor)
            .min_by_key(|&rider| field.rating_rank(rider))
    };

    // second tier and spare
    let mut contenders = vec![];
    for rider in [ticket.rival_leader, ticket.third_leader, ticket.tertiary]
        .into_iter()
        .flatten()
    {
        if rider != anchor {
            push_unique(&mut contenders, rider);
        }
    }
    field.sort_descending(&mut contenders);
    let split = cf.second_tier.min(contenders.len());
    ticket.second_tier = contenders[..split].to_vec();
    ticket.spare = contenders[split..].to_vec();

    // supporting pair from the low band, and the best of the rest of the anchor band
    let mut low = field.in_ranks(&cf.low_ranks);
    field.sort_descending(&mut low);
    low.truncate(cf.supporting_pair);
    ticket.supporting = low;
    ticket.extra = field.best(candidates.iter().copied().filter(|&rider| rider != anchor));

    let mut pool = vec![];
    for &rider in ticket
        .supporting
        .iter()
        .chain(ticket.extra.iter())
        .chain(ticket.spare.iter())
    {
        if rider != anchor {
            push_unique(&mut pool, rider);
        }
    }

    if pool.len() == 3 {
        let selection = Selection {
            field: &field,
            cf,
            anchor,
            contenders,
            pool,
        };
        ticket.completion = complete(&selection);
        pool = selection.pool;
        match ticket.completion {
            Some(completion) => {
                debug!("completed third tier with rider {} via {:?}", completion.rider, completion.fallback);
                pool.push(completion.rider);
            }
            None => {
                let advisory = Advisory::CompletionExhausted { pool: pool.len() };
                warn!("{advisory}");
                ticket.advisories.push(advisory);
            }
        }
    }

    let triples: BTreeSet<_> = Pairs::new(&pool)
        .map(|(&a, &b)| Triple::new(anchor, a, b))
        .collect();
    ticket.triples = triples.into_iter().collect();
    debug_assert_eq!(count_pairs(pool.len()), ticket.triples.len());
    ticket.third_tier = pool;
    debug!("ticket: {ticket:?}");
    ticket
}

/// Tries every [Fallback] in order and keeps the highest-scoring find. An earlier strategy wins
/// a tie.
fn complete(selection: &Selection) -> Option<Completion> {
    let mut best: Option<Completion> = None;
    for fallback in Fallback::ORDER {
        let Some(rider) = fallback.find(selection) else {
            debug!("fallback {fallback:?}: nothing found");
            continue;
        };
        if let Some(current) = best {
            if selection.field.score(current.rider) >= selection.field.score(rider) {
                continue;
            }
        }
        best = Some(Completion { fallback, rider });
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Line;
    use crate::testing::breakdown;
    use crate::tunables::Tunables;

    fn riders(numbers: &[usize]) -> Vec<Rider> {
        numbers.iter().map(|&number| Rider::number(number)).collect()
    }

    fn triples(specs: &[[usize; 3]]) -> Vec<Triple> {
        specs
            .iter()
            .map(|&[a, b, c]| Triple::new(Rider::number(a), Rider::number(b), Rider::number(c)))
            .collect()
    }

    /// Riders numbered from 1 with rating rank equal to their number.
    fn field(totals: &[f64]) -> Vec<Breakdown> {
        totals
            .iter()
            .enumerate()
            .map(|(index, &total)| breakdown(index + 1, index + 1, total))
            .collect()
    }

    fn partition(breakdowns: &[Breakdown], lines: &[&str]) -> LinePartition {
        let active: Vec<_> = breakdowns.iter().map(|breakdown| breakdown.rider).collect();
        LinePartition::new(
            lines
                .iter()
                .enumerate()
                .map(|(index, text)| Line::parse(format!("L{}", index + 1), text))
                .collect(),
            &active,
        )
        .unwrap()
    }

    #[test]
    fn triple_sorted_and_displayed() {
        let triple = Triple::new(Rider::number(7), Rider::number(2), Rider::number(5));
        assert_eq!(&riders(&[2, 5, 7])[..], triple.riders());
        assert_eq!("2-5-7", triple.to_string());
        assert!(triple.contains(Rider::number(5)));
        assert!(!triple.contains(Rider::number(1)));
    }

    #[test]
    fn too_few_anchor_candidates() {
        let breakdowns = field(&[5.0, 4.9]);
        let lines = partition(&breakdowns, &[]);
        let ticket = construct(&breakdowns, &lines, &Tunables::default().selection);
        assert_eq!(None, ticket.anchor);
        assert!(ticket.triples.is_empty());
        assert!(ticket.third_tier.is_empty());
        assert_eq!(
            vec![Advisory::TooFewAnchorCandidates { found: 1, required: 2 }],
            ticket.advisories
        );
    }

    #[test]
    fn exhausted_completion_keeps_three() {
        // anchor band 2, 3, 4 ascending by score: 2 (5.0), 3 (5.2), 4 (5.4); anchor is 3
        let breakdowns = field(&[4.0, 5.0, 5.2, 5.4, 5.3, 5.1]);
        let lines = partition(&breakdowns, &["34", "15", "26"]);
        let ticket = construct(&breakdowns, &lines, &Tunables::default().selection);

        assert_eq!(Some(Rider::number(3)), ticket.anchor);
        assert_eq!(Some("L1".to_string()), ticket.primary_line);
        assert_eq!(Some("L3".to_string()), ticket.rival_line);
        assert_eq!(Some(Rider::number(6)), ticket.rival_leader);
        assert_eq!(Some("L2".to_string()), ticket.third_line);
        assert_eq!(Some(Rider::number(5)), ticket.third_leader);
        assert_eq!(Some(Rider::number(4)), ticket.tertiary);
        assert_eq!(riders(&[4, 5]), ticket.second_tier);
        assert_eq!(riders(&[6]), ticket.spare);
        assert_eq!(riders(&[5, 6]), ticket.supporting);
        assert_eq!(Some(Rider::number(4)), ticket.extra);
        assert_eq!(riders(&[5, 6, 4]), ticket.third_tier);
        assert_eq!(None, ticket.completion);
        assert_eq!(vec![Advisory::CompletionExhausted { pool: 3 }], ticket.advisories);
        assert_eq!(triples(&[[3, 4, 5], [3, 4, 6], [3, 5, 6]]), ticket.triples);
    }

    #[test]
    fn completion_from_low_band() {
        let breakdowns = field(&[4.0, 5.0, 5.2, 5.4, 5.3, 5.1, 4.5]);
        let lines = partition(&breakdowns, &["34", "15", "26"]);
        let ticket = construct(&breakdowns, &lines, &Tunables::default().selection);
        assert_eq!(
            Some(Completion {
                fallback: Fallback::LowRank,
                rider: Rider::number(7)
            }),
            ticket.completion
        );
        assert_eq!(riders(&[5, 6, 4, 7]), ticket.third_tier);
        assert_eq!(6, ticket.triples.len());
        assert!(ticket.advisories.is_empty());
    }

    #[test]
    fn completion_prefers_higher_scoring_contender() {
        // lines: anchor 3 with 4; rival line led by 1 (unused contender); 5 and 6 solo
        let breakdowns = field(&[5.6, 5.0, 5.2, 5.4, 5.3, 5.1, 4.5]);
        let lines = partition(&breakdowns, &["34", "12"]);
        let ticket = construct(&breakdowns, &lines, &Tunables::default().selection);
        assert_eq!(Some(Rider::number(3)), ticket.anchor);
        // lines other than the anchor's, by sum: L2 (10.6), solo 5 (5.3), solo 6 (5.1), solo 7 (4.5)
        assert_eq!(Some(Rider::number(1)), ticket.rival_leader);
        assert_eq!(Some(Rider::number(5)), ticket.third_leader);
        assert_eq!(Some(Rider::number(4)), ticket.tertiary);
        assert_eq!(riders(&[1, 4]), ticket.second_tier);
        assert_eq!(riders(&[5]), ticket.spare);
        assert_eq!(
            Some(Completion {
                fallback: Fallback::Contender,
                rider: Rider::number(1)
            }),
            ticket.completion
        );
        assert_eq!(riders(&[5, 6, 4, 1]), ticket.third_tier);
        for triple in &ticket.triples {
            assert!(triple.contains(Rider::number(3)));
        }
        assert_eq!(6, ticket.triples.len());
    }

    #[test]
    fn single_line_has_no_rivals() {
        let breakdowns = field(&[5.6, 5.0, 5.2, 5.4, 5.3]);
        let lines = partition(&breakdowns, &["12345"]);
        let ticket = construct(&breakdowns, &lines, &Tunables::default().selection);
        assert_eq!(Some(Rider::number(3)), ticket.anchor);
        assert_eq!(None, ticket.rival_leader);
        assert_eq!(None, ticket.third_leader);
        assert_eq!(Some(Rider::number(1)), ticket.tertiary);
        assert!(ticket.advisories.contains(&Advisory::NoRivalLine));
        assert!(ticket.advisories.contains(&Advisory::NoThirdLine));
        assert_eq!(riders(&[1]), ticket.second_tier);
        assert!(ticket.spare.is_empty());
        // supporting is 5 alone, extra is 4; the pool of two is not completed
        assert_eq!(riders(&[5, 4]), ticket.third_tier);
        assert_eq!(triples(&[[3, 4, 5]]), ticket.triples);
    }

    #[test]
    fn deterministic() {
        let breakdowns = field(&[5.6, 5.0, 5.2, 5.4, 5.3, 5.1, 4.5, 4.8, 4.9]);
        let lines = partition(&breakdowns, &["137", "25", "468"]);
        let cf = Tunables::default().selection;
        let first = construct(&breakdowns, &lines, &cf);
        let second = construct(&breakdowns, &lines, &cf);
        assert_eq!(first, second);
        assert!(!first.triples.is_empty());
    }
}
