//! The line bonus engine. Lines are ranked by the summed score of their members, each is awarded
//! one value of a descending bonus curve, and the award is folded back into every member's total as
//! the [Group](Factor::Group) term.
//!
//! This is necessarily a second pass: a line's bonus depends on the already computed scores of all
//! its members.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::line::LinePartition;
use crate::score::{Breakdown, Factor};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBonus {
    pub label: String,
    /// Index of the line within its [LinePartition].
    #[serde(skip)]
    pub line: usize,
    /// Summed member score before the bonus was applied.
    pub sum: f64,
    pub bonus: f64,
}

/// Sums the current totals of the scored members of every line, aligned with
/// [LinePartition::lines]. Lines with no scored members have no sum.
pub fn line_sums(breakdowns: &[Breakdown], lines: &LinePartition) -> Vec<Option<f64>> {
    let totals: FxHashMap<_, _> = breakdowns
        .iter()
        .map(|breakdown| (breakdown.rider, breakdown.total()))
        .collect();
    lines
        .lines()
        .iter()
        .map(|line| {
            line.members
                .iter()
                .filter_map(|rider| totals.get(rider))
                .fold(None, |sum, &total| Some(sum.unwrap_or(0.0) + total))
        })
        .collect()
}

/// Indexes of the lines that have scored members, ordered by descending sum. Lines with equal sums
/// keep their partition order.
pub fn rank_lines(sums: &[Option<f64>]) -> Vec<(usize, f64)> {
    let mut ranked: Vec<_> = sums
        .iter()
        .enumerate()
        .filter_map(|(index, sum)| sum.map(|sum| (index, sum)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked
}

/// Awards `curve` to the lines in rank order and applies each award to the members of the line.
/// Returns the awards in rank order.
pub fn apply(breakdowns: &mut [Breakdown], lines: &LinePartition, curve: &[f64]) -> Vec<LineBonus> {
    let ranked = rank_lines(&line_sums(breakdowns, lines));
    let awards: Vec<_> = ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (line, sum))| {
            let bonus = curve.get(rank).copied().unwrap_or_default();
            let label = lines.lines()[line].label.clone();
            debug!("line '{label}' ranked {}: sum {sum:.3}, bonus {bonus}", rank + 1);
            LineBonus {
                label,
                line,
                sum,
                bonus,
            }
        })
        .collect();

    let by_line: FxHashMap<_, _> = awards.iter().map(|award| (award.line, award.bonus)).collect();
    for breakdown in breakdowns.iter_mut() {
        let bonus = lines
            .seat(breakdown.rider)
            .and_then(|seat| by_line.get(&seat.line))
            .copied()
            .unwrap_or_default();
        breakdown.set(Factor::Group, bonus);
    }
    awards
}
