//! Console tables.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};
use strum::IntoEnumIterator;

use crate::advisory::Advisory;
use crate::bet::Ticket;
use crate::bonus::LineBonus;
use crate::rider::Rider;
use crate::score::{Breakdown, Factor};

pub fn tabulate_ranking(ranking: &[Breakdown]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![
                Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Centred)),
                Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Centred)),
                Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Left)),
                Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Left)),
                Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Centred)),
                Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Right)),
            ];
            for _ in Factor::iter() {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(7)).with(HAlign::Right),
                ));
            }
            cols.push(Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(8))
                    .with(HAlign::Right),
            ));
            cols
        })
        .with_row({
            let mut header_cells = vec![
                "Rank".into(),
                "Rider".into(),
                "Style".into(),
                "Line".into(),
                "Pos".into(),
                "Rating".into(),
            ];
            for factor in Factor::iter() {
                header_cells.push(format!("{factor}").into());
            }
            header_cells.push("Total".into());
            Row::new(Styles::default().with(Header(true)), header_cells)
        });

    for (rank, breakdown) in ranking.iter().enumerate() {
        let mut row_cells = vec![
            format!("{}", rank + 1).into(),
            format!("{}", breakdown.rider).into(),
            format!("{}", breakdown.style).into(),
            breakdown.line.clone().into(),
            format!("{}", breakdown.position).into(),
            format!("{:.1} ({})", breakdown.rating, breakdown.rating_rank).into(),
        ];
        for (_, delta) in breakdown.deltas() {
            row_cells.push(format!("{delta:.3}").into());
        }
        row_cells.push(format!("{:.3}", breakdown.total()).into());
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_line_bonuses(line_bonuses: &[LineBonus]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Rank".into(), "Line".into(), "Sum".into(), "Bonus".into()],
        ));
    for (rank, award) in line_bonuses.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", rank + 1).into(),
                award.label.clone().into(),
                format!("{:.3}", award.sum).into(),
                format!("{:.2}", award.bonus).into(),
            ],
        ));
    }
    table
}

fn riders(riders: &[Rider]) -> String {
    riders
        .iter()
        .map(Rider::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn rider(rider: Option<Rider>) -> String {
    rider.map(|rider| rider.to_string()).unwrap_or_else(|| "-".into())
}

fn pair(label: &str, value: String) -> Row {
    Row::new(Styles::default(), vec![label.into(), value.into()])
}

/// Tabulates the selection, the triples and any advisories.
pub fn tabulate_ticket<'a>(ticket: &Ticket, advisories: impl IntoIterator<Item = &'a Advisory>) -> Table {
    let label = |line: &Option<String>| line.clone().unwrap_or_else(|| "-".into());
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(18)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(30)).with(HAlign::Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Selection".into(), "".into()],
        ))
        .with_row(pair("Anchor", rider(ticket.anchor)))
        .with_row(pair(
            "Lines",
            format!(
                "primary {}, rival {}, third {}",
                label(&ticket.primary_line),
                label(&ticket.rival_line),
                label(&ticket.third_line)
            ),
        ))
        .with_row(pair("Second tier", riders(&ticket.second_tier)))
        .with_row(pair("Third tier", riders(&ticket.third_tier)));
    if let Some(completion) = ticket.completion {
        table.push_row(pair(
            "Completed with",
            format!("{} ({:?})", completion.rider, completion.fallback),
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Header(true)).with(Separator(true)),
        vec![format!("Triples ({})", ticket.triples.len()).into(), "".into()],
    ));
    for triple in &ticket.triples {
        table.push_row(pair("", triple.to_string()));
    }
    let mut advisories = advisories.into_iter().peekable();
    if advisories.peek().is_some() {
        table.push_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["Advisories".into(), "".into()],
        ));
        for advisory in advisories {
            table.push_row(pair("", advisory.to_string()));
        }
    }
    table
}
