//! Tabular results
//!
//! Pile force table, per-pile load case breakdowns, and the footing, shear
//! and advanced design summaries. Formatting lives in `cap_core::report`;
//! this module only lays the cells out.

use iced::widget::{column, row, rule, text, Column, Row, Space};
use iced::{Element, Length};
use serde_json::Value;

use cap_core::pile::PileCoordinate;
use cap_core::report::{
    advanced_summary, design_check_summary, footing_summary, force_table, pile_breakdowns, shear_summary,
    SummaryRow, BREAKDOWN_HEADINGS, FORCE_TABLE_HEADINGS,
};
use cap_core::service::DesignCheck;

use crate::Message;

const CELL_WIDTH: f32 = 78.0;
const HIGH_COLOR: [f32; 3] = [0.85, 0.35, 0.1];
const TENSION_COLOR: [f32; 3] = [0.15, 0.35, 0.8];

fn heading_row<'a>(headings: &[&'a str]) -> Row<'a, Message> {
    headings
        .iter()
        .fold(row![].spacing(4), |r, h| r.push(text(*h).size(10).width(Length::Fixed(CELL_WIDTH))))
}

fn notice(message: Option<&'static str>) -> Element<'static, Message> {
    match message {
        Some(m) => text(m).size(10).color([0.8, 0.5, 0.0]).into(),
        None => Space::new().height(0).into(),
    }
}

pub fn view_force_table(piles: &[PileCoordinate]) -> Column<'_, Message> {
    let table = force_table(piles);

    let rows = table.rows.into_iter().fold(column![].spacing(2), |col, force_row| {
        let color = if force_row.tension {
            Some(TENSION_COLOR)
        } else if force_row.high {
            Some(HIGH_COLOR)
        } else {
            None
        };
        let cells = force_row.cells.into_iter().fold(row![].spacing(4), |r, cell| {
            let cell = text(cell).size(10).width(Length::Fixed(CELL_WIDTH));
            r.push(match color {
                Some(c) => cell.color(c),
                None => cell,
            })
        });
        col.push(cells)
    });

    column![
        text("Pile Forces").size(14),
        notice(table.notice),
        heading_row(&FORCE_TABLE_HEADINGS),
        rule::horizontal(1),
        rows,
    ]
    .spacing(4)
}

pub fn view_breakdowns(piles: &[PileCoordinate]) -> Column<'_, Message> {
    let breakdowns = pile_breakdowns(piles);

    let mut content = column![text("Load Case Breakdown").size(14), notice(breakdowns.notice)].spacing(4);
    for pile in breakdowns.rows {
        let rows = pile.rows.into_iter().fold(column![].spacing(1), |col, cells| {
            col.push(
                cells
                    .into_iter()
                    .fold(row![].spacing(4), |r, c| r.push(text(c).size(10).width(Length::Fixed(CELL_WIDTH)))),
            )
        });
        content = content
            .push(Space::new().height(4))
            .push(text(pile.title).size(11))
            .push(heading_row(&BREAKDOWN_HEADINGS))
            .push(rows);
    }
    content
}

fn summary(title: &'static str, rows: Vec<SummaryRow>) -> Column<'static, Message> {
    rows.into_iter().fold(column![text(title).size(14)].spacing(3), |col, r| {
        let line = row![
            text(r.label).size(11).width(Length::Fixed(260.0)),
            text(r.value).size(11),
        ]
        .spacing(6);
        match r.formula {
            Some(formula) => col.push(column![line, text(formula).size(9).color([0.45, 0.45, 0.45])]),
            None => col.push(line),
        }
    })
}

pub fn view_design_check(check: &DesignCheck) -> Column<'static, Message> {
    summary("Design Check", design_check_summary(check))
}

pub fn view_footing(calc: &Value) -> Column<'static, Message> {
    summary("Footing Calculations", footing_summary(calc))
}

pub fn view_shear(check: &Value) -> Column<'static, Message> {
    summary("Shear Check", shear_summary(check))
}

pub fn view_advanced(design: &Value) -> Column<'static, Message> {
    summary("Advanced Pile Cap Design", advanced_summary(design))
}
