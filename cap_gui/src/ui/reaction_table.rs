//! Reaction table editor
//!
//! One row per load case. Pasting into a cell reads the clipboard and
//! spreads tab-separated text across the row and the rows below it.

use iced::widget::{button, column, row, rule, text, text_input, Column, Row, Space};
use iced::{Alignment, Element, Length, Padding};

use cap_core::reactions::{ReactionField, ReactionTable};

use crate::Message;

const LOAD_CASE_WIDTH: f32 = 120.0;
const NUMBER_WIDTH: f32 = 62.0;

fn column_width(field: ReactionField) -> Length {
    if field == ReactionField::LoadCase {
        Length::Fixed(LOAD_CASE_WIDTH)
    } else {
        Length::Fixed(NUMBER_WIDTH)
    }
}

pub fn view(table: &ReactionTable) -> Column<'_, Message> {
    let header: Row<'_, Message> = ReactionField::ALL
        .iter()
        .fold(row![text("#").size(10).width(Length::Fixed(20.0))], |header, field| {
            header.push(text(field.heading()).size(10).width(column_width(*field)))
        })
        .spacing(4)
        .align_y(Alignment::Center);

    let mut rows: Column<'_, Message> = column![].spacing(4);
    for (i, _) in table.rows().iter().enumerate() {
        let mut cells: Row<'_, Message> = row![text(format!("{}.", i + 1)).size(10).width(Length::Fixed(20.0))]
            .spacing(4)
            .align_y(Alignment::Center);

        for field in ReactionField::ALL {
            let value = table.cell_text(i, field);
            let cell: Element<'_, Message> = if table.editing {
                let placeholder = if field == ReactionField::LoadCase { "Load case" } else { "0" };
                text_input(placeholder, &value)
                    .on_input(move |s| Message::ReactionCellChanged(i, field, s))
                    .on_paste(move |_| Message::ReactionPasteRequested(i, field))
                    .width(column_width(field))
                    .padding(2)
                    .size(10)
                    .into()
            } else {
                text(value).size(10).width(column_width(field)).into()
            };
            cells = cells.push(cell);
        }
        rows = rows.push(cells);
    }

    let edit_label = if table.editing { "View" } else { "Edit" };
    let actions = row![
        button(text("+ Add Row").size(10))
            .on_press_maybe(table.editing.then_some(Message::AddReactionRow))
            .padding(Padding::from([4, 8])),
        button(text("Clear").size(10))
            .on_press_maybe(table.editing.then_some(Message::ClearReactions))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text(edit_label).size(10))
            .on_press(Message::ToggleReactionEditing)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        Space::new().width(Length::Fill),
        button(text("Save Load Combinations").size(10))
            .on_press(Message::SaveReactions)
            .padding(Padding::from([4, 8]))
            .style(button::primary),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let saved_note = if table.is_saved() {
        text("Saved to the calculation service").size(10).color([0.2, 0.6, 0.2])
    } else {
        text("Not saved").size(10).color([0.5, 0.5, 0.5])
    };

    column![
        text("Reaction Table (Load Combinations)").size(14),
        text("Paste rows copied from a spreadsheet into any cell.").size(10).color([0.5, 0.5, 0.5]),
        Space::new().height(4),
        header,
        rule::horizontal(1),
        rows,
        Space::new().height(4),
        actions,
        saved_note,
    ]
    .spacing(2)
}
