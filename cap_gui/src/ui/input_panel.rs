//! Input Panel (Left)
//!
//! Session info, the design input tables, the reaction table and the
//! buttons that drive each workflow step.

use iced::widget::{button, column, container, row, rule, scrollable, text, text_input, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use cap_core::workflow::WorkflowStage;

use crate::form::{DesignForm, FormField, FormSection};
use crate::{App, Message};
use super::{input_project_info, reaction_table};

/// Render the input panel. `ratio` is this panel's share of the window width.
pub fn view_input_panel(app: &App, ratio: f32) -> Element<'_, Message> {
    let sections = FormSection::ALL
        .iter()
        .fold(column![].spacing(12), |col, section| col.push(view_section(&app.form, *section)));

    let total = app
        .form
        .total_piles()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());

    let idle = app.busy.is_none();
    let has_coordinates = app.workflow.stage() != WorkflowStage::Idle;

    let check = step_button("Calculate", idle.then_some(Message::CheckDesign));
    let generate = step_button("Generate Pile Coordinates", idle.then_some(Message::GenerateCoordinates));
    let forces = step_button(
        "Calculate Pile Forces (Pmax/Pmin)",
        (idle && has_coordinates).then_some(Message::CalculateForces),
    );
    let advanced = step_button(
        "Calculate Advanced Pile Cap Design",
        (idle && has_coordinates).then_some(Message::CalculateAdvanced),
    );

    let panel: Column<'_, Message> = column![
        input_project_info::view(&app.session.meta),
        rule::horizontal(1),
        text("Design Inputs").size(16),
        sections,
        row![
            text("Total Number of Piles").size(11).width(Length::Fixed(200.0)),
            text(total).size(11),
        ],
        Space::new().height(6),
        row![check, generate].spacing(8),
        rule::horizontal(1),
        reaction_table::view(&app.reactions),
        Space::new().height(6),
        forces,
        advanced,
    ]
    .spacing(8);

    let portion = (ratio * 100.0) as u16;

    container(scrollable(panel.padding(8)))
        .width(Length::FillPortion(portion))
        .style(container::bordered_box)
        .padding(5)
        .into()
}

fn view_section(form: &DesignForm, section: FormSection) -> Column<'_, Message> {
    let header = row![
        text("Parameter").size(10).width(Length::Fixed(200.0)),
        text("Value").size(10).width(Length::Fixed(100.0)),
        text("Unit").size(10),
    ]
    .spacing(6);

    FormField::ALL
        .iter()
        .filter(|field| field.section() == section)
        .fold(
            column![text(section.title()).size(13), header, rule::horizontal(1)].spacing(4),
            |col, field| col.push(labeled_input(form, *field)),
        )
}

fn labeled_input(form: &DesignForm, field: FormField) -> Element<'_, Message> {
    let (label, unit) = field.label();
    row![
        text(label).size(11).width(Length::Fixed(200.0)),
        text_input("", form.text(field))
            .on_input(move |s| Message::FormChanged(field, s))
            .width(Length::Fixed(100.0))
            .padding(3)
            .size(11),
        text(unit).size(10).color([0.5, 0.5, 0.5]),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

fn step_button(label: &'static str, message: Option<Message>) -> Element<'static, Message> {
    button(text(label).size(12))
        .on_press_maybe(message)
        .padding(Padding::from([6, 12]))
        .style(button::primary)
        .into()
}
