//! Results Panel (Right Side)
//!
//! The plan drawing is always shown. The design check and the tables
//! appear once their request has produced results.

use iced::widget::{column, container, rule, scrollable, Column, Space};
use iced::{Element, Length};

use crate::{App, Message};
use super::{result_plan, result_tables};

/// Render the results panel.
///
/// The `input_ratio` parameter is the ratio used by the input panel.
/// This panel uses the complementary ratio (1 - input_ratio).
pub fn view_results_panel(app: &App, input_ratio: f32) -> Element<'_, Message> {
    let mut content: Column<'_, Message> = column![].spacing(8);

    if let Some(check) = &app.design_check {
        content = content
            .push(result_tables::view_design_check(check))
            .push(rule::horizontal(1));
    }
    content = content.push(result_plan::view(app));

    if let Some(forces) = app.workflow.forces() {
        content = content
            .push(rule::horizontal(1))
            .push(result_tables::view_force_table(&forces.piles))
            .push(Space::new().height(8))
            .push(result_tables::view_breakdowns(&forces.piles));

        if let Some(calc) = &forces.footing_calculations {
            content = content
                .push(rule::horizontal(1))
                .push(result_tables::view_footing(calc));
        }
        if let Some(check) = &forces.shear_check {
            content = content.push(result_tables::view_shear(check));
        }
    }

    if let Some(design) = app.workflow.advanced() {
        content = content
            .push(rule::horizontal(1))
            .push(result_tables::view_advanced(design));
    }

    // Use complementary ratio (scale to 0-100 for better precision)
    let portion = ((1.0 - input_ratio) * 100.0) as u16;

    container(scrollable(content.padding(8)))
        .width(Length::FillPortion(portion))
        .style(container::bordered_box)
        .padding(5)
        .into()
}
