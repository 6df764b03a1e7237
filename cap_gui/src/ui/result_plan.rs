//! Pile plan view
//!
//! Shows:
//! - Plan drawing (column, footing outline, piles, dimensions)
//! - Zoom controls
//! - Legend and drawing details

use iced::widget::{button, column, row, text, Canvas, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use cap_core::report::DrawingDetails;
use cap_core::scene::{build_scene, SceneInput};
use cap_core::viewport::PointerEvent;

use crate::{App, Message};
use super::shared::pile_canvas::{view_legend, PilePlan};

pub fn view(app: &App) -> Column<'_, Message> {
    let piles = app.workflow.display_piles();
    let (column_geometry, overhang) = app.form.drawing_geometry();
    let viewport = &app.interaction.viewport;

    let scene = build_scene(&SceneInput {
        piles,
        column: column_geometry,
        overhang,
        hovered: app.interaction.hovered,
        viewport,
        show_forces: app.workflow.forces().is_some(),
    });
    let plan = PilePlan::new(scene, viewport.is_dragging(), app.interaction.hovered.is_some());

    let canvas: Element<'_, Message> = Canvas::new(plan)
        .width(Length::Fixed(viewport.canvas.width as f32))
        .height(Length::Fixed(viewport.canvas.height as f32))
        .into();

    let zoom = row![
        zoom_button("+", PointerEvent::ZoomIn),
        zoom_button("-", PointerEvent::ZoomOut),
        zoom_button("Reset", PointerEvent::Reset),
        Space::new().width(8),
        text(format!("{:.0}%", viewport.zoom * 100.0)).size(10),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let details = DrawingDetails::new(piles, column_geometry, overhang, viewport)
        .lines()
        .into_iter()
        .fold(column![text("Drawing Details").size(12)].spacing(2), |col, line| {
            col.push(text(line).size(10))
        });

    column![
        text("Pile Layout").size(14),
        zoom,
        canvas,
        row![view_legend(), Space::new().width(24), details],
    ]
    .spacing(6)
}

fn zoom_button(label: &'static str, event: PointerEvent) -> Element<'static, Message> {
    button(text(label).size(11))
        .on_press(Message::Pointer(event))
        .padding(Padding::from([2, 8]))
        .style(button::secondary)
        .into()
}
