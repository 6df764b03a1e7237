//! Toolbar component
//!
//! Session file operations (New, Open, Save, Save As) and the label of the
//! request in flight.

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use crate::Message;

/// Render the application header with title (owned)
pub fn view_header_owned(window_title: String) -> Element<'static, Message> {
    row![
        text("Pile Cap Design").size(24),
        Space::new().width(Length::Fill),
        text(window_title).size(12),
    ]
    .align_y(Alignment::Center)
    .into()
}

pub fn view_toolbar(busy: Option<&'static str>) -> Element<'static, Message> {
    let file_button = |label: &'static str, message: Message| {
        button(text(label).size(11))
            .on_press(message)
            .padding(Padding::from([4, 8]))
            .style(button::secondary)
    };

    let file_buttons = row![
        file_button("New", Message::NewSession),
        file_button("Open", Message::OpenSession),
        file_button("Save", Message::SaveSession),
        file_button("Save As", Message::SaveSessionAs),
    ]
    .spacing(4);

    row![
        file_buttons,
        Space::new().width(Length::Fill),
        text(busy.unwrap_or("")).size(11).color([0.4, 0.4, 0.6]),
    ]
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
