//! Input view for session information
//!
//! Displays fields for Engineer, Job ID, and Client.

use iced::widget::{column, row, text, text_input, Column};
use iced::{Alignment, Element, Length};

use cap_core::session::SessionMetadata;

use crate::Message;

pub fn view(meta: &SessionMetadata) -> Column<'_, Message> {
    column![
        text("Session").size(14),
        labeled_input("Engineer:", &meta.engineer, Message::EngineerChanged),
        labeled_input("Job ID:", &meta.job_id, Message::JobIdChanged),
        labeled_input("Client:", &meta.client, Message::ClientChanged),
    ]
    .spacing(6)
}

fn labeled_input<'a>(
    label: &'a str,
    value: &'a str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(80.0)),
        text_input("", value)
            .on_input(on_change)
            .width(Length::Fill)
            .padding(4)
            .size(11),
    ]
    .align_y(Alignment::Center)
    .into()
}
