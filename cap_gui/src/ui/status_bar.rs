//! Status Bar (Bottom)
//!
//! Displays:
//! - Current file path
//! - Modified indicator (*)
//! - Lock holder (if read-only)
//! - Workflow stage and status messages

use std::path::PathBuf;

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use crate::Message;

pub fn view_status_bar<'a>(
    current_file: &'a Option<PathBuf>,
    is_modified: bool,
    lock_holder: &'a Option<String>,
    stage: &'static str,
    status: &'a str,
) -> Element<'a, Message> {
    let file_info = match current_file {
        Some(path) => path.display().to_string(),
        None => "Untitled".to_string(),
    };

    let lock_info = match lock_holder {
        Some(holder) => format!(" [Read-only, locked by: {}]", holder),
        None => String::new(),
    };

    let modified_indicator = if is_modified { " *" } else { "" };

    row![
        text(format!("{}{}", file_info, modified_indicator)).size(10),
        text(lock_info).size(10).color([0.6, 0.3, 0.0]),
        Space::new().width(Length::Fill),
        text(format!("Stage: {}", stage)).size(10).color([0.4, 0.4, 0.4]),
        Space::new().width(16),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
