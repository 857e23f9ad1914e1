//! Result phase: generated score card

use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Element, Length};

use stave_core::StatusStore;

use super::app::ListenerState;
use super::message::Message;
use super::theme;

/// Render the score card with the export action.
pub fn view<'a>(store: &'a StatusStore, listener: &'a ListenerState) -> Element<'a, Message> {
    let mut heading = column![text("Score ready").size(18)].spacing(2);
    if let Some(title) = store.title() {
        heading = heading.push(text(title).size(13).color(theme::DIMMED));
    }

    let save = button(text("Save PDF").size(14))
        .on_press(Message::SavePdf)
        .style(button::primary);

    let mut card = column![
        row![heading, Space::new().width(Length::Fill), save]
            .spacing(10)
            .align_y(Alignment::Center),
    ]
    .spacing(8);

    if !listener.sheet_status.is_empty() {
        card = card.push(text(&listener.sheet_status).size(12).color(theme::DIMMED));
    }

    container(card)
        .style(theme::card)
        .padding(16)
        .width(Length::Fill)
        .into()
}
