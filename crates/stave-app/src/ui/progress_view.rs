//! Processing phase: pipeline progress display
//!
//! Driven entirely by the status store: the overall percentage comes from
//! the latest accepted update and the three step rows are re-derived from
//! the display stage on every render.

use iced::widget::{column, container, progress_bar, row, text, Space};
use iced::{Alignment, Element, Length};

use stave_core::{step_state, StatusStore, StepState, STEPS};

use super::message::Message;
use super::theme;

/// Render the progress card.
pub fn view(store: &StatusStore) -> Element<'_, Message> {
    let mut header = column![text("Processing...").size(18)].spacing(2);
    if let Some(title) = store.title() {
        header = header.push(text(title).size(13).color(theme::DIMMED));
    }

    let bar = progress_bar(0.0..=100.0, f32::from(store.progress())).girth(Length::Fixed(10.0));
    let percent = text(format!("{}%", store.progress())).size(13).color(theme::DIMMED);

    let mut steps = column![].spacing(10);
    for (number, step) in STEPS.iter().enumerate() {
        steps = steps.push(view_step(
            number + 1,
            step.label,
            step_state(store.display_stage(), step),
        ));
    }

    container(
        column![
            header,
            bar,
            container(percent).center_x(Length::Fill),
            steps,
        ]
        .spacing(12),
    )
    .style(theme::card)
    .padding(16)
    .width(Length::Fill)
    .into()
}

fn view_step(number: usize, label: &str, state: StepState) -> Element<'_, Message> {
    let indicator: Element<'_, Message> = match state {
        StepState::Done => text("✓").size(15).color(theme::DONE).into(),
        StepState::Active => text("●").size(15).color(theme::ACCENT).into(),
        StepState::Pending => text(number.to_string()).size(13).color(theme::DIMMED).into(),
    };

    let label = match state {
        StepState::Pending => text(label).size(14).color(theme::DIMMED),
        _ => text(label).size(14),
    };

    row![
        container(indicator).width(Length::Fixed(26.0)),
        label,
        Space::new().width(Length::Fill),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
