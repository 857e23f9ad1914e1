//! Result phase: realtime listener
//!
//! Transport controls plus the note timeline. Highlighting state (active
//! rows, position) is computed by the tick handler; this module only
//! renders it.

use iced::widget::{button, column, container, row, scrollable, slider, text, Id, Space};
use iced::{Alignment, Element, Length};

use stave_core::NoteEvent;

use super::app::ListenerState;
use super::message::Message;
use super::theme;

/// Fixed height of one note row, used for auto-scroll offset math.
pub const NOTE_ROW_HEIGHT: f32 = 26.0;
/// Rows visible in the timeline viewport.
pub const VISIBLE_ROWS: f32 = 10.0;

/// Selectable playback rates, matching the original player.
const RATES: [f64; 5] = [0.5, 0.75, 1.0, 1.25, 1.5];

/// Scroll container id for the note timeline.
pub fn note_list_id() -> Id {
    Id::new("note-timeline")
}

/// mm:ss display of a position in seconds.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render the listener card.
pub fn view<'a>(listener: &'a ListenerState, playing: bool, limit: usize) -> Element<'a, Message> {
    let controls = view_controls(listener, playing);
    let timeline = view_timeline(listener, limit);

    container(
        column![text("Realtime listening").size(18), controls, timeline].spacing(12),
    )
    .style(theme::card)
    .padding(16)
    .width(Length::Fill)
    .into()
}

fn view_controls(listener: &ListenerState, playing: bool) -> Element<'_, Message> {
    let loaded = listener.transport.is_loaded();

    let toggle = if playing {
        button(text("▮▮").size(16))
    } else {
        button(text("▶").size(16))
    };
    let toggle = toggle
        .on_press_maybe(loaded.then_some(Message::TogglePlayback))
        .width(Length::Fixed(52.0))
        .style(if playing { button::primary } else { button::secondary });

    let position = text(format_time(listener.position)).size(13);
    let duration = text(format_time(listener.duration)).size(13).color(theme::DIMMED);

    let seek = slider(
        0.0..=listener.duration.max(0.1),
        listener.position,
        Message::Seek,
    )
    .step(0.1)
    .width(Length::Fill);

    let mut rates = row![].spacing(4);
    for rate in RATES {
        rates = rates.push(
            button(text(format!("{rate}x")).size(11))
                .on_press(Message::SetRate(rate))
                .padding([4, 8])
                .style(if (listener.rate - rate).abs() < f64::EPSILON {
                    button::primary
                } else {
                    button::secondary
                }),
        );
    }

    let mut controls = column![
        row![toggle, position, seek, duration, rates]
            .spacing(10)
            .align_y(Alignment::Center),
    ]
    .spacing(6);

    // Next-up hint while paused or between phrases.
    if let Some(index) = &listener.index {
        if let Some(next) = index.upcoming_within(listener.position, 2.0).first() {
            controls = controls.push(
                text(format!(
                    "Next: {} at {}",
                    next.name,
                    format_time(next.start)
                ))
                .size(11)
                .color(theme::DIMMED),
            );
        }
    }

    controls.into()
}

fn view_timeline(listener: &ListenerState, limit: usize) -> Element<'_, Message> {
    let Some(index) = &listener.index else {
        return text("Loading notes...").size(13).color(theme::DIMMED).into();
    };
    if index.is_empty() {
        return text("No notes available for this track")
            .size(13)
            .color(theme::DIMMED)
            .into();
    }

    let header = row![
        container(text("Time").size(11).color(theme::DIMMED)).width(Length::Fixed(64.0)),
        container(text("Note").size(11).color(theme::DIMMED)).width(Length::Fill),
        container(text("Length").size(11).color(theme::DIMMED)).width(Length::Fixed(72.0)),
    ]
    .spacing(8);

    let mut rows = column![];
    for (i, note) in index.notes().iter().take(limit).enumerate() {
        rows = rows.push(view_note_row(note, i, listener));
    }

    let mut timeline = column![
        header,
        scrollable(rows)
            .id(note_list_id())
            .height(Length::Fixed(NOTE_ROW_HEIGHT * VISIBLE_ROWS)),
    ]
    .spacing(6);

    if index.len() > limit {
        timeline = timeline.push(
            text(format!("+ {} more notes", index.len() - limit))
                .size(11)
                .color(theme::DIMMED),
        );
    }

    timeline.into()
}

fn view_note_row<'a>(
    note: &'a NoteEvent,
    row_index: usize,
    listener: &'a ListenerState,
) -> Element<'a, Message> {
    let is_active = listener.active.contains(&row_index);
    let is_past = note.is_past(listener.position);

    let length_ms = ((note.end - note.start) * 1000.0).round() as i64;

    let (time_text, name_text, length_text) = if is_past && !is_active {
        (
            text(format_time(note.start)).size(12).color(theme::DIMMED),
            text(&note.name).size(12).color(theme::DIMMED),
            text(format!("{length_ms}ms")).size(12).color(theme::DIMMED),
        )
    } else {
        (
            text(format_time(note.start)).size(12),
            text(&note.name).size(12),
            text(format!("{length_ms}ms")).size(12),
        )
    };

    let content = row![
        container(time_text).width(Length::Fixed(64.0)),
        container(name_text).width(Length::Fill),
        container(length_text).width(Length::Fixed(72.0)),
        Space::new().width(Length::Fixed(4.0)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let cell = container(content)
        .height(Length::Fixed(NOTE_ROW_HEIGHT))
        .padding([2, 6])
        .width(Length::Fill);

    if is_active {
        cell.style(theme::note_row_active).into()
    } else {
        cell.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.7), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
