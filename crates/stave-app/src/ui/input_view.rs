//! Input phase: video link, instrument choice, submit

use std::sync::OnceLock;

use iced::widget::{button, column, container, image, row, text, text_input};
use iced::{Alignment, Element, Length};
use regex::Regex;

use super::app::InputState;
use super::message::Message;
use super::theme;

/// One selectable instrument. Ids are the backend's vocabulary and go out
/// on the wire verbatim.
pub struct Instrument {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Instruments the backend can transcribe for.
pub const INSTRUMENTS: [Instrument; 8] = [
    Instrument { id: "piano", label: "Piano", icon: "🎹" },
    Instrument { id: "guitare", label: "Guitar", icon: "🎸" },
    Instrument { id: "basse", label: "Bass", icon: "🎸" },
    Instrument { id: "violon", label: "Violin", icon: "🎻" },
    Instrument { id: "flute", label: "Flute", icon: "🪈" },
    Instrument { id: "voix", label: "Voice", icon: "🎤" },
    Instrument { id: "saxophone", label: "Saxophone", icon: "🎷" },
    Instrument { id: "trompette", label: "Trumpet", icon: "🎺" },
];

/// Index of an instrument id in [`INSTRUMENTS`], falling back to piano.
pub fn instrument_index(id: &str) -> usize {
    INSTRUMENTS.iter().position(|i| i.id == id).unwrap_or(0)
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/(?:watch\?v=|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})")
            .expect("video id pattern")
    })
}

/// Whether the input resolves to a supported video link.
pub fn is_video_url(url: &str) -> bool {
    video_id(url).is_some()
}

/// Extract the 11-character video id from a watch, shorts, or share link.
pub fn video_id(url: &str) -> Option<String> {
    video_id_regex()
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Preview thumbnail URL for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

/// Render the input form.
pub fn view(state: &InputState) -> Element<'_, Message> {
    let url_card = view_url_card(state);
    let instrument_card = view_instrument_card(state);

    let generate = button(
        text("Generate score").size(16),
    )
    .on_press_maybe(is_video_url(&state.url).then_some(Message::Submit))
    .padding([10, 24])
    .style(button::primary);

    column![
        url_card,
        instrument_card,
        container(generate).center_x(Length::Fill),
    ]
    .spacing(14)
    .into()
}

fn view_url_card(state: &InputState) -> Element<'_, Message> {
    let field = text_input("https://www.youtube.com/watch?v=...", &state.url)
        .on_input(Message::UrlChanged)
        .on_submit(Message::Submit)
        .size(15)
        .padding(10);

    let mut input_row = row![field].spacing(8).align_y(Alignment::Center);
    if !state.url.is_empty() {
        input_row = input_row.push(
            button(text("x").size(12))
                .on_press(Message::ClearUrl)
                .style(button::text),
        );
    }

    let mut card = column![text("Video link").size(16), input_row].spacing(10);

    if let Some(handle) = &state.thumbnail {
        card = card.push(
            row![
                image(handle.clone()).width(Length::Fixed(240.0)),
                column![
                    text("Video detected").size(13).color(theme::DONE),
                    text("Thumbnail preview").size(11).color(theme::DIMMED),
                ]
                .spacing(4),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        );
    } else if !state.url.is_empty() && !is_video_url(&state.url) {
        card = card.push(
            text("This does not look like a supported video link")
                .size(12)
                .color(iced::Color::from_rgb(0.9, 0.5, 0.3)),
        );
    }

    container(card)
        .style(theme::card)
        .padding(16)
        .width(Length::Fill)
        .into()
}

fn view_instrument_card(state: &InputState) -> Element<'_, Message> {
    let mut grid = column![].spacing(8);

    for (row_idx, chunk) in INSTRUMENTS.chunks(4).enumerate() {
        let mut cards = row![].spacing(8);
        for (col_idx, instrument) in chunk.iter().enumerate() {
            let index = row_idx * 4 + col_idx;
            let selected = index == state.instrument;

            let label = column![
                text(instrument.icon).size(22),
                text(instrument.label).size(12),
            ]
            .spacing(4)
            .align_x(Alignment::Center);

            cards = cards.push(
                button(container(label).center_x(Length::Fill))
                    .on_press(Message::PickInstrument(index))
                    .width(Length::Fill)
                    .padding(10)
                    .style(if selected {
                        button::primary
                    } else {
                        button::secondary
                    }),
            );
        }
        grid = grid.push(cards);
    }

    container(column![text("Instrument").size(16), grid].spacing(10))
        .style(theme::card)
        .padding(16)
        .width(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_and_share_links_are_recognized() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("https://youtube.com/shorts/abcdefghijk?feature=share"),
            Some("abcdefghijk".to_string())
        );
    }

    #[test]
    fn test_other_links_are_rejected() {
        assert!(!is_video_url(""));
        assert!(!is_video_url("https://example.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_video_url("https://www.youtube.com/watch?v=short"));
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ"),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        );
    }

    #[test]
    fn test_instrument_index_falls_back_to_piano() {
        assert_eq!(instrument_index("violon"), 3);
        assert_eq!(instrument_index("theremin"), 0);
    }
}
