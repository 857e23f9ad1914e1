//! Main application state and iced wiring
//!
//! The app is a three-phase state machine (input → processing → result)
//! driven by two independent event sources: push-channel job updates and
//! per-frame playback ticks. Both are serialized onto the iced update loop;
//! the status store and the playback clock keep their own invariants
//! regardless of how the two interleave.

use std::sync::Arc;
use std::time::Duration;

use iced::widget::{button, column, container, row, text, Space};
use iced::{time, Element, Length, Subscription, Task, Theme};

use stave_client::{Api, PushChannel, SyncPublisher};
use stave_core::{NoteIndex, PlaybackClock, StatusStore};

use crate::audio::AudioTransport;
use crate::config::{self, Config};
use super::message::Message;
use super::{input_view, listener_view, progress_view, sheet_view, theme};

/// Top-level UI phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Link and instrument form
    #[default]
    Input,
    /// Job submitted, progress display running
    Processing,
    /// Score ready, realtime listener available
    Result,
}

/// State for the input form
#[derive(Debug, Default)]
pub struct InputState {
    /// Video link as typed
    pub url: String,
    /// Selected instrument (index into [`input_view::INSTRUMENTS`])
    pub instrument: usize,
    /// Thumbnail preview for the recognized video
    pub thumbnail: Option<iced::widget::image::Handle>,
    /// Video id the thumbnail belongs to, to avoid refetching
    pub thumbnail_id: Option<String>,
}

/// State for the realtime listener and score card
#[derive(Default)]
pub struct ListenerState {
    /// Time-sorted note events, once fetched
    pub index: Option<NoteIndex>,
    /// Indices of the notes sounding at the last sampled position
    pub active: Vec<usize>,
    /// Last sampled playback position, seconds
    pub position: f64,
    /// Track duration, seconds (from the notes fetch)
    pub duration: f64,
    /// Selected playback rate
    pub rate: f64,
    /// Media transport (rodio sink or silent clock)
    pub transport: AudioTransport,
    /// Status line on the score card (save feedback)
    pub sheet_status: String,
}

impl ListenerState {
    pub fn clear(&mut self) {
        self.index = None;
        self.active.clear();
        self.position = 0.0;
        self.duration = 0.0;
        self.rate = 1.0;
        self.transport.clear();
        self.sheet_status.clear();
    }
}

/// Main application
pub struct StaveApp {
    /// Current UI phase
    pub phase: Phase,
    /// Global configuration
    pub config: Config,
    /// REST client for the backend
    pub api: Api,
    /// Push channel handle (None while disconnected)
    pub channel: Option<Arc<PushChannel>>,
    /// Outbound publisher bound to the channel
    pub publisher: Option<SyncPublisher>,
    /// Job status reconciliation
    pub store: StatusStore,
    /// Playback sampling gate
    pub clock: PlaybackClock,
    /// User-visible error banner
    pub error: Option<String>,
    /// Input form state
    pub input: InputState,
    /// Listener and score state
    pub listener: ListenerState,
}

impl StaveApp {
    /// Create the application and kick off the push-channel connect
    pub fn new() -> (Self, Task<Message>) {
        let config_path = config::default_config_path();
        let config = config::load_config(&config_path);

        let api = Api::new(config.backend.api_url.clone());
        let instrument = input_view::instrument_index(&config.playback.default_instrument);

        let ws_url = config.backend.ws_url.clone();
        let connect = Task::perform(
            async move {
                PushChannel::connect(&ws_url)
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            },
            Message::ChannelConnected,
        );

        let mut listener = ListenerState::default();
        listener.rate = 1.0;

        let app = Self {
            phase: Phase::Input,
            config,
            api,
            channel: None,
            publisher: None,
            store: StatusStore::new(),
            clock: PlaybackClock::new(),
            error: None,
            input: InputState {
                instrument,
                ..InputState::default()
            },
            listener,
        };

        (app, connect)
    }

    /// Application title
    pub fn title(&self) -> String {
        String::from("Stave - Partition Studio")
    }

    /// Update state based on message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChannelConnected(result) => self.handle_channel_connected(result),
            Message::PollChannel => self.handle_poll_channel(),
            Message::PollStatus => self.handle_poll_status(),
            Message::StatusPolled(result) => self.handle_status_polled(result),

            Message::UrlChanged(value) => self.handle_url_changed(value),
            Message::ClearUrl => self.handle_url_changed(String::new()),
            Message::ThumbnailLoaded(result) => self.handle_thumbnail_loaded(result),
            Message::PickInstrument(index) => self.handle_pick_instrument(index),
            Message::Submit => self.handle_submit(),
            Message::Submitted(result) => self.handle_submitted(result),
            Message::ConfigSaved(result) => self.handle_config_saved(result),
            Message::DismissError => {
                self.error = None;
                Task::none()
            }

            Message::NotesFetched(result) => self.handle_notes_fetched(result),
            Message::AudioCached(result) => self.handle_audio_cached(result),
            Message::TogglePlayback => self.handle_toggle_playback(),
            Message::Tick => self.handle_tick(),
            Message::Seek(position) => self.handle_seek(position),
            Message::SetRate(rate) => self.handle_set_rate(rate),
            Message::SavePdf => self.handle_save_pdf(),
            Message::PdfDestinationPicked(dest) => self.handle_pdf_destination(dest),
            Message::PdfSaved(result) => self.handle_pdf_saved(result),

            Message::Reset => self.handle_reset(),
        }
    }

    /// Back to the input phase. The push-channel connection survives; the
    /// job binding, clock, and listener do not.
    fn handle_reset(&mut self) -> Task<Message> {
        self.clock.stop();
        self.listener.clear();
        self.store.reset();
        self.error = None;
        self.input.url.clear();
        self.input.thumbnail = None;
        self.input.thumbnail_id = None;
        self.phase = Phase::Input;
        log::info!("session reset to input");
        Task::none()
    }

    /// Render the UI
    pub fn view(&self) -> Element<'_, Message> {
        let header = self.view_header();

        let content: Element<'_, Message> = match self.phase {
            Phase::Input => input_view::view(&self.input),
            Phase::Processing => progress_view::view(&self.store),
            Phase::Result => self.view_result(),
        };

        let footer = container(
            text("Stave - powered by basic-pitch & LilyPond")
                .size(12)
                .color(theme::DIMMED),
        )
        .padding(8);

        let mut main = column![header];
        if let Some(error) = &self.error {
            main = main.push(self.view_error_banner(error));
        }
        main = main.push(content).push(Space::new().height(Length::Fill)).push(footer);

        container(main.spacing(14).padding(20))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let title = text("Stave").size(26);
        let subtitle = text("Sheet music from YouTube videos")
            .size(13)
            .color(theme::DIMMED);

        let mut bar = row![column![title, subtitle].spacing(2), Space::new().width(Length::Fill)]
            .spacing(12);

        if self.phase != Phase::Input {
            bar = bar.push(
                button(text("New transcription").size(13))
                    .on_press(Message::Reset)
                    .style(button::secondary),
            );
        }

        bar.into()
    }

    fn view_error_banner<'a>(&self, error: &'a str) -> Element<'a, Message> {
        container(
            row![
                text(error).size(14).width(Length::Fill),
                button(text("x").size(12))
                    .on_press(Message::DismissError)
                    .style(button::text),
            ]
            .spacing(10)
            .align_y(iced::Alignment::Center),
        )
        .style(theme::error_banner)
        .padding(10)
        .width(Length::Fill)
        .into()
    }

    fn view_result(&self) -> Element<'_, Message> {
        column![
            sheet_view::view(&self.store, &self.listener),
            listener_view::view(
                &self.listener,
                self.clock.is_running(),
                self.config.playback.note_list_limit,
            ),
        ]
        .spacing(14)
        .into()
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Subscriptions: inbox polling while connected, playback ticks while
    /// the clock runs, HTTP status polling while processing without a
    /// channel. Each one disappears with the state that needs it, so a
    /// stopped clock schedules nothing.
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = Vec::new();

        if self.channel.is_some() {
            subs.push(time::every(Duration::from_millis(100)).map(|_| Message::PollChannel));
        }

        if self.clock.is_running() {
            // ~60fps playback sampling
            subs.push(time::every(Duration::from_millis(16)).map(|_| Message::Tick));
        }

        if self.phase == Phase::Processing && self.channel.is_none() {
            subs.push(time::every(Duration::from_secs(2)).map(|_| Message::PollStatus));
        }

        Subscription::batch(subs)
    }
}
