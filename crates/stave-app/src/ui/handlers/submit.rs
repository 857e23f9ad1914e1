//! Input form and submission handlers

use iced::Task;

use stave_client::JobAccepted;

use super::super::app::{Phase, StaveApp};
use super::super::input_view::{self, INSTRUMENTS};
use super::super::message::Message;
use crate::config;

impl StaveApp {
    /// Handle UrlChanged message
    ///
    /// Refreshes the thumbnail preview when the link resolves to a new
    /// video id.
    pub fn handle_url_changed(&mut self, value: String) -> Task<Message> {
        self.input.url = value;

        let Some(video_id) = input_view::video_id(&self.input.url) else {
            self.input.thumbnail = None;
            self.input.thumbnail_id = None;
            return Task::none();
        };

        if self.input.thumbnail_id.as_deref() == Some(video_id.as_str()) {
            return Task::none();
        }
        self.input.thumbnail_id = Some(video_id.clone());
        self.input.thumbnail = None;

        let api = self.api.clone();
        Task::perform(
            async move {
                let url = input_view::thumbnail_url(&video_id);
                api.fetch_bytes(&url)
                    .await
                    .map(iced::widget::image::Handle::from_bytes)
                    .map_err(|e| e.to_string())
            },
            Message::ThumbnailLoaded,
        )
    }

    /// Handle ThumbnailLoaded message
    pub fn handle_thumbnail_loaded(
        &mut self,
        result: Result<iced::widget::image::Handle, String>,
    ) -> Task<Message> {
        match result {
            Ok(handle) => self.input.thumbnail = Some(handle),
            Err(e) => log::debug!("thumbnail fetch failed: {e}"),
        }
        Task::none()
    }

    /// Handle PickInstrument message
    pub fn handle_pick_instrument(&mut self, index: usize) -> Task<Message> {
        if index < INSTRUMENTS.len() {
            self.input.instrument = index;
        }
        Task::none()
    }

    /// Handle Submit message
    ///
    /// Optimistically enters the processing phase; a rejected submission
    /// drops back to input with the backend's message in the banner.
    pub fn handle_submit(&mut self) -> Task<Message> {
        if !input_view::is_video_url(&self.input.url) {
            return Task::none();
        }

        self.error = None;
        self.store.reset();
        self.phase = Phase::Processing;

        let instrument = INSTRUMENTS[self.input.instrument].id;
        log::info!("submitting transcription ({instrument})");

        let api = self.api.clone();
        let url = self.input.url.clone();
        Task::perform(
            async move {
                api.submit(&url, instrument)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::Submitted,
        )
    }

    /// Handle Submitted message
    pub fn handle_submitted(&mut self, result: Result<JobAccepted, String>) -> Task<Message> {
        match result {
            Ok(accepted) => {
                log::info!("job accepted: {}", accepted.job_id);
                self.store.bind(accepted.job_id);
                self.persist_instrument_choice()
            }
            Err(e) => {
                log::warn!("submission failed: {e}");
                self.error = Some(e);
                self.phase = Phase::Input;
                Task::none()
            }
        }
    }

    /// Handle ConfigSaved message
    pub fn handle_config_saved(&mut self, result: Result<(), String>) -> Task<Message> {
        if let Err(e) = result {
            log::warn!("failed to persist config: {e}");
        }
        Task::none()
    }

    /// Remember the last submitted instrument as the new default.
    fn persist_instrument_choice(&mut self) -> Task<Message> {
        let chosen = INSTRUMENTS[self.input.instrument].id;
        if self.config.playback.default_instrument == chosen {
            return Task::none();
        }
        self.config.playback.default_instrument = chosen.to_string();

        let snapshot = self.config.clone();
        Task::perform(
            async move {
                config::save_config(&snapshot, &config::default_config_path())
                    .map_err(|e| e.to_string())
            },
            Message::ConfigSaved,
        )
    }
}
