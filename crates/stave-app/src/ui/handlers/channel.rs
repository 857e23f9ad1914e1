//! Push-channel and status-poll handlers
//!
//! Inbound job updates arrive two ways: pushed over the WebSocket (drained
//! from the flume inbox on PollChannel) or, while the channel is down,
//! pulled over HTTP every couple of seconds. Both feed the same
//! `StatusStore::apply` path, so ordering and id guards hold regardless of
//! the transport.

use std::sync::Arc;

use iced::Task;

use stave_client::PushChannel;
use stave_core::{Applied, JobStatus, ServerEvent};

use super::super::app::{Phase, StaveApp};
use super::super::message::Message;

impl StaveApp {
    /// Handle ChannelConnected message
    pub fn handle_channel_connected(
        &mut self,
        result: Result<Arc<PushChannel>, String>,
    ) -> Task<Message> {
        match result {
            Ok(channel) => {
                self.publisher = Some(channel.publisher());
                self.channel = Some(channel);
                log::info!("push channel connected");
            }
            Err(e) => {
                log::warn!("push channel unavailable: {e} - falling back to status polling");
            }
        }
        Task::none()
    }

    /// Handle PollChannel message
    ///
    /// Drains every event buffered since the last poll. Runs at 10Hz, well
    /// under the backend's update cadence.
    pub fn handle_poll_channel(&mut self) -> Task<Message> {
        let Some(channel) = self.channel.clone() else {
            return Task::none();
        };

        let mut tasks = Vec::new();
        let updates = channel.updates();
        while let Ok(event) = updates.try_recv() {
            match event {
                ServerEvent::JobUpdate(status) => tasks.push(self.apply_update(status)),
                ServerEvent::RealtimeState(state) => {
                    log::debug!("push: realtime state echo: {state}");
                }
                ServerEvent::Error { message } => {
                    log::warn!("push: backend error event: {message}");
                }
            }
        }

        // A dead socket stops delivering; drop the handle so the status
        // poll takes over and the publisher stops queueing.
        if !channel.is_alive() {
            log::warn!("push channel lost, switching to status polling");
            channel.disconnect();
            self.channel = None;
            self.publisher = None;
        }

        Task::batch(tasks)
    }

    /// Handle PollStatus message (HTTP fallback while the channel is down)
    pub fn handle_poll_status(&mut self) -> Task<Message> {
        let Some(job_id) = self.store.bound_id().map(String::from) else {
            return Task::none();
        };
        let api = self.api.clone();
        Task::perform(
            async move { api.fetch_status(&job_id).await.map_err(|e| e.to_string()) },
            Message::StatusPolled,
        )
    }

    /// Handle StatusPolled message
    pub fn handle_status_polled(
        &mut self,
        result: Result<JobStatus, String>,
    ) -> Task<Message> {
        match result {
            Ok(status) => self.apply_update(status),
            Err(e) => {
                log::debug!("status poll failed: {e}");
                Task::none()
            }
        }
    }

    /// Reconcile one inbound update and drive the phase machine.
    fn apply_update(&mut self, update: JobStatus) -> Task<Message> {
        let stage = update.stage;
        match self.store.apply(update) {
            Applied::Accepted => {}
            Applied::Foreign => {
                log::debug!("ignoring update for unbound job");
                return Task::none();
            }
            Applied::Stale => {
                log::debug!("ignoring stale update ({stage})");
                return Task::none();
            }
            Applied::Terminal => {
                log::debug!("ignoring update after terminal error");
                return Task::none();
            }
        }

        if let Some(error) = self.store.error() {
            // Terminal job failure: surface it, keep the phase where it is.
            self.error = Some(error.to_string());
            log::warn!("job failed: {error}");
            return Task::none();
        }

        if self.phase == Phase::Input {
            self.phase = Phase::Processing;
        }

        if self.store.is_complete() && self.phase != Phase::Result {
            self.phase = Phase::Result;
            log::info!("job complete, loading result");
            return self.enter_result();
        }

        Task::none()
    }

    /// Fetch the note sheet and cache the audio for the completed job.
    fn enter_result(&mut self) -> Task<Message> {
        let Some(job_id) = self.store.bound_id().map(String::from) else {
            return Task::none();
        };

        let api = self.api.clone();
        let id = job_id.clone();
        let notes = Task::perform(
            async move {
                api.fetch_notes(&id)
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            },
            Message::NotesFetched,
        );

        let api = self.api.clone();
        let audio = Task::perform(
            async move {
                let dest = std::env::temp_dir().join(format!("stave-{job_id}.wav"));
                api.download_audio(&job_id, &dest)
                    .await
                    .map(|_| dest)
                    .map_err(|e| e.to_string())
            },
            Message::AudioCached,
        );

        Task::batch([notes, audio])
    }
}
