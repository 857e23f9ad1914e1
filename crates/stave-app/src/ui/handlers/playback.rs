//! Playback control handlers
//!
//! The transport is the single source of truth for position and rate: the
//! handlers mutate it directly and the clock observes the change on its
//! next sample. Every control intent is mirrored onto the push channel,
//! fire-and-forget.

use iced::Task;

use super::super::app::StaveApp;
use super::super::message::Message;

impl StaveApp {
    /// Handle TogglePlayback message
    pub fn handle_toggle_playback(&mut self) -> Task<Message> {
        if !self.listener.transport.is_loaded() {
            return Task::none();
        }

        if self.clock.is_running() {
            self.listener.transport.pause();
            self.clock.stop();
            if let Some(publisher) = &self.publisher {
                publisher.paused();
            }
        } else {
            self.listener.transport.play();
            self.clock.start();
            if let Some(publisher) = &self.publisher {
                if let Some(job_id) = self.store.bound_id() {
                    publisher.started(job_id);
                }
            }
        }
        Task::none()
    }

    /// Handle Seek message (slider, seconds)
    pub fn handle_seek(&mut self, position: f64) -> Task<Message> {
        if !self.listener.transport.is_loaded() {
            return Task::none();
        }

        self.listener.transport.seek(position);
        self.listener.position = position;
        // Recompute highlighting immediately so a paused seek still lands
        // on the right rows.
        if let Some(index) = &self.listener.index {
            self.listener.active = index.active_indices(position);
        }
        if let Some(publisher) = &self.publisher {
            publisher.seeked(position);
        }
        Task::none()
    }

    /// Handle SetRate message
    pub fn handle_set_rate(&mut self, rate: f64) -> Task<Message> {
        self.listener.rate = rate;
        self.listener.transport.set_rate(rate);
        Task::none()
    }
}
