//! Playback tick handler
//!
//! Runs at ~60fps while the clock is running: sample the transport, update
//! note highlighting, republish the position, and keep the active row in
//! view. The clock is the cancellation gate - once `stop()` has run, a tick
//! that was already queued samples nothing and this handler is a no-op.

use iced::widget::operation;
use iced::widget::scrollable::AbsoluteOffset;
use iced::Task;

use super::super::app::StaveApp;
use super::super::listener_view;
use super::super::message::Message;

impl StaveApp {
    /// Handle Tick message
    pub fn handle_tick(&mut self) -> Task<Message> {
        let Some(snapshot) = self.clock.sample(&self.listener.transport) else {
            return Task::none();
        };

        self.listener.position = snapshot.position;

        let previous_lead = self.listener.active.first().copied();
        if let Some(index) = &self.listener.index {
            self.listener.active = index.active_indices(snapshot.position);
        }

        if snapshot.playing {
            if let Some(publisher) = &self.publisher {
                publisher.snapshot(&snapshot);
            }
        } else {
            // The source drained (end of track): wind the loop down the
            // same way an explicit pause does.
            self.clock.stop();
            if let Some(publisher) = &self.publisher {
                publisher.paused();
            }
            return Task::none();
        }

        // Keep the first active row centered, like the browser list does.
        let lead = self.listener.active.first().copied();
        if lead != previous_lead {
            if let Some(row) = lead {
                if row < self.config.playback.note_list_limit {
                    let target_y = (row as f32 * listener_view::NOTE_ROW_HEIGHT
                        - listener_view::VISIBLE_ROWS / 2.0 * listener_view::NOTE_ROW_HEIGHT)
                        .max(0.0);
                    return operation::scroll_to(
                        listener_view::note_list_id(),
                        AbsoluteOffset { x: 0.0, y: target_y },
                    );
                }
            }
        }

        Task::none()
    }
}
