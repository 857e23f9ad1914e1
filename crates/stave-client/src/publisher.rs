//! Fire-and-forget publisher for realtime playback events.

use flume::Sender;

use stave_core::{ClientEvent, PlaybackSnapshot};

/// Outbound half of the push channel, from the app's point of view.
///
/// Every send is try-send, at most once: a full queue or a dead socket
/// drops the event at debug level and the local UI state stays
/// authoritative. Nothing here is awaited or retried.
#[derive(Debug, Clone)]
pub struct SyncPublisher {
    tx: Sender<ClientEvent>,
}

impl SyncPublisher {
    pub fn new(tx: Sender<ClientEvent>) -> Self {
        Self { tx }
    }

    /// Playback started for the bound job.
    pub fn started(&self, job_id: &str) {
        self.publish(ClientEvent::RealtimeStart {
            job_id: job_id.to_string(),
        });
    }

    /// Per-tick position report while the clock runs.
    pub fn snapshot(&self, snapshot: &PlaybackSnapshot) {
        self.publish(ClientEvent::RealtimeSync {
            position: snapshot.position,
            playing: snapshot.playing,
        });
    }

    /// Playback paused.
    pub fn paused(&self) {
        self.publish(ClientEvent::RealtimePause);
    }

    /// The user scrubbed to a new position.
    pub fn seeked(&self, position: f64) {
        self.publish(ClientEvent::RealtimeSeek { position });
    }

    fn publish(&self, event: ClientEvent) {
        if let Err(e) = self.tx.try_send(event) {
            log::debug!("sync: dropped outbound event: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_reach_the_channel() {
        let (tx, rx) = flume::bounded(8);
        let publisher = SyncPublisher::new(tx);

        publisher.started("j1");
        publisher.snapshot(&PlaybackSnapshot {
            position: 1.5,
            playing: true,
            rate: 1.0,
        });
        publisher.paused();
        publisher.seeked(30.0);

        let events: Vec<ClientEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            ClientEvent::RealtimeStart { job_id: "j1".to_string() }
        );
        assert_eq!(
            events[1],
            ClientEvent::RealtimeSync { position: 1.5, playing: true }
        );
        assert_eq!(events[2], ClientEvent::RealtimePause);
        assert_eq!(events[3], ClientEvent::RealtimeSeek { position: 30.0 });
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (tx, rx) = flume::bounded(1);
        let publisher = SyncPublisher::new(tx);

        publisher.paused();
        publisher.paused(); // queue full: dropped, no block, no panic
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_closed_channel_is_swallowed() {
        let (tx, rx) = flume::bounded(1);
        drop(rx);
        let publisher = SyncPublisher::new(tx);
        publisher.paused(); // dead socket: event dropped silently
    }
}
