//! Playback sampling clock.
//!
//! While audio plays, the app samples the media transport once per UI frame
//! and republishes the reading. [`PlaybackClock`] is the gate that makes
//! that loop cancellable: `stop()` is synchronous and absolute, so a tick
//! message already queued on the event loop produces nothing once the clock
//! is idle. The clock only ever reads the transport; seeks and rate changes
//! go to the transport directly and are observed on the next sample.

use std::time::Instant;

/// Read-only view of the playing media, sampled on every clock tick.
///
/// Implemented by the audio sink when an output device exists and by
/// [`WallClockTransport`] otherwise.
pub trait MediaTransport {
    /// Current position in seconds.
    fn position(&self) -> f64;
    /// Whether media is advancing. Goes false on pause and at end of track.
    fn is_playing(&self) -> bool;
    /// Playback rate multiplier (1.0 = realtime).
    fn rate(&self) -> f64;
}

/// An instantaneous playback reading. Derived from the live transport on
/// every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub position: f64,
    pub playing: bool,
    pub rate: f64,
}

/// Two-state sampling gate: `Idle` or `Running`.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    running: bool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin sampling. Idempotent: starting a running clock is a no-op, so
    /// the caller cannot double-schedule the tick loop.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop sampling. After this returns, [`sample`](Self::sample) yields
    /// `None` until the next `start()`, queued ticks included.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Take one reading from the transport, or `None` while idle.
    pub fn sample<T: MediaTransport>(&self, transport: &T) -> Option<PlaybackSnapshot> {
        if !self.running {
            return None;
        }
        Some(PlaybackSnapshot {
            position: transport.position(),
            playing: transport.is_playing(),
            rate: transport.rate(),
        })
    }
}

/// Wall-clock media transport: position advances with real time while
/// playing, scaled by rate and clamped to the track duration.
///
/// Used as the silent fallback when no audio device is available, which
/// keeps the note highlighting functional, and as the transport in tests.
#[derive(Debug, Clone)]
pub struct WallClockTransport {
    playing: bool,
    rate: f64,
    /// Wall-clock anchor for the current play segment.
    anchor: Instant,
    /// Track position at the anchor, seconds.
    offset: f64,
    duration: f64,
}

impl WallClockTransport {
    pub fn new(duration: f64) -> Self {
        Self {
            playing: false,
            rate: 1.0,
            anchor: Instant::now(),
            offset: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.anchor = Instant::now();
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        if self.playing {
            self.offset = self.position();
            self.playing = false;
        }
    }

    pub fn seek(&mut self, position: f64) {
        let mut pos = position.max(0.0);
        if self.duration > 0.0 {
            pos = pos.min(self.duration);
        }
        self.offset = pos;
        self.anchor = Instant::now();
    }

    pub fn set_rate(&mut self, rate: f64) {
        // Re-anchor so the already-elapsed segment keeps its old rate.
        self.offset = self.position();
        self.anchor = Instant::now();
        self.rate = rate.max(0.05);
    }
}

impl MediaTransport for WallClockTransport {
    fn position(&self) -> f64 {
        let pos = if self.playing {
            self.offset + self.anchor.elapsed().as_secs_f64() * self.rate
        } else {
            self.offset
        };
        if self.duration > 0.0 {
            pos.min(self.duration)
        } else {
            pos
        }
    }

    fn is_playing(&self) -> bool {
        self.playing && (self.duration <= 0.0 || self.position() < self.duration)
    }

    fn rate(&self) -> f64 {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scriptable transport for clock tests.
    struct FixedTransport {
        position: f64,
        playing: bool,
        rate: f64,
    }

    impl MediaTransport for FixedTransport {
        fn position(&self) -> f64 {
            self.position
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn rate(&self) -> f64 {
            self.rate
        }
    }

    #[test]
    fn test_idle_clock_yields_no_snapshot() {
        let clock = PlaybackClock::new();
        let transport = FixedTransport { position: 1.0, playing: true, rate: 1.0 };
        assert!(clock.sample(&transport).is_none());
    }

    #[test]
    fn test_running_clock_reads_the_transport() {
        let mut clock = PlaybackClock::new();
        clock.start();
        let transport = FixedTransport { position: 2.5, playing: true, rate: 1.25 };
        let snap = clock.sample(&transport).unwrap();
        assert_eq!(snap.position, 2.5);
        assert!(snap.playing);
        assert_eq!(snap.rate, 1.25);
    }

    #[test]
    fn test_stop_suppresses_already_queued_ticks() {
        let mut clock = PlaybackClock::new();
        let transport = FixedTransport { position: 0.0, playing: true, rate: 1.0 };
        clock.start();
        assert!(clock.sample(&transport).is_some());

        // A tick message queued before stop() still arrives afterwards; it
        // must produce nothing.
        clock.stop();
        assert!(clock.sample(&transport).is_none());
        assert!(clock.sample(&transport).is_none());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = PlaybackClock::new();
        clock.start();
        clock.start();
        assert!(clock.is_running());
        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_wall_clock_holds_position_while_paused() {
        let mut transport = WallClockTransport::new(180.0);
        transport.seek(42.0);
        assert_eq!(transport.position(), 42.0);
        assert!(!transport.is_playing());
        transport.pause();
        assert_eq!(transport.position(), 42.0);
    }

    #[test]
    fn test_wall_clock_seek_clamps_to_track() {
        let mut transport = WallClockTransport::new(100.0);
        transport.seek(-5.0);
        assert_eq!(transport.position(), 0.0);
        transport.seek(500.0);
        assert_eq!(transport.position(), 100.0);
        // At the end, the transport no longer reports playing.
        transport.play();
        assert!(!transport.is_playing());
    }

    #[test]
    fn test_wall_clock_advances_while_playing() {
        let mut transport = WallClockTransport::new(100.0);
        transport.seek(10.0);
        transport.play();
        assert!(transport.is_playing());
        let p0 = transport.position();
        std::thread::sleep(std::time::Duration::from_millis(15));
        let p1 = transport.position();
        assert!(p1 > p0);
        transport.pause();
        let held = transport.position();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(transport.position(), held);
    }
}
