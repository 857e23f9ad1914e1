//! Local audio playback: the "media element" the playback clock samples.
//!
//! When an output device exists, playback state lives in a rodio `Sink` and
//! is read passively: position, paused flag, and speed are queried on every
//! clock tick, never cached. When no device is available (headless boxes,
//! busy sound servers) a wall-clock transport stands in, so the listener
//! still highlights notes silently instead of going dead.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use stave_core::{MediaTransport, WallClockTransport};

enum Backend {
    /// Nothing loaded yet.
    Unloaded,
    /// Real playback through the default output device.
    Device {
        // Keeps the device stream open for the sink's lifetime.
        _stream: OutputStream,
        sink: Sink,
    },
    /// Silent fallback: position advances on the wall clock.
    Clock(WallClockTransport),
}

/// Playback transport for the realtime listener.
///
/// All mutations (play/pause/seek/rate) are applied here directly by the UI
/// handlers; the clock only ever reads through [`MediaTransport`].
pub struct AudioTransport {
    backend: Backend,
}

impl Default for AudioTransport {
    fn default() -> Self {
        Self {
            backend: Backend::Unloaded,
        }
    }
}

impl AudioTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a downloaded audio file for playback, paused at the start.
    ///
    /// Falls back to the silent wall-clock transport if the device or the
    /// decoder is unavailable.
    pub fn load(&mut self, path: &Path, duration: f64) {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("audio: no output device ({e}), using silent clock transport");
                self.backend = Backend::Clock(WallClockTransport::new(duration));
                return;
            }
        };

        let decoder = match File::open(path).map_err(anyhow::Error::from).and_then(|f| {
            Decoder::new(f).map_err(anyhow::Error::from)
        }) {
            Ok(decoder) => decoder,
            Err(e) => {
                log::warn!("audio: cannot decode {path:?} ({e}), using silent clock transport");
                self.backend = Backend::Clock(WallClockTransport::new(duration));
                return;
            }
        };

        let sink = Sink::connect_new(&stream.mixer());
        sink.append(decoder);
        sink.pause();
        log::info!("audio: loaded {path:?}");
        self.backend = Backend::Device {
            _stream: stream,
            sink,
        };
    }

    /// Switch to the silent wall-clock transport (audio fetch failed).
    pub fn load_silent(&mut self, duration: f64) {
        self.backend = Backend::Clock(WallClockTransport::new(duration));
    }

    /// Drop whatever is loaded.
    pub fn clear(&mut self) {
        self.backend = Backend::Unloaded;
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self.backend, Backend::Unloaded)
    }

    pub fn play(&mut self) {
        match &mut self.backend {
            Backend::Unloaded => {}
            Backend::Device { sink, .. } => sink.play(),
            Backend::Clock(clock) => clock.play(),
        }
    }

    pub fn pause(&mut self) {
        match &mut self.backend {
            Backend::Unloaded => {}
            Backend::Device { sink, .. } => sink.pause(),
            Backend::Clock(clock) => clock.pause(),
        }
    }

    pub fn seek(&mut self, position: f64) {
        match &mut self.backend {
            Backend::Unloaded => {}
            Backend::Device { sink, .. } => {
                if let Err(e) = sink.try_seek(Duration::from_secs_f64(position.max(0.0))) {
                    log::warn!("audio: seek failed: {e}");
                }
            }
            Backend::Clock(clock) => clock.seek(position),
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        match &mut self.backend {
            Backend::Unloaded => {}
            Backend::Device { sink, .. } => sink.set_speed(rate as f32),
            Backend::Clock(clock) => clock.set_rate(rate),
        }
    }
}

impl MediaTransport for AudioTransport {
    fn position(&self) -> f64 {
        match &self.backend {
            Backend::Unloaded => 0.0,
            Backend::Device { sink, .. } => sink.get_pos().as_secs_f64(),
            Backend::Clock(clock) => clock.position(),
        }
    }

    fn is_playing(&self) -> bool {
        match &self.backend {
            Backend::Unloaded => false,
            // The sink reports empty once the source drains at end of track.
            Backend::Device { sink, .. } => !sink.is_paused() && !sink.empty(),
            Backend::Clock(clock) => clock.is_playing(),
        }
    }

    fn rate(&self) -> f64 {
        match &self.backend {
            Backend::Unloaded => 1.0,
            Backend::Device { sink, .. } => sink.speed() as f64,
            Backend::Clock(clock) => clock.rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_transport_is_inert() {
        let mut transport = AudioTransport::new();
        assert!(!transport.is_loaded());
        assert!(!transport.is_playing());
        assert_eq!(transport.position(), 0.0);
        assert_eq!(transport.rate(), 1.0);
        // No-ops, no panics
        transport.play();
        transport.seek(10.0);
        transport.set_rate(1.5);
    }

    #[test]
    fn test_silent_fallback_tracks_position() {
        let mut transport = AudioTransport::new();
        transport.load_silent(120.0);
        assert!(transport.is_loaded());
        transport.seek(30.0);
        assert_eq!(transport.position(), 30.0);
        transport.set_rate(1.25);
        assert_eq!(transport.rate(), 1.25);
        transport.clear();
        assert!(!transport.is_loaded());
    }
}
