//! Time-indexed note events for the realtime listener.

use serde::{Deserialize, Serialize};

/// One transcribed note with its sounding interval in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Onset time, seconds from the start of the track.
    pub start: f64,
    /// Release time, seconds. Always >= `start`.
    pub end: f64,
    /// MIDI pitch number.
    pub pitch: i32,
    /// Display name, e.g. "C#4".
    pub name: String,
}

impl NoteEvent {
    /// Whether the note sounds at `t`. Both endpoints are inclusive: a note
    /// is still active at its exact release instant.
    pub fn is_active_at(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Whether the note has finished sounding at `t`. Strict, so a note is
    /// never both active and past at the same instant.
    pub fn is_past(&self, t: f64) -> bool {
        self.end < t
    }
}

/// Immutable, start-sorted collection of note events for one job.
///
/// Built once from the notes fetch and queried on every playback tick. The
/// working set is a few hundred notes, so lookups are early-exit linear
/// scans over the sorted order.
#[derive(Debug, Clone, Default)]
pub struct NoteIndex {
    notes: Vec<NoteEvent>,
    duration: f64,
}

impl NoteIndex {
    /// Build the index, sorting by onset. Duplicate events are kept.
    pub fn new(mut notes: Vec<NoteEvent>, duration: f64) -> Self {
        notes.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { notes, duration }
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total track duration in seconds, as reported by the notes fetch.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Every note sounding at `t` (closed interval on both ends).
    pub fn active_at(&self, t: f64) -> Vec<&NoteEvent> {
        self.scan_active(t).map(|(_, note)| note).collect()
    }

    /// Indices into [`notes`](Self::notes) of the notes sounding at `t`.
    pub fn active_indices(&self, t: f64) -> Vec<usize> {
        self.scan_active(t).map(|(i, _)| i).collect()
    }

    /// Notes starting within `(t, t + window]`, in onset order.
    pub fn upcoming_within(&self, t: f64, window: f64) -> Vec<&NoteEvent> {
        let mut upcoming = Vec::new();
        for note in &self.notes {
            if note.start > t + window {
                break;
            }
            if note.start > t {
                upcoming.push(note);
            }
        }
        upcoming
    }

    fn scan_active(&self, t: f64) -> impl Iterator<Item = (usize, &NoteEvent)> + '_ {
        self.notes
            .iter()
            .enumerate()
            .take_while(move |(_, note)| note.start <= t)
            .filter(move |(_, note)| note.is_active_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: f64, end: f64, pitch: i32) -> NoteEvent {
        NoteEvent {
            start,
            end,
            pitch,
            name: format!("n{pitch}"),
        }
    }

    #[test]
    fn test_active_is_a_closed_interval() {
        let index = NoteIndex::new(vec![note(2.0, 4.0, 60), note(4.0, 6.0, 62)], 10.0);

        // At the shared boundary both notes are active: one at its release
        // instant, one at its onset.
        let active = index.active_at(4.0);
        assert_eq!(active.len(), 2);

        assert_eq!(index.active_at(1.9).len(), 0);
        assert_eq!(index.active_at(2.0).len(), 1);
        assert_eq!(index.active_at(6.0).len(), 1);
        assert_eq!(index.active_at(6.1).len(), 0);
    }

    #[test]
    fn test_past_is_strict() {
        let n = note(2.0, 4.0, 60);
        assert!(!n.is_past(4.0));
        assert!(n.is_past(4.0 + 1e-9));
        // Never active and past at once.
        assert!(!(n.is_active_at(4.0) && n.is_past(4.0)));
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_onset() {
        let index = NoteIndex::new(vec![note(5.0, 6.0, 1), note(1.0, 9.0, 2)], 10.0);
        assert_eq!(index.notes()[0].pitch, 2);
        // The long early note is still found past later onsets.
        assert_eq!(index.active_at(8.0).len(), 1);
    }

    #[test]
    fn test_duplicate_events_are_both_returned() {
        let index = NoteIndex::new(vec![note(1.0, 2.0, 60), note(1.0, 2.0, 60)], 5.0);
        assert_eq!(index.active_at(1.5).len(), 2);
    }

    #[test]
    fn test_active_indices_match_active_at() {
        let index = NoteIndex::new(vec![note(0.0, 1.0, 1), note(0.5, 2.0, 2), note(3.0, 4.0, 3)], 5.0);
        let indices = index.active_indices(0.75);
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_upcoming_window() {
        let index = NoteIndex::new(vec![note(1.0, 2.0, 1), note(3.0, 4.0, 2), note(8.0, 9.0, 3)], 10.0);
        let upcoming = index.upcoming_within(1.0, 2.0);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].pitch, 2);
        // A note already sounding is not upcoming.
        assert!(index.upcoming_within(1.0, 0.5).is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = NoteIndex::default();
        assert!(index.is_empty());
        assert!(index.active_at(0.0).is_empty());
    }
}
