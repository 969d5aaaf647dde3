//! Whole MIDI files: header plus tracks, track merging and tempo aware timelines

use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::{
        header::{Format, Header},
        track::{event::Event, message::Message, meta::MetaMessage, Track},
    },
    error::{MidiError, MidiResult},
    reader::MidiDecode,
    time::{self, DEFAULT_DIVISION, DEFAULT_TEMPO},
    writer::MidiWriteable,
};

/// A complete Standard MIDI File
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MidiFile {
    /// How the tracks relate to each other
    pub format: Format,
    /// Ticks per quarter note
    pub division: u16,
    /// Every track, in file order
    pub tracks: Vec<Track>,
}

impl Default for MidiFile {
    fn default() -> Self {
        Self::new(Format::One, DEFAULT_DIVISION)
    }
}

impl MidiFile {
    /// Creates a file without any tracks
    pub fn new(format: Format, division: u16) -> Self {
        Self {
            format,
            division,
            tracks: vec![],
        }
    }

    /// The header describing this file. The track count always reflects the current tracks, and
    /// must not exceed `u16::MAX`
    pub fn header(&self) -> Header {
        debug_assert!(
            self.tracks.len() <= u16::MAX as usize,
            "track count {} does not fit in a header",
            self.tracks.len()
        );
        Header::new(self.format, self.tracks.len() as u16, self.division)
    }

    /// Fails for asynchronous files, whose tracks do not share a timeline
    fn ensure_synchronous(&self, operation: &'static str) -> MidiResult<()> {
        if self.format == Format::Two {
            Err(MidiError::UnsupportedOperation(operation))
        } else {
            Ok(())
        }
    }

    /// Merges every track into one, in playback order, with delta times as if every event had
    /// been written to a single track.
    ///
    /// Events at the same tick keep the order of their tracks and then their order within the
    /// track. End of Track markers are dropped along the way, their delta time carried over to the
    /// next event, and exactly one marker is appended at the end.
    pub fn merge_tracks(&self) -> MidiResult<Track> {
        self.ensure_synchronous("merge tracks of")?;

        let mut events = Vec::new();
        for track in &self.tracks {
            events.extend(time::to_absolute(&track.events)?);
        }

        // Stable, so ties keep their concatenation order
        events.sort_by_key(|event| event.delta_time);

        let merged = fix_end_of_track(time::to_relative(events))?;
        debug!(
            tracks = self.tracks.len(),
            events = merged.len(),
            "merged tracks"
        );

        Ok(Track::new(merged))
    }

    /// The merged track paired with the tempo map needed to play it back in seconds
    pub fn timeline(&self) -> MidiResult<Timeline> {
        self.ensure_synchronous("iterate")?;

        Ok(Timeline {
            division: self.division,
            track: self.merge_tracks()?,
        })
    }

    /// Playback time in seconds, the sum of every delta time on the timeline
    pub fn length(&self) -> MidiResult<f64> {
        self.ensure_synchronous("compute the length of")?;

        Ok(self.timeline()?.iter().map(|event| event.delta_seconds).sum())
    }
}

/// Drops every End of Track marker, adding its delta time to the next event, and appends a single
/// marker holding whatever delta is left over
fn fix_end_of_track(events: Vec<Event>) -> MidiResult<Vec<Event>> {
    let mut accumulated: u64 = 0;
    let mut fixed = Vec::with_capacity(events.len() + 1);

    for mut event in events {
        let delta = accumulated
            .checked_add(event.delta_time)
            .ok_or(MidiError::InvalidValue {
                field: "delta time",
                value: event.delta_time,
            })?;

        if event.message.is_end_of_track() {
            trace!(delta = event.delta_time, "collapsing end of track");
            accumulated = delta;
        } else {
            event.delta_time = delta;
            accumulated = 0;
            fixed.push(event);
        }
    }

    fixed.push(Event::new(accumulated, MetaMessage::EndOfTrack));
    Ok(fixed)
}

impl MidiDecode for MidiFile {
    fn decode(buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let (header, mut rest) = Header::decode(buf)?;
        debug!(
            format = ?header.format,
            ntrks = header.ntrks,
            division = header.division,
            "decoded header"
        );

        let mut tracks = Vec::with_capacity(header.ntrks as usize);
        for _ in 0..header.ntrks {
            let (track, after) = Track::decode(rest)?;
            tracks.push(track);
            rest = after;
        }

        Ok((
            Self {
                format: header.format,
                division: header.division,
                tracks,
            },
            rest,
        ))
    }
}

impl MidiWriteable for MidiFile {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let mut bytes = self.header().to_midi_bytes();

        for track in &self.tracks {
            bytes.extend(track.to_midi_bytes());
        }

        bytes
    }
}

/// A merged, restartable view of a file's events in playback order
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Ticks per quarter note of the source file
    division: u16,
    /// All events merged into one track
    track: Track,
}

impl Timeline {
    /// The merged track backing this timeline
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Walks the timeline from the start, converting delta times to seconds
    pub fn iter(&self) -> TimelineIter<'_> {
        TimelineIter {
            division: self.division,
            tempo: DEFAULT_TEMPO,
            events: self.track.events.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = TimedEvent<'a>;
    type IntoIter = TimelineIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An event on a timeline, timed in seconds since the previous event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent<'a> {
    /// Seconds since the previous event
    pub delta_seconds: f64,
    /// The message to play
    pub message: &'a Message,
}

impl TimedEvent<'_> {
    /// Whether the message is meta information a player would usually skip
    pub fn is_meta(&self) -> bool {
        self.message.is_meta()
    }
}

/// Iterator over a [`Timeline`]
#[derive(Debug, Clone)]
pub struct TimelineIter<'a> {
    /// Ticks per quarter note
    division: u16,
    /// Tempo in effect for the next event
    tempo: u32,
    /// Remaining events
    events: std::slice::Iter<'a, Event>,
}

impl<'a> Iterator for TimelineIter<'a> {
    type Item = TimedEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;

        let delta_seconds = if event.delta_time > 0 {
            time::tick_to_seconds(event.delta_time, self.division, self.tempo)
        } else {
            0.0
        };

        // A new tempo only applies to the events after it
        if let Some(tempo) = event.message.tempo() {
            self.tempo = tempo;
        }

        Some(TimedEvent {
            delta_seconds,
            message: &event.message,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}
