//! Track chunk data enums and structs

use tracing::debug;

use event::Event;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::chunk_types::TRACK_DATA_CHUNK,
    error::{MidiError, MidiResult},
    reader::MidiDecode,
    writer::MidiWriteable,
    Chunk,
};

pub mod channel;
pub mod event;
pub mod message;
pub mod meta;
pub mod system;

/// A track chunk, containing zero or more MTrk events
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    /// All events of this track, in order
    pub events: Vec<Event>,
}

impl Track {
    /// Creates a track from its events
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Decodes a track chunk's payload as a sequence of events.
    ///
    /// Running status starts out empty and is carried from each event to the next. There is no
    /// event count in the format, so decoding ends when the payload runs out.
    pub fn decode_events(mut data: &[u8]) -> MidiResult<Vec<Event>> {
        let mut events = vec![];
        let mut running_status = None;

        while !data.is_empty() {
            let (event, rest) = Event::decode(data, running_status)?;
            running_status = Some(event.message.status_byte());
            events.push(event);
            data = rest;
        }

        Ok(events)
    }
}

impl TryFrom<Chunk> for Track {
    type Error = MidiError;
    fn try_from(chunk: Chunk) -> Result<Self, Self::Error> {
        chunk.expect_type(TRACK_DATA_CHUNK)?;

        let events = Track::decode_events(&chunk.data)?;
        debug!(events = events.len(), bytes = chunk.len(), "decoded track");

        Ok(Self { events })
    }
}

impl From<&Track> for Chunk {
    fn from(track: &Track) -> Self {
        let mut data = vec![];

        for event in &track.events {
            data.extend(event.to_midi_bytes());
        }

        Chunk::new(TRACK_DATA_CHUNK, data)
    }
}

impl MidiDecode for Track {
    fn decode(buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let (chunk, rest) = Chunk::decode(buf)?;
        Ok((chunk.try_into()?, rest))
    }
}

impl MidiWriteable for Track {
    fn to_midi_bytes(&self) -> Vec<u8> {
        Chunk::from(self).to_midi_bytes()
    }
}
