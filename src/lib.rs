//! # midiwire
//!
//! A Standard MIDI File codec. Byte buffers decode into typed chunks, tracks and timed
//! messages, and those values encode back into the exact wire format.
//!
//! ## Overview
//!
//! MIDI files are structured as a series of chunks. Each chunk contains a 4-character ASCII
//! type identifier and a 32-bit length that specifies how many bytes of data follow. A file
//! is one `MThd` header chunk followed by `MTrk` track chunks, each holding a sequence of
//! delta-timed messages.
//!
//! - **Typed messages**: every channel, system and meta message decodes into a closed enum,
//!   with unknown meta types preserved verbatim.
//! - **Running status**: the carried status byte is an explicit parameter of
//!   [`chunk::track::message::Message::decode`], threaded through each track by
//!   [`chunk::track::Track`].
//! - **Timelines**: [`file::MidiFile::merge_tracks`] merges synchronous tracks into one
//!   chronological track, and [`file::MidiFile::timeline`] replays it in seconds.
//!
//! ## Example Usage
//!
//! ```rust
//! use midiwire::{
//!     chunk::track::{
//!         channel::ChannelMessage, event::Event, meta::MetaMessage, message::Message, Track,
//!     },
//!     file::MidiFile,
//!     reader::MidiDecode,
//!     writer::MidiWriteable,
//! };
//!
//! let mut midi = MidiFile::default();
//! midi.tracks.push(Track::new(vec![
//!     Event::new(0, Message::Channel(ChannelMessage::note_on(0, 60, 100).unwrap())),
//!     Event::new(480, Message::Meta(MetaMessage::EndOfTrack)),
//! ]));
//!
//! let bytes = midi.to_midi_bytes();
//! let (decoded, rest) = MidiFile::decode(&bytes).expect("Decode the encoded file");
//!
//! assert!(rest.is_empty());
//! assert_eq!(decoded, midi);
//! assert_eq!(decoded.length().unwrap(), 0.5);
//! ```
//!
//! ## Library Structure
//!
//! - **[`chunk`]**: Chunk framing plus the header and track chunk types and every message.
//! - **[`file`]**: The [`file::MidiFile`] aggregate, track merging and timelines.
//! - **[`reader`]** / **[`writer`]**: Decoding and encoding traits plus byte source helpers.
//! - **[`varlen`]**: Variable length quantities.
//! - **[`primitive`]**: Bit width restricted integers used by message fields.
//! - **[`time`]**: Tick, second and tempo conversions.
//! - **[`error`]**: The crate wide [`error::MidiError`].

pub mod chunk;
pub mod error;
pub mod file;
pub mod primitive;
pub mod reader;
pub mod time;
pub mod varlen;
pub mod writer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a raw MIDI Chunk.
/// A MIDI Chunk consists of a 4-character ASCII type identifier followed by a 32-bit unsigned
/// length and that many bytes of data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    /// 4 character chunk type
    pub chunk_type: [u8; 4],
    /// The data that follows the length
    pub data: Vec<u8>,
}

impl Chunk {
    /// Creates a chunk from its tag and payload
    pub fn new(chunk_type: [u8; 4], data: Vec<u8>) -> Self {
        Self { chunk_type, data }
    }

    /// Gets the length of the chunk's data
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns if the chunk has no attributed data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
