//! Delta timed track events

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::{error::MidiResult, varlen, writer::MidiWriteable};

/// A MIDI Event with a delta time and an attached Message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// Delta time is a variable-length representation of how many ticks to wait after the
    /// previous event of the same track before this one happens
    pub delta_time: u64,
    /// The message that occurs after the delta time is waited for
    pub message: Message,
}

impl Event {
    /// Creates a new event
    pub fn new(delta_time: u64, message: impl Into<Message>) -> Self {
        Self {
            delta_time,
            message: message.into(),
        }
    }

    /// Decodes a delta time and a message, resolving running status against `running_status`
    pub fn decode(buf: &[u8], running_status: Option<u8>) -> MidiResult<(Self, &[u8])> {
        let (delta_time, rest) = varlen::decode(buf)?;
        let (message, rest) = Message::decode(rest, running_status)?;

        Ok((
            Self {
                delta_time,
                message,
            },
            rest,
        ))
    }

    /// Copy of this event with a different delta time
    pub fn with_delta_time(&self, delta_time: u64) -> Self {
        Self {
            delta_time,
            message: self.message.clone(),
        }
    }
}

impl MidiWriteable for Event {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let mut bytes = varlen::encode(self.delta_time);
        bytes.extend(self.message.to_midi_bytes());

        bytes
    }
}
