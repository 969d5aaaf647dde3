//! The three message families and status byte dispatch, including running status

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    channel::ChannelMessage,
    meta::{MetaMessage, META_STATUS},
    system::SystemMessage,
};
use crate::{
    error::{MidiResult, ProtocolError},
    reader::Yieldable,
    writer::MidiWriteable,
};

/// Any message that may occur in a track
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Message {
    /// A channel voice message
    Channel(ChannelMessage),
    /// A system common or system exclusive message
    System(SystemMessage),
    /// Specifies non-MIDI information useful to this format or to sequencers
    Meta(MetaMessage),
}

impl Message {
    /// Decodes one message from the front of `buf`.
    ///
    /// `running_status` is the status byte of the previous message in the same track. When `buf`
    /// starts with a data byte instead of a status byte, that carried status is used and the data
    /// byte becomes the first byte of the message's payload.
    pub fn decode(buf: &[u8], running_status: Option<u8>) -> MidiResult<(Self, &[u8])> {
        let mut rest = buf;

        let status = match rest.peek() {
            Some(byte) if byte < 0x80 => {
                running_status.ok_or(ProtocolError::MissingRunningStatus)?
            }
            _ => rest.get_u8("status byte")?,
        };

        match status {
            0x80..=0xEF => {
                let (message, rest) = ChannelMessage::decode_data(status, rest)?;
                Ok((Self::Channel(message), rest))
            }
            0xF0..=0xF6 => {
                let (message, rest) = SystemMessage::decode_data(status, rest)?;
                Ok((Self::System(message), rest))
            }
            META_STATUS => {
                let (message, rest) = MetaMessage::decode_data(rest)?;
                Ok((Self::Meta(message), rest))
            }
            other => Err(ProtocolError::UnknownStatus(other).into()),
        }
    }

    /// Status byte that starts this message on the wire
    pub fn status_byte(&self) -> u8 {
        match self {
            Self::Channel(message) => message.status_byte(),
            Self::System(message) => message.status_byte(),
            Self::Meta(_) => META_STATUS,
        }
    }

    /// Number of bytes this message occupies on the wire, status byte included
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Channel(message) => message.encoded_len(),
            Self::System(message) => message.encoded_len(),
            Self::Meta(message) => message.encoded_len(),
        }
    }

    /// Whether this is a meta message
    pub fn is_meta(&self) -> bool {
        matches!(self, Self::Meta(_))
    }

    /// Whether this is an End of Track marker
    pub fn is_end_of_track(&self) -> bool {
        matches!(self, Self::Meta(MetaMessage::EndOfTrack))
    }

    /// The tempo set by a Set Tempo message
    pub fn tempo(&self) -> Option<u32> {
        match self {
            Self::Meta(MetaMessage::SetTempo(tempo)) => Some(tempo.as_int()),
            _ => None,
        }
    }
}

impl MidiWriteable for Message {
    fn to_midi_bytes(&self) -> Vec<u8> {
        match self {
            Self::Channel(message) => message.to_midi_bytes(),
            Self::System(message) => message.to_midi_bytes(),
            Self::Meta(message) => message.to_midi_bytes(),
        }
    }
}

impl From<ChannelMessage> for Message {
    fn from(message: ChannelMessage) -> Self {
        Self::Channel(message)
    }
}

impl From<SystemMessage> for Message {
    fn from(message: SystemMessage) -> Self {
        Self::System(message)
    }
}

impl From<MetaMessage> for Message {
    fn from(message: MetaMessage) -> Self {
        Self::Meta(message)
    }
}
