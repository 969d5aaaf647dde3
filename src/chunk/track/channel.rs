//! Channel voice messages, the `0x80..=0xEF` status range

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{MidiResult, ProtocolError},
    primitive::{U14, U4, U7},
    reader::Yieldable,
    writer::MidiWriteable,
};

/// Field name reported when a decoded data byte has its high bit set
const DATA_FIELD: &str = "channel message data";

/// A MIDI channel message, the channel it is addressed to plus what it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMessage {
    /// Channel number, 0 through 15
    pub channel: U4,
    /// The message body
    pub kind: ChannelMessageKind,
}

/// The concrete shape of a channel message. Every field is a 7 bit data byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelMessageKind {
    /// Turn Off event
    /// This message is sent when a note is released
    NoteOff {
        /// Note key
        note: U7,
        /// Release velocity
        velocity: U7,
    },
    /// Turn On event
    /// This message is sent when a note is depressed
    NoteOn {
        /// Note key
        note: U7,
        /// Note velocity
        velocity: U7,
    },
    /// Polyphonic Key Pressure
    /// This message is most often sent by pressing down a key after it "bottoms out"
    Aftertouch {
        /// Note key
        note: U7,
        /// Pressure
        value: U7,
    },
    /// Control change
    /// This message is sent when a controller value changes. Controllers include devices such as
    /// pedals and levers. Certain controller numbers are reserved.
    ControlChange {
        /// Controller number
        control: U7,
        /// New value
        value: U7,
    },
    /// Program change.
    /// This message is sent when the patch number changes
    ProgramChange {
        /// New program number
        program: U7,
    },
    /// Channel Pressure
    /// This message is most often sent by pressing down on a key after it "bottoms out"
    ChannelAftertouch {
        /// Pressure
        value: U7,
    },
    /// Pitch Wheel Change
    /// This message is sent to indicate a change in the pitch wheel as measured by a fourteen bit
    /// value, split across two data bytes.
    PitchBend {
        /// Least significant 7 bits
        lsb: U7,
        /// Most significant 7 bits
        msb: U7,
    },
}

impl ChannelMessageKind {
    /// The high nibble of the status byte
    pub fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => 0x8,
            Self::NoteOn { .. } => 0x9,
            Self::Aftertouch { .. } => 0xA,
            Self::ControlChange { .. } => 0xB,
            Self::ProgramChange { .. } => 0xC,
            Self::ChannelAftertouch { .. } => 0xD,
            Self::PitchBend { .. } => 0xE,
        }
    }

    /// The data bytes that follow the status byte
    fn data_bytes(&self) -> Vec<u8> {
        let bytes = match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                vec![note, velocity]
            }
            Self::Aftertouch { note, value } => vec![note, value],
            Self::ControlChange { control, value } => vec![control, value],
            Self::ProgramChange { program } => vec![program],
            Self::ChannelAftertouch { value } => vec![value],
            Self::PitchBend { lsb, msb } => vec![lsb, msb],
        };

        bytes.into_iter().map(U7::as_int).collect()
    }
}

/// Number of data bytes that follow a channel status nibble
fn data_len(nibble: u8) -> usize {
    match nibble {
        0xC | 0xD => 1,
        _ => 2,
    }
}

impl ChannelMessage {
    /// Creates a message, checking that the channel fits in 4 bits
    pub fn new(channel: u8, kind: ChannelMessageKind) -> MidiResult<Self> {
        Ok(Self {
            channel: U4::checked("channel", channel)?,
            kind,
        })
    }

    /// A Note On message
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> MidiResult<Self> {
        Self::new(
            channel,
            ChannelMessageKind::NoteOn {
                note: U7::checked("note", note)?,
                velocity: U7::checked("velocity", velocity)?,
            },
        )
    }

    /// A Note Off message
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> MidiResult<Self> {
        Self::new(
            channel,
            ChannelMessageKind::NoteOff {
                note: U7::checked("note", note)?,
                velocity: U7::checked("velocity", velocity)?,
            },
        )
    }

    /// A Control Change message
    pub fn control_change(channel: u8, control: u8, value: u8) -> MidiResult<Self> {
        Self::new(
            channel,
            ChannelMessageKind::ControlChange {
                control: U7::checked("control", control)?,
                value: U7::checked("control value", value)?,
            },
        )
    }

    /// A Program Change message
    pub fn program_change(channel: u8, program: u8) -> MidiResult<Self> {
        Self::new(
            channel,
            ChannelMessageKind::ProgramChange {
                program: U7::checked("program", program)?,
            },
        )
    }

    /// A Pitch Bend message from a combined 14 bit value
    pub fn pitch_bend(channel: u8, value: u16) -> MidiResult<Self> {
        let value = U14::checked("pitch bend", value)?.as_int();

        Self::new(
            channel,
            ChannelMessageKind::PitchBend {
                lsb: U7::masked((value & 0x7F) as u8),
                msb: U7::masked((value >> 7) as u8),
            },
        )
    }

    /// Combined 14 bit pitch bend value, `None` for every other message
    pub fn pitch_bend_value(&self) -> Option<U14> {
        match self.kind {
            ChannelMessageKind::PitchBend { lsb, msb } => Some(U14::masked(
                ((msb.as_int() as u16) << 7) | lsb.as_int() as u16,
            )),
            _ => None,
        }
    }

    /// Status byte, message type in the high nibble and channel in the low one
    pub fn status_byte(&self) -> u8 {
        (self.kind.status_nibble() << 4) | self.channel.as_int()
    }

    /// Number of bytes this message occupies on the wire, status byte included
    pub fn encoded_len(&self) -> usize {
        1 + data_len(self.kind.status_nibble())
    }

    /// Decodes the data bytes that follow `status`. The status byte itself must already be
    /// consumed, which lets running status reuse a status from an earlier message.
    pub fn decode_data(status: u8, buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let mut rest = buf;
        let channel = U4::masked(status);
        let nibble = status >> 4;

        if !(0x8..=0xE).contains(&nibble) {
            return Err(ProtocolError::UnknownStatus(status).into());
        }

        let reads = rest.take_bytes(data_len(nibble), DATA_FIELD)?;
        let first = U7::checked(DATA_FIELD, reads[0])?;
        let second = match reads.get(1) {
            Some(byte) => U7::checked(DATA_FIELD, *byte)?,
            None => U7::default(),
        };

        let kind = match nibble {
            0x8 => ChannelMessageKind::NoteOff {
                note: first,
                velocity: second,
            },
            0x9 => ChannelMessageKind::NoteOn {
                note: first,
                velocity: second,
            },
            0xA => ChannelMessageKind::Aftertouch {
                note: first,
                value: second,
            },
            0xB => ChannelMessageKind::ControlChange {
                control: first,
                value: second,
            },
            0xC => ChannelMessageKind::ProgramChange { program: first },
            0xD => ChannelMessageKind::ChannelAftertouch { value: first },
            _ => ChannelMessageKind::PitchBend {
                lsb: first,
                msb: second,
            },
        };

        Ok((Self { channel, kind }, rest))
    }
}

impl MidiWriteable for ChannelMessage {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.status_byte()];
        bytes.extend(self.kind.data_bytes());

        bytes
    }
}
