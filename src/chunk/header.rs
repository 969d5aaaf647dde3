//! Header Chunk Enum and Struct Definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::chunk_types::HEADER_CHUNK,
    error::{MidiError, MidiResult},
    reader::{MidiDecode, Yieldable},
    writer::MidiWriteable,
    Chunk,
};

/// Length of every header chunk's data
pub const HEADER_LENGTH: usize = 6;

/// Header chunk data, including format, ntrks and division as 3 16 bit unsigned integers.
///
/// On the wire the fields are laid out as format, division, ntrks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// The MIDI format
    pub format: Format,
    /// Number of tracks
    pub ntrks: u16,
    /// Ticks per quarter note, kept as the raw 16 bits. See [`Division`] to interpret it
    pub division: u16,
}

impl Header {
    /// Creates a new header
    pub fn new(format: Format, ntrks: u16, division: u16) -> Self {
        Self {
            format,
            ntrks,
            division,
        }
    }
}

impl TryFrom<Chunk> for Header {
    type Error = MidiError;
    fn try_from(chunk: Chunk) -> Result<Self, Self::Error> {
        chunk.expect_type(HEADER_CHUNK)?;

        if chunk.len() != HEADER_LENGTH {
            return Err(MidiError::InvalidValue {
                field: "header length",
                value: chunk.len() as u64,
            });
        }

        let mut data = &chunk.data[..];
        let format = data.get_u16("header format")?.try_into()?;
        let division = data.get_u16("header division")?;
        let ntrks = data.get_u16("header track count")?;

        Ok(Self {
            format,
            ntrks,
            division,
        })
    }
}

impl From<Header> for Chunk {
    fn from(header: Header) -> Self {
        let mut data = header.format.to_midi_bytes();
        data.extend(header.division.to_midi_bytes());
        data.extend(header.ntrks.to_midi_bytes());

        Chunk::new(HEADER_CHUNK, data)
    }
}

impl MidiDecode for Header {
    fn decode(buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let (chunk, rest) = Chunk::decode(buf)?;
        Ok((chunk.try_into()?, rest))
    }
}

impl MidiWriteable for Header {
    fn to_midi_bytes(&self) -> Vec<u8> {
        Chunk::from(*self).to_midi_bytes()
    }
}

/// The overall organization of the MIDI file. Only three values are valid, making most of the 16
/// bits irrelevant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// The file contains a single multi-channel track
    Zero,
    /// The file contains one or more simultaneous tracks (or MIDI outputs) of a sequence
    #[default]
    One,
    /// The file contains one or more sequentially independent single-track patterns
    Two,
}

impl From<Format> for u16 {
    fn from(format: Format) -> Self {
        match format {
            Format::Zero => 0,
            Format::One => 1,
            Format::Two => 2,
        }
    }
}

impl MidiWriteable for Format {
    fn to_midi_bytes(&self) -> Vec<u8> {
        u16::from(*self).to_midi_bytes()
    }
}

impl TryFrom<u16> for Format {
    type Error = MidiError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Format::Zero),
            1 => Ok(Format::One),
            2 => Ok(Format::Two),
            _ => Err(MidiError::InvalidValue {
                field: "format",
                value: value as u64,
            }),
        }
    }
}

/// The meaning of the delta-times in the MIDI sequence. Decoding never interprets the division,
/// this is offered to callers that need SMPTE timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Division {
    /// When bit 15 is a 0, bits 14-0 represent ticks per quarter note
    Metrical(u16),
    /// When bit 15 is 1, bits 14-8 represent the negative SMPTE format,
    /// and bits 7-0 represent ticks per frame
    TimeCodeBased(SmpteTicks),
}

/// Division defined by time-code-based time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmpteTicks {
    /// Negative SMPTE format, one of -24, -25, -29 or -30 in well formed files
    pub smpte: i8,
    /// Ticks per frame
    pub tpf: u8,
}

impl SmpteTicks {
    /// Frames per second described by the SMPTE format
    pub fn frames_per_second(&self) -> u8 {
        self.smpte.unsigned_abs()
    }
}

impl From<u16> for Division {
    fn from(value: u16) -> Self {
        if value & 0x8000 == 0 {
            Division::Metrical(value)
        } else {
            // The high byte is already a two's complement negative number
            let [high, tpf] = value.to_be_bytes();
            Division::TimeCodeBased(SmpteTicks {
                smpte: high as i8,
                tpf,
            })
        }
    }
}

impl From<Division> for u16 {
    fn from(division: Division) -> Self {
        match division {
            Division::Metrical(ticks) => ticks & 0x7FFF,
            Division::TimeCodeBased(SmpteTicks { smpte, tpf }) => {
                u16::from_be_bytes([smpte as u8 | 0x80, tpf])
            }
        }
    }
}
