//! System Common and System Exclusive Messages, the `0xF0..=0xF6` status range

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{MidiError, MidiResult, ProtocolError},
    primitive::{U14, U3, U4, U7},
    reader::Yieldable,
    writer::MidiWriteable,
};

/// Status byte starting a System Exclusive message
pub const SYSTEM_EXCLUSIVE: u8 = 0xF0;
/// Status byte of a MIDI Time Code Quarter Frame
pub const TIME_CODE_QUARTER_FRAME: u8 = 0xF1;
/// Status byte of a Song Position Pointer
pub const SONG_POSITION_POINTER: u8 = 0xF2;
/// Status byte of a Song Select
pub const SONG_SELECT: u8 = 0xF3;
/// Status byte of a Tune Request
pub const TUNE_REQUEST: u8 = 0xF6;
/// Byte terminating a System Exclusive message
pub const END_OF_EXCLUSIVE: u8 = 0xF7;

/// A system message, keyed by its full status byte
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SystemMessage {
    /// System Exclusive data. The payload excludes both the `0xF0` status and the `0xF7`
    /// terminator
    SystemExclusive(Vec<u8>),
    /// MIDI Time Code Quarter Frame
    TimeCodeQuarterFrame {
        /// Which piece of the time code this frame carries, bits 4-6 of the data byte
        message_type: U3,
        /// The piece's value, low nibble of the data byte
        values: U4,
    },
    /// Song Position Pointer, in MIDI beats since the start of the song
    SongPositionPointer(U14),
    /// Song Select
    SongSelect(U7),
    /// Tune Request
    TuneRequest,
}

/// A manufacturer's ID, the first byte (or three) of a System Exclusive payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ManufacturerId {
    /// One byte ID
    OneByte(u8),
    /// Three byte ID, always starting with `0x00`
    ThreeByte([u8; 3]),
}

impl SystemMessage {
    /// The status byte identifying this message
    pub fn status_byte(&self) -> u8 {
        match self {
            Self::SystemExclusive(_) => SYSTEM_EXCLUSIVE,
            Self::TimeCodeQuarterFrame { .. } => TIME_CODE_QUARTER_FRAME,
            Self::SongPositionPointer(_) => SONG_POSITION_POINTER,
            Self::SongSelect(_) => SONG_SELECT,
            Self::TuneRequest => TUNE_REQUEST,
        }
    }

    /// Number of bytes this message occupies on the wire, status byte included
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::SystemExclusive(data) => data.len() + 2,
            Self::TimeCodeQuarterFrame { .. } | Self::SongSelect(_) => 2,
            Self::SongPositionPointer(_) => 3,
            Self::TuneRequest => 1,
        }
    }

    /// Manufacturer that a System Exclusive message is addressed to
    pub fn manufacturer_id(&self) -> Option<ManufacturerId> {
        let Self::SystemExclusive(data) = self else {
            return None;
        };

        match data.as_slice() {
            [0x00, second, third, ..] => Some(ManufacturerId::ThreeByte([0x00, *second, *third])),
            [0x00, ..] | [] => None,
            [first, ..] => Some(ManufacturerId::OneByte(*first)),
        }
    }

    /// Decodes the data bytes that follow `status`, which must already be consumed
    pub fn decode_data(status: u8, buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let mut rest = buf;

        let message = match status {
            SYSTEM_EXCLUSIVE => {
                let end = rest
                    .iter()
                    .position(|byte| *byte == END_OF_EXCLUSIVE)
                    .ok_or(MidiError::TruncatedInput("system exclusive terminator"))?;

                let payload = rest.take_bytes(end, "system exclusive data")?.to_vec();
                rest.get_u8("system exclusive terminator")?;

                Self::SystemExclusive(payload)
            }

            TIME_CODE_QUARTER_FRAME => {
                let data = U7::checked("time code quarter frame", rest.get_u8("time code")?)?;
                Self::TimeCodeQuarterFrame {
                    message_type: U3::masked(data.as_int() >> 4),
                    values: U4::masked(data.as_int()),
                }
            }

            SONG_POSITION_POINTER => {
                let lsb = U7::checked("song position", rest.get_u8("song position")?)?;
                let msb = U7::checked("song position", rest.get_u8("song position")?)?;
                Self::SongPositionPointer(U14::masked(
                    lsb.as_int() as u16 | ((msb.as_int() as u16) << 7),
                ))
            }

            SONG_SELECT => Self::SongSelect(U7::checked("song select", rest.get_u8("song select")?)?),

            TUNE_REQUEST => Self::TuneRequest,

            other => return Err(ProtocolError::UnknownStatus(other).into()),
        };

        Ok((message, rest))
    }
}

impl MidiWriteable for SystemMessage {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.status_byte()];

        match self {
            Self::SystemExclusive(data) => {
                bytes.extend(data.iter());
                bytes.push(END_OF_EXCLUSIVE);
            }
            Self::TimeCodeQuarterFrame {
                message_type,
                values,
            } => bytes.push((message_type.as_int() << 4) | values.as_int()),
            Self::SongPositionPointer(position) => {
                let position = position.as_int();
                bytes.push((position & 0x7F) as u8);
                bytes.push((position >> 7) as u8);
            }
            Self::SongSelect(song) => bytes.push(song.as_int()),
            Self::TuneRequest => {}
        }

        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::{ManufacturerId, SystemMessage};
    use crate::{
        error::{MidiError, ProtocolError},
        primitive::{U14, U3, U4, U7},
        writer::MidiWriteable,
    };

    #[test]
    fn sys_ex_message_valid_parse() {
        let data = [0x01, 0xFF, 0x00, 0x21, 0xF7, 0x90];
        let (sysex, rest) =
            SystemMessage::decode_data(0xF0, &data).expect("Parse sysex message from bytes");

        assert_eq!(sysex, SystemMessage::SystemExclusive(vec![0x01, 0xFF, 0x00, 0x21]));
        assert_eq!(rest, &[0x90]);
        assert_eq!(sysex.encoded_len(), 6);
    }

    #[test]
    fn sys_ex_message_without_terminator_is_truncated() {
        let data = [0x01, 0xFF, 0x00, 0x21];
        assert_eq!(
            SystemMessage::decode_data(0xF0, &data),
            Err(MidiError::TruncatedInput("system exclusive terminator"))
        );
    }

    #[test]
    fn one_byte_manufacturer_id() {
        let sysex = SystemMessage::SystemExclusive(vec![0x41, 0x10, 0x42]);
        assert_eq!(sysex.manufacturer_id(), Some(ManufacturerId::OneByte(0x41)))
    }

    #[test]
    fn three_byte_manufacturer_id() {
        let sysex = SystemMessage::SystemExclusive(vec![0x00, 0x20, 0x33, 0x01]);
        assert_eq!(
            sysex.manufacturer_id(),
            Some(ManufacturerId::ThreeByte([0x00, 0x20, 0x33]))
        );

        let short = SystemMessage::SystemExclusive(vec![0x00, 0x20]);
        assert_eq!(short.manufacturer_id(), None);
        assert_eq!(SystemMessage::TuneRequest.manufacturer_id(), None);
    }

    #[test]
    fn time_code_splits_into_nibbles() {
        let (message, _) =
            SystemMessage::decode_data(0xF1, &[0x35]).expect("Parse quarter frame");
        assert_eq!(
            message,
            SystemMessage::TimeCodeQuarterFrame {
                message_type: U3::try_from(3u8).unwrap(),
                values: U4::try_from(5u8).unwrap(),
            }
        );
    }

    #[test]
    fn song_position_is_little_endian_seven_bit_groups() {
        let (message, _) =
            SystemMessage::decode_data(0xF2, &[0x01, 0x02]).expect("Parse song position");
        assert_eq!(
            message,
            SystemMessage::SongPositionPointer(U14::try_from(0x01u16 | (0x02 << 7)).unwrap())
        );
        assert_eq!(message.to_midi_bytes(), vec![0xF2, 0x01, 0x02]);
    }

    #[test]
    fn song_select_stores_the_song_number() {
        let (message, _) = SystemMessage::decode_data(0xF3, &[0x05]).expect("Parse song select");
        assert_eq!(message, SystemMessage::SongSelect(U7::try_from(5u8).unwrap()));
        assert_eq!(message.to_midi_bytes(), vec![0xF3, 0x05]);
    }

    #[test]
    fn undefined_system_statuses_are_rejected() {
        for status in [0xF4, 0xF5, 0xF7] {
            assert_eq!(
                SystemMessage::decode_data(status, &[]),
                Err(MidiError::Protocol(ProtocolError::UnknownStatus(status)))
            );
        }
    }

    #[test]
    fn encoded_length_matches_len() {
        let messages = [
            SystemMessage::SystemExclusive(vec![0x7E, 0x7F, 0x09, 0x01]),
            SystemMessage::SystemExclusive(vec![]),
            SystemMessage::TimeCodeQuarterFrame {
                message_type: U3::MAX,
                values: U4::MAX,
            },
            SystemMessage::SongPositionPointer(U14::MAX),
            SystemMessage::SongSelect(U7::MAX),
            SystemMessage::TuneRequest,
        ];

        for message in messages {
            let bytes = message.to_midi_bytes();
            assert_eq!(bytes.len(), message.encoded_len());
            assert_eq!(
                SystemMessage::decode_data(bytes[0], &bytes[1..]),
                Ok((message, &[][..]))
            );
        }
    }

    #[test]
    fn system_data_bytes_with_the_high_bit_are_invalid() {
        assert_eq!(
            SystemMessage::decode_data(0xF3, &[0xC8]),
            Err(MidiError::InvalidValue {
                field: "song select",
                value: 0xC8
            })
        );
        assert!(SystemMessage::decode_data(0xF2, &[0x7F, 0xFF]).is_err());
    }

    #[test]
    fn song_fields_reject_values_they_cannot_encode() {
        assert!(U7::try_from(200u8).is_err());
        assert!(U14::try_from(65_535u16).is_err());

        let furthest = SystemMessage::SongPositionPointer(U14::MAX);
        assert_eq!(furthest.to_midi_bytes(), vec![0xF2, 0x7F, 0x7F]);
    }
}
