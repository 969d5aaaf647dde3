//! Meta Message Structs and Parsing

use tracing::{trace, warn};

use crate::{
    error::{MidiError, MidiResult},
    primitive::U24,
    reader::Yieldable,
    varlen,
    writer::MidiWriteable,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status byte introducing every meta message
pub const META_STATUS: u8 = 0xFF;
/// Meta type of an End of Track marker
pub const END_OF_TRACK: u8 = 0x2F;
/// Meta type of a Set Tempo message
pub const SET_TEMPO: u8 = 0x51;

/// A meta level message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaMessage {
    /// Sequence Number, tag 0x00
    SequenceNumber(u16),
    /// Text metadata, tag 0x01
    Text(String),
    /// Copyright, tag 0x02
    CopyrightNotice(String),
    /// Track name, tag 0x03
    TrackName(String),
    /// Instrument name, tag 0x04
    InstrumentName(String),
    /// Lyric, tag 0x05
    Lyric(String),
    /// Marker, tag 0x06
    Marker(String),
    /// Cue Point, tag 0x07
    CuePoint(String),
    /// Midi Channel Prefix, tag 0x20
    ChannelPrefix(u8),
    /// Midi Port Prefix, tag 0x21
    PortPrefix(u8),
    /// End of Track Identifier, tag 0x2F
    EndOfTrack,
    /// Tempo in microseconds per quarter note, tag 0x51
    SetTempo(U24),
    /// Smpte Offset, tag 0x54
    SmpteOffset(SmpteOffset),
    /// Time signature, tag 0x58
    TimeSignature(TimeSignature),
    /// Key Signature, tag 0x59
    KeySignature(KeySignature),
    /// Sequencer Specific, tag 0x7f
    SequencerSpecific(Vec<u8>),
    /// A meta type this crate does not recognize, kept byte for byte
    Unknown {
        /// The raw meta type byte
        meta_type: u8,
        /// The raw payload
        data: Vec<u8>,
    },
}

impl MetaMessage {
    /// Returns the specific message's meta type
    pub fn meta_type(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => 0x00,
            Self::Text(_) => 0x01,
            Self::CopyrightNotice(_) => 0x02,
            Self::TrackName(_) => 0x03,
            Self::InstrumentName(_) => 0x04,
            Self::Lyric(_) => 0x05,
            Self::Marker(_) => 0x06,
            Self::CuePoint(_) => 0x07,
            Self::ChannelPrefix(_) => 0x20,
            Self::PortPrefix(_) => 0x21,
            Self::EndOfTrack => END_OF_TRACK,
            Self::SetTempo(_) => SET_TEMPO,
            Self::SmpteOffset(_) => 0x54,
            Self::TimeSignature(_) => 0x58,
            Self::KeySignature(_) => 0x59,
            Self::SequencerSpecific(_) => 0x7F,
            Self::Unknown { meta_type, .. } => *meta_type,
        }
    }

    /// Text carried by the text family of meta messages
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text)
            | Self::CopyrightNotice(text)
            | Self::TrackName(text)
            | Self::InstrumentName(text)
            | Self::Lyric(text)
            | Self::Marker(text)
            | Self::CuePoint(text) => Some(text),
            _ => None,
        }
    }

    /// Number of payload bytes following the length field
    fn payload_len(&self) -> usize {
        match self {
            Self::SequenceNumber(_) | Self::KeySignature(_) => 2,
            Self::ChannelPrefix(_) | Self::PortPrefix(_) => 1,
            Self::EndOfTrack => 0,
            Self::SetTempo(_) => 3,
            Self::SmpteOffset(_) => 5,
            Self::TimeSignature(_) => 4,
            Self::SequencerSpecific(data) | Self::Unknown { data, .. } => data.len(),
            text => text.text().map_or(0, |text| text.bytes().filter(u8::is_ascii).count()),
        }
    }

    /// The payload that follows the length field
    fn payload(&self) -> Vec<u8> {
        match self {
            Self::SequenceNumber(val) => val.to_midi_bytes(),
            Self::ChannelPrefix(val) | Self::PortPrefix(val) => val.to_midi_bytes(),
            Self::EndOfTrack => vec![],
            Self::SetTempo(val) => val.as_int().to_midi_bytes()[1..].to_vec(),
            Self::SmpteOffset(val) => val.to_midi_bytes(),
            Self::TimeSignature(val) => val.to_midi_bytes(),
            Self::KeySignature(val) => val.to_midi_bytes(),
            Self::SequencerSpecific(val) | Self::Unknown { data: val, .. } => val.clone(),
            text => encode_text(text.text().unwrap_or_default()),
        }
    }

    /// Number of bytes this message occupies on the wire, status byte included
    pub fn encoded_len(&self) -> usize {
        let payload_len = self.payload_len();
        2 + varlen::encoded_len(payload_len as u64) + payload_len
    }

    /// Decodes everything after the `0xFF` status: the meta type, a variable length and the
    /// payload
    pub fn decode_data(buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let mut rest = buf;
        let meta_type = rest.get_u8("meta type")?;

        let (length, after_length) = varlen::decode(rest)?;
        rest = after_length;

        let length =
            usize::try_from(length).map_err(|_| MidiError::TruncatedInput("meta data"))?;
        let data = rest.take_bytes(length, "meta data")?;

        let message = match meta_type {
            0x00 => {
                let [high, low] = fixed_payload::<2>(meta_type, data)?;
                MetaMessage::SequenceNumber(u16::from_be_bytes([high, low]))
            }
            0x01 => MetaMessage::Text(decode_text(data)),
            0x02 => MetaMessage::CopyrightNotice(decode_text(data)),
            0x03 => MetaMessage::TrackName(decode_text(data)),
            0x04 => MetaMessage::InstrumentName(decode_text(data)),
            0x05 => MetaMessage::Lyric(decode_text(data)),
            0x06 => MetaMessage::Marker(decode_text(data)),
            0x07 => MetaMessage::CuePoint(decode_text(data)),

            0x20 => {
                let [channel] = fixed_payload::<1>(meta_type, data)?;
                MetaMessage::ChannelPrefix(channel)
            }
            0x21 => {
                let [port] = fixed_payload::<1>(meta_type, data)?;
                MetaMessage::PortPrefix(port)
            }
            END_OF_TRACK => {
                fixed_payload::<0>(meta_type, data)?;
                MetaMessage::EndOfTrack
            }

            SET_TEMPO => {
                let [high, mid, low] = fixed_payload::<3>(meta_type, data)?;
                MetaMessage::SetTempo(U24::masked(u32::from_be_bytes([0, high, mid, low])))
            }
            0x54 => {
                let [hours, minutes, seconds, frames, subframes] =
                    fixed_payload::<5>(meta_type, data)?;
                MetaMessage::SmpteOffset(SmpteOffset {
                    hours,
                    minutes,
                    seconds,
                    frames,
                    subframes,
                })
            }
            0x58 => {
                let [
                    numerator,
                    denominator_power,
                    clocks_per_click,
                    thirty_second_notes_per_quarter,
                ] = fixed_payload::<4>(meta_type, data)?;
                MetaMessage::TimeSignature(TimeSignature {
                    numerator,
                    denominator_power,
                    clocks_per_click,
                    thirty_second_notes_per_quarter,
                })
            }
            0x59 => {
                let [sharps_flats, scale] = fixed_payload::<2>(meta_type, data)?;
                MetaMessage::KeySignature(KeySignature {
                    sharps_flats: sharps_flats as i8,
                    scale,
                })
            }

            0x7F => MetaMessage::SequencerSpecific(data.to_vec()),

            _ => {
                trace!(meta_type, length, "keeping unrecognized meta message");
                MetaMessage::Unknown {
                    meta_type,
                    data: data.to_vec(),
                }
            }
        };

        Ok((message, rest))
    }
}

/// Requires a payload of exactly `N` bytes, the fixed size of `meta_type`
fn fixed_payload<const N: usize>(meta_type: u8, data: &[u8]) -> MidiResult<[u8; N]> {
    data.try_into().map_err(|_| MidiError::InvalidLength {
        meta_type,
        expected: N,
        found: data.len(),
    })
}

/// Decodes text as 7 bit ASCII, dropping any byte outside of it
fn decode_text(data: &[u8]) -> String {
    let text: String = data
        .iter()
        .filter(|byte| byte.is_ascii())
        .map(|byte| *byte as char)
        .collect();

    if text.len() != data.len() {
        warn!(
            dropped = data.len() - text.len(),
            "dropped non-ASCII bytes from meta text"
        );
    }

    text
}

/// Encodes text as 7 bit ASCII, dropping any character outside of it
fn encode_text(text: &str) -> Vec<u8> {
    let bytes: Vec<u8> = text.bytes().filter(u8::is_ascii).collect();

    if bytes.len() != text.len() {
        warn!(
            dropped = text.len() - bytes.len(),
            "dropped non-ASCII bytes from meta text"
        );
    }

    bytes
}

impl MidiWriteable for MetaMessage {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![META_STATUS, self.meta_type()];
        let payload_bytes = self.payload();

        bytes.extend(varlen::encode(payload_bytes.len() as u64));
        bytes.extend(payload_bytes);

        bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A key signature
pub struct KeySignature {
    /// Number of sharps when positive, flats when negative
    pub sharps_flats: i8,
    /// 0 for a major key, 1 for a minor key
    pub scale: u8,
}

impl KeySignature {
    /// Whether the key is minor
    pub fn is_minor(&self) -> bool {
        self.scale != 0
    }
}

impl MidiWriteable for KeySignature {
    fn to_midi_bytes(&self) -> Vec<u8> {
        vec![self.sharps_flats as u8, self.scale]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// An SMPTE Offset
pub struct SmpteOffset {
    /// Hours of offset
    pub hours: u8,
    /// Minutes of offset
    pub minutes: u8,
    /// Seconds of offset
    pub seconds: u8,
    /// Frames of offset
    pub frames: u8,
    /// Subframes of offset
    pub subframes: u8,
}

impl MidiWriteable for SmpteOffset {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let SmpteOffset {
            hours,
            minutes,
            seconds,
            frames,
            subframes,
        } = *self;
        vec![hours, minutes, seconds, frames, subframes]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A Time Signature
pub struct TimeSignature {
    /// The time signature's numerator
    pub numerator: u8,
    /// The time signature's denominator as a power of two
    pub denominator_power: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Thirty second notes per quarter
    pub thirty_second_notes_per_quarter: u8,
}

impl TimeSignature {
    /// The denominator itself, `2 ^ denominator_power`
    pub fn denominator(&self) -> u32 {
        1u32.checked_shl(self.denominator_power as u32).unwrap_or(0)
    }
}

impl MidiWriteable for TimeSignature {
    fn to_midi_bytes(&self) -> Vec<u8> {
        vec![
            self.numerator,
            self.denominator_power,
            self.clocks_per_click,
            self.thirty_second_notes_per_quarter,
        ]
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        chunk::track::meta::{KeySignature, MetaMessage, SmpteOffset, TimeSignature},
        error::MidiError,
        primitive::U24,
        writer::MidiWriteable,
    };

    /// Decodes a complete meta message, status byte included
    fn parse(data: &[u8]) -> Result<MetaMessage, MidiError> {
        assert_eq!(data.first(), Some(&0xFF), "Meta messages start with 0xFF");
        let (message, rest) = MetaMessage::decode_data(&data[1..])?;
        assert!(rest.is_empty());
        Ok(message)
    }

    #[test]
    fn test_tempo_event() {
        let data = [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]; // 500,000 microseconds/quarter note
        assert_eq!(
            parse(&data),
            Ok(MetaMessage::SetTempo(U24::try_from(500_000u32).unwrap()))
        );
    }

    #[test]
    fn test_time_signature_denominator() {
        let data = [0xFF, 0x58, 0x04, 0x06, 0x03, 0x24, 0x08];
        let Ok(MetaMessage::TimeSignature(signature)) = parse(&data) else {
            panic!("Expected a time signature");
        };

        assert_eq!(signature.numerator, 6);
        assert_eq!(signature.denominator(), 8);
    }

    #[test]
    fn test_minor_key() {
        let data = [0xFF, 0x59, 0x02, 0xFD, 0x01]; // Three flats, minor
        let Ok(MetaMessage::KeySignature(key)) = parse(&data) else {
            panic!("Expected a key signature");
        };

        assert_eq!(key.sharps_flats, -3);
        assert!(key.is_minor());
    }

    #[test]
    fn test_invalid_length() {
        let data = [0xFF, 0x51, 0x02, 0x07, 0xA1];
        assert_eq!(
            parse(&data),
            Err(MidiError::InvalidLength {
                meta_type: 0x51,
                expected: 3,
                found: 2
            })
        );

        let data = [0xFF, 0x2F, 0x01, 0x00];
        assert_eq!(
            parse(&data),
            Err(MidiError::InvalidLength {
                meta_type: 0x2F,
                expected: 0,
                found: 1
            })
        );
    }

    #[test]
    fn test_out_of_space() {
        assert_eq!(
            MetaMessage::decode_data(&[]),
            Err(MidiError::TruncatedInput("meta type"))
        );
        assert_eq!(
            MetaMessage::decode_data(&[0x00, 0x02, 0x02]),
            Err(MidiError::TruncatedInput("meta data"))
        );
        assert_eq!(
            MetaMessage::decode_data(&[0x01]),
            Err(MidiError::TruncatedInput("variable length quantity"))
        );
    }

    #[test]
    fn non_ascii_text_is_dropped() {
        let data = [0xFF, 0x03, 0x05, b'P', 0xC3, 0xA9, b'r', b'e'];
        assert_eq!(parse(&data), Ok(MetaMessage::TrackName("Pre".to_string())));

        let message = MetaMessage::Lyric("caf\u{e9}".to_string());
        let bytes = message.to_midi_bytes();
        assert_eq!(bytes, vec![0xFF, 0x05, 0x03, b'c', b'a', b'f']);
        assert_eq!(bytes.len(), message.encoded_len());
    }

    #[test]
    fn long_payloads_use_multi_byte_lengths() {
        let message = MetaMessage::SequencerSpecific(vec![0x11; 200]);
        let bytes = message.to_midi_bytes();

        assert_eq!(&bytes[..4], &[0xFF, 0x7F, 0x81, 0x48]);
        assert_eq!(bytes.len(), message.encoded_len());
        assert_eq!(parse(&bytes), Ok(message));
    }

    #[test]
    fn text_accessor_covers_text_family() {
        assert_eq!(MetaMessage::Marker("A".to_string()).text(), Some("A"));
        assert_eq!(MetaMessage::EndOfTrack.text(), None);
    }

    #[test]
    fn every_meta_message_encodes_byte_exact() {
        let cases: Vec<(MetaMessage, Vec<u8>)> = vec![
            (
                MetaMessage::SequenceNumber(1),
                vec![0xFF, 0x00, 0x02, 0x00, 0x01],
            ),
            (
                MetaMessage::Text("Hello".to_string()),
                vec![0xFF, 0x01, 0x05, b'H', b'e', b'l', b'l', b'o'],
            ),
            (
                MetaMessage::CopyrightNotice("Copyright".to_string()),
                vec![0xFF, 0x02, 0x09, b'C', b'o', b'p', b'y', b'r', b'i', b'g', b'h', b't'],
            ),
            (
                MetaMessage::TrackName("Track 1".to_string()),
                vec![0xFF, 0x03, 0x07, b'T', b'r', b'a', b'c', b'k', b' ', b'1'],
            ),
            (
                MetaMessage::InstrumentName("Piano".to_string()),
                vec![0xFF, 0x04, 0x05, b'P', b'i', b'a', b'n', b'o'],
            ),
            (
                MetaMessage::Lyric("Lyrics".to_string()),
                vec![0xFF, 0x05, 0x06, b'L', b'y', b'r', b'i', b'c', b's'],
            ),
            (
                MetaMessage::Marker("Marker".to_string()),
                vec![0xFF, 0x06, 0x06, b'M', b'a', b'r', b'k', b'e', b'r'],
            ),
            (
                MetaMessage::CuePoint("Cue".to_string()),
                vec![0xFF, 0x07, 0x03, b'C', b'u', b'e'],
            ),
            (
                MetaMessage::ChannelPrefix(0x05),
                vec![0xFF, 0x20, 0x01, 0x05],
            ),
            (
                MetaMessage::PortPrefix(0x02),
                vec![0xFF, 0x21, 0x01, 0x02],
            ),
            (
                MetaMessage::EndOfTrack,
                vec![0xFF, 0x2F, 0x00],
            ),
            (
                MetaMessage::SetTempo(U24::try_from(1_000_000u32).unwrap()),
                vec![0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40],
            ),
            (
                MetaMessage::SmpteOffset(SmpteOffset {
                    hours: 1,
                    minutes: 32,
                    seconds: 21,
                    frames: 16,
                    subframes: 0,
                }),
                vec![0xFF, 0x54, 0x05, 0x01, 0x20, 0x15, 0x10, 0x00],
            ),
            (
                MetaMessage::TimeSignature(TimeSignature {
                    numerator: 4,
                    denominator_power: 2,
                    clocks_per_click: 24,
                    thirty_second_notes_per_quarter: 8,
                }),
                vec![0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08],
            ),
            (
                MetaMessage::KeySignature(KeySignature {
                    sharps_flats: 2,
                    scale: 0,
                }),
                vec![0xFF, 0x59, 0x02, 0x02, 0x00],
            ),
            (
                MetaMessage::SequencerSpecific(vec![0x01, 0x02, 0x03]),
                vec![0xFF, 0x7F, 0x03, 0x01, 0x02, 0x03],
            ),
            (
                MetaMessage::Unknown {
                    meta_type: 0x99,
                    data: vec![0x01, 0x02, 0x03]
                },
                vec![0xFF, 0x99, 0x03, 0x01, 0x02, 0x03],
            ),
        ];

        for (message, data) in cases {
            assert_eq!(parse(&data), Ok(message.clone()));
            assert_eq!(message.to_midi_bytes(), data);
            assert_eq!(message.encoded_len(), data.len());
        }
    }

    #[test]
    fn tempo_beyond_24_bits_is_unrepresentable() {
        assert_eq!(
            U24::try_from(16_777_216u32),
            Err(MidiError::InvalidValue {
                field: "24 bit integer",
                value: 16_777_216
            })
        );

        let slowest = MetaMessage::SetTempo(U24::MAX);
        assert_eq!(slowest.to_midi_bytes(), vec![0xFF, 0x51, 0x03, 0xFF, 0xFF, 0xFF]);
        assert_eq!(parse(&slowest.to_midi_bytes()), Ok(slowest));
    }
}
