//! Chunk framing plus the header and track chunk types

use crate::{
    error::{MidiResult, ProtocolError},
    reader::{MidiDecode, Yieldable},
    writer::MidiWriteable,
    Chunk,
};

pub mod chunk_types;
pub mod header;
pub mod track;

impl Chunk {
    /// Fails unless this chunk carries the `expected` tag
    pub fn expect_type(&self, expected: [u8; 4]) -> MidiResult<()> {
        if self.chunk_type == expected {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedChunk {
                expected,
                found: self.chunk_type,
            }
            .into())
        }
    }
}

impl MidiDecode for Chunk {
    fn decode(buf: &[u8]) -> MidiResult<(Self, &[u8])> {
        let mut rest = buf;

        let tag = rest.take_bytes(4, "chunk type")?;
        let chunk_type = [tag[0], tag[1], tag[2], tag[3]];
        let length = rest.get_u32("chunk length")?;
        let data = rest.take_bytes(length as usize, "chunk data")?.to_vec();

        Ok((Self { chunk_type, data }, rest))
    }
}

/// Payloads are limited to `u32::MAX` bytes by the length field
impl MidiWriteable for Chunk {
    fn to_midi_bytes(&self) -> Vec<u8> {
        let Chunk { chunk_type, data } = self;
        debug_assert!(
            data.len() <= u32::MAX as usize,
            "chunk payload of {} bytes does not fit its length field",
            data.len()
        );

        let mut bytes = chunk_type.to_midi_bytes();
        bytes.extend((data.len() as u32).to_midi_bytes());
        bytes.extend(data.iter());

        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::chunk_types::{HEADER_CHUNK, TRACK_DATA_CHUNK};
    use crate::{
        error::{MidiError, ProtocolError},
        reader::MidiDecode,
        writer::MidiWriteable,
        Chunk,
    };

    #[test]
    fn chunk_decodes_tag_length_and_payload() {
        let bytes = [b't', b'e', b's', b't', 0, 0, 0, 2, 0xAA, 0xBB, 0xCC];
        let (chunk, rest) = Chunk::decode(&bytes).expect("Decode chunk");

        assert_eq!(chunk, Chunk::new(*b"test", vec![0xAA, 0xBB]));
        assert_eq!(chunk.len(), 2);
        assert_eq!(rest, &[0xCC]);
    }

    #[test]
    fn chunk_encodes_without_padding() {
        let chunk = Chunk::new(*b"MTrk", vec![0x00, 0xFF, 0x2F, 0x00]);
        assert_eq!(
            chunk.to_midi_bytes(),
            vec![b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn chunk_shorter_than_declared_is_truncated() {
        let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00];
        assert_eq!(
            Chunk::decode(&bytes),
            Err(MidiError::TruncatedInput("chunk data"))
        );

        assert_eq!(
            Chunk::decode(b"MTr"),
            Err(MidiError::TruncatedInput("chunk type"))
        );
    }

    #[test]
    fn empty_chunks_are_allowed() {
        let (chunk, rest) = Chunk::decode(b"MTrk\0\0\0\0").expect("Decode chunk");
        assert!(chunk.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn chunks_report_the_tag_they_expected() {
        let chunk = Chunk::new(*b"XFIH", vec![]);

        assert_eq!(chunk.expect_type(*b"XFIH"), Ok(()));
        assert_eq!(
            chunk.expect_type(HEADER_CHUNK),
            Err(MidiError::Protocol(ProtocolError::UnexpectedChunk {
                expected: HEADER_CHUNK,
                found: *b"XFIH"
            }))
        );
        assert!(chunk.expect_type(TRACK_DATA_CHUNK).is_err());
    }
}
