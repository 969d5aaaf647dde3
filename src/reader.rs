//! MIDI byte readers, in memory byte spans are consumed front to back and files can be loaded
//! into memory

use std::{convert::Infallible, fs, path::Path};

use crate::error::{MidiError, MidiResult};

/// Trait that allows a certain amount of bytes to be yielded from the front of a buffer
pub trait Yieldable<'a> {
    /// Splits `n` bytes off of the front of the buffer, advancing it. `what` names the structure
    /// being read for error reporting
    fn take_bytes(&mut self, n: usize, what: &'static str) -> MidiResult<&'a [u8]>;

    /// Splits a single byte off of the front of the buffer
    fn get_u8(&mut self, what: &'static str) -> MidiResult<u8> {
        Ok(self.take_bytes(1, what)?[0])
    }

    /// Reads a big endian u16
    fn get_u16(&mut self, what: &'static str) -> MidiResult<u16> {
        let bytes = self.take_bytes(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a big endian u32
    fn get_u32(&mut self, what: &'static str) -> MidiResult<u32> {
        let bytes = self.take_bytes(4, what)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Looks at the next byte without consuming it
    fn peek(&self) -> Option<u8>;
}

impl<'a> Yieldable<'a> for &'a [u8] {
    fn take_bytes(&mut self, n: usize, what: &'static str) -> MidiResult<&'a [u8]> {
        if self.len() < n {
            return Err(MidiError::TruncatedInput(what));
        }

        let (head, tail) = (*self).split_at(n);
        *self = tail;

        Ok(head)
    }

    fn peek(&self) -> Option<u8> {
        self.first().copied()
    }
}

/// Types that decode from the front of a byte buffer, returning the unread remainder
pub trait MidiDecode: Sized {
    /// Decodes one value, returning it along with the bytes that follow it
    fn decode(buf: &[u8]) -> MidiResult<(Self, &[u8])>;
}

/// Trait that allows for different sources to be loaded as a contiguous MIDI byte buffer
pub trait MidiReadable {
    /// Error type that may be returned while loading the source
    type Error;
    /// Loads the complete byte buffer
    fn get_midi_bytes(self) -> Result<Vec<u8>, Self::Error>;
}

/// Wrapper struct to allow passing Vec<u8> to MidiReadable trait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiData(pub Vec<u8>);

impl MidiReadable for MidiData {
    type Error = Infallible;
    fn get_midi_bytes(self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.0)
    }
}

impl<PATH> MidiReadable for PATH
where
    PATH: AsRef<Path>,
{
    type Error = std::io::Error;
    fn get_midi_bytes(self) -> Result<Vec<u8>, Self::Error> {
        fs::read(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::{MidiData, MidiReadable, Yieldable};
    use crate::error::MidiError;

    #[test]
    fn slices_yield_from_the_front() {
        let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0xAA];
        let mut buf = &data[..];

        assert_eq!(buf.get_u16("test"), Ok(1));
        assert_eq!(buf.get_u32("test"), Ok(6));
        assert_eq!(buf.peek(), Some(0xAA));
        assert_eq!(buf.get_u8("test"), Ok(0xAA));
        assert!(buf.is_empty());
    }

    #[test]
    fn short_slices_report_truncation_without_advancing() {
        let data = [0x01, 0x02];
        let mut buf = &data[..];

        assert_eq!(buf.take_bytes(3, "chunk"), Err(MidiError::TruncatedInput("chunk")));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn midi_data_yields_its_bytes() {
        let bytes = MidiData(vec![1, 2, 3]).get_midi_bytes();
        assert_eq!(bytes, Ok(vec![1, 2, 3]));
    }

    #[test]
    fn missing_files_fail_to_load() {
        let data = "does/not/exist.mid".get_midi_bytes();
        assert!(data.is_err())
    }
}
