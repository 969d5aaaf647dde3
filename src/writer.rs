//! The `MidiWriteable` trait is central to translating data from the crate's internal
//! representations back into raw MIDI bytes. Where [`crate::reader::MidiDecode`] parses bytes
//! *into* Rust types, `MidiWriteable` takes those types and produces the canonical wire format,
//! so that a file can be inspected or edited and then written back out.

use std::io::Write;

/// A trait for types that can be encoded as MIDI-format bytes.
///
/// `MidiWriteable` is implemented by the big endian primitives the file format uses, as well as
/// by [`crate::Chunk`], every message family, events, tracks and whole files.
pub trait MidiWriteable {
    /// Converts the data to a MIDI format byte sequence
    fn to_midi_bytes(&self) -> Vec<u8>;

    /// Writes the encoded bytes to any sink
    fn write_midi<W: Write>(&self, mut sink: W) -> std::io::Result<()> {
        sink.write_all(&self.to_midi_bytes())
    }
}

impl MidiWriteable for u8 {
    fn to_midi_bytes(&self) -> Vec<u8> {
        vec![*self]
    }
}

impl MidiWriteable for u16 {
    fn to_midi_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl MidiWriteable for u32 {
    fn to_midi_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl MidiWriteable for [u8; 4] {
    fn to_midi_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}
