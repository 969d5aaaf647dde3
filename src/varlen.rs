//! Variable-length quantities, the 7 bit group encoding MIDI uses for delta times and meta
//! message lengths

use crate::{
    error::{MidiError, MidiResult},
    reader::Yieldable,
};

/// Largest number of groups a `u64` can absorb without losing bits
const MAX_GROUPS: usize = 10;

/// Reads a variable length quantity from the front of `buf`, returning it and the bytes that
/// follow.
///
/// Each byte carries 7 bits of the value, most significant group first. A set msb means another
/// group follows.
pub fn decode(buf: &[u8]) -> MidiResult<(u64, &[u8])> {
    let mut rest = buf;
    let mut result: u64 = 0;

    for _ in 0..MAX_GROUPS {
        let byte = rest.get_u8("variable length quantity")?;

        if result > (u64::MAX >> 7) {
            return Err(MidiError::InvalidValue {
                field: "variable length quantity",
                value: result,
            });
        }

        result <<= 7;
        result |= (byte & 0x7F) as u64;

        if !msb_is_one(byte) {
            return Ok((result, rest));
        }
    }

    Err(MidiError::InvalidValue {
        field: "variable length quantity",
        value: result,
    })
}

/// Encodes a value as the minimal sequence of 7 bit groups. Zero is a single `0x00` byte
pub fn encode(mut value: u64) -> Vec<u8> {
    let mut bytes = Vec::new();

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        // Groups are collected least significant first, so every group but the first pushed
        // needs the continuation bit
        if !bytes.is_empty() {
            byte |= 0x80;
        }

        bytes.push(byte);

        if value == 0 {
            break;
        }
    }

    bytes.reverse();
    bytes
}

/// Number of bytes `encode` produces for a value
pub fn encoded_len(value: u64) -> usize {
    let bits = u64::BITS - value.leading_zeros();
    (bits as usize).div_ceil(7).max(1)
}

/// Returns true if the msb of a byte is 1
fn msb_is_one(byte: u8) -> bool {
    byte >> 7 == 1
}
