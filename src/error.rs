//! Error types shared by every decoder and encoder in the crate

use thiserror::Error;

/// Result alias used throughout the crate
pub type MidiResult<T> = Result<T, MidiError>;

/// Any failure raised while decoding or encoding MIDI data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MidiError {
    /// Fewer bytes remain than the structure being read declares it needs
    #[error("Reached end of input while reading {0}")]
    TruncatedInput(&'static str),
    /// Bytes are present but structurally invalid
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// A field value is outside of its allowed range
    #[error("Value {value:#x} is out of range for {field}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// The value that was rejected
        value: u64,
    },
    /// A meta message payload does not have the length its type requires
    #[error("Meta message {meta_type:#04x} expects {expected} bytes of data, found {found}")]
    InvalidLength {
        /// Meta type byte
        meta_type: u8,
        /// Length required by the meta type
        expected: usize,
        /// Length declared on the wire
        found: usize,
    },
    /// A whole-file timeline operation was requested on an asynchronous (format 2) file
    #[error("Cannot {0} a format 2 (asynchronous) file")]
    UnsupportedOperation(&'static str),
}

/// Semantic violations of the file format
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// A chunk had a different tag from the one required at this position
    #[error("Expected a {expected:?} chunk, found {found:?}")]
    UnexpectedChunk {
        /// Required tag
        expected: [u8; 4],
        /// Tag present in the data
        found: [u8; 4],
    },
    /// Status byte does not belong to any supported message
    #[error("Unsupported status byte {0:#04x}")]
    UnknownStatus(u8),
    /// A data byte appeared where a status byte was needed and no status can be carried over
    #[error("Running status used before any status byte was seen")]
    MissingRunningStatus,
}

#[cfg(test)]
mod tests {
    use super::{MidiError, ProtocolError};

    #[test]
    fn protocol_errors_convert_into_midi_errors() {
        let err: MidiError = ProtocolError::MissingRunningStatus.into();
        assert_eq!(err, MidiError::Protocol(ProtocolError::MissingRunningStatus));
        assert_eq!(
            err.to_string(),
            "Protocol error: Running status used before any status byte was seen"
        );
    }
}
