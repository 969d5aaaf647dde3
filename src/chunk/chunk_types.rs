//! Chunk type constants

/// Creates a chunk type identifier
macro_rules! chunk_type {
    ($const_name:ident, $a:literal, $b:literal, $c:literal, $d:literal) => {
        /// MIDI chunk type
        pub const $const_name: [u8; 4] = [$a, $b, $c, $d];
    };
}

chunk_type!(HEADER_CHUNK, b'M', b'T', b'h', b'd');
chunk_type!(TRACK_DATA_CHUNK, b'M', b'T', b'r', b'k');
