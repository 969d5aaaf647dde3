//! Integers restricted to the bit widths MIDI fields can carry on the wire.
//!
//! Values are checked when they are built, so every message holding them encodes without losing
//! bits.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MidiError, MidiResult};

/// Declares a restricted integer backed by `$inner` holding `$bits` bits
macro_rules! restricted_int {
    {$( $(#[$attr:meta])* $name:ident : $inner:ty => $bits:literal ; )*} => {$(
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($inner);

        impl $name {
            /// Mask of the bits this integer may use
            const MASK: $inner = (1 << $bits) - 1;

            /// The largest value this integer can hold
            pub const MAX: Self = Self(Self::MASK);

            /// The plain integer
            pub const fn as_int(self) -> $inner {
                self.0
            }

            /// Checks that `raw` fits, naming `field` in the error otherwise
            pub(crate) fn checked(field: &'static str, raw: $inner) -> MidiResult<Self> {
                if raw > Self::MASK {
                    Err(MidiError::InvalidValue {
                        field,
                        value: u64::from(raw),
                    })
                } else {
                    Ok(Self(raw))
                }
            }

            /// Keeps only the low bits of `raw`, for values already known to fit
            pub(crate) const fn masked(raw: $inner) -> Self {
                Self(raw & Self::MASK)
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = MidiError;
            fn try_from(raw: $inner) -> Result<Self, Self::Error> {
                Self::checked(concat!(stringify!($bits), " bit integer"), raw)
            }
        }

        impl From<$name> for $inner {
            fn from(restricted: $name) -> $inner {
                restricted.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        #[cfg(feature = "serde")]
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.0.serialize(serializer)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <$inner>::deserialize(deserializer)?;
                Self::try_from(raw).map_err(serde::de::Error::custom)
            }
        }
    )*};
}

restricted_int! {
    /// A 3 bit integer, the piece selector of a time code quarter frame
    U3: u8 => 3;
    /// A 4 bit integer, a MIDI channel or a time code nibble
    U4: u8 => 4;
    /// A 7 bit integer, the range of a MIDI data byte
    U7: u8 => 7;
    /// A 14 bit integer, two data bytes combined
    U14: u16 => 14;
    /// A 24 bit integer, the range of a Set Tempo payload
    U24: u32 => 24;
}
