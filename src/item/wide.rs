use std::fmt;

use serde::de::Error as _;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

/// A fixed-width, NUL-padded UTF-16 text field of `N` code units.
///
/// At least one code unit is always reserved for the terminator, so the
/// longest storable text is `N - 1` code units.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct WideString<const N: usize>([u16; N]);

impl<const N: usize> WideString<N> {
    /// Encode `text` as UTF-16.
    ///
    /// Returns `None` when the encoded text does not leave room for the
    /// terminator.
    pub fn encode(text: &str) -> Option<Self> {
        let mut units = [0u16; N];
        let mut len = 0;
        for unit in text.encode_utf16() {
            if len + 1 >= N {
                return None;
            }
            units[len] = unit;
            len += 1;
        }
        Some(Self(units))
    }

    /// Decode the text up to the first NUL (or the whole buffer if there is
    /// none). Unpaired surrogates become U+FFFD.
    pub fn decode(&self) -> String {
        let end = self.0.iter().position(|&u| u == 0).unwrap_or(N);
        char::decode_utf16(self.0[..end].iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    /// Wrap raw code units as read from disk.
    pub const fn from_units(units: [u16; N]) -> Self {
        Self(units)
    }

    pub const fn units(&self) -> &[u16; N] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl<const N: usize> Default for WideString<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> fmt::Debug for WideString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideString<{N}>({:?})", self.decode())
    }
}

impl<const N: usize> fmt::Display for WideString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

impl<const N: usize> Serialize for WideString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.decode())
    }
}

impl<'de, const N: usize> Deserialize<'de> for WideString<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::encode(&text).ok_or_else(|| {
            D::Error::custom(format!(
                "'{}' is too long (max {} UTF-16 code units)",
                text,
                N - 1
            ))
        })
    }
}
