use std::fmt;
use std::str::FromStr;

/// Errors produced while parsing a title identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TitleIdError {
    #[error("title id must be 16 hex characters, got {0}")]
    BadLength(usize),

    #[error("title id contains non-hex characters: '{0}'")]
    NotHex(String),
}

/// A 64-bit title identifier as the loader knows it.
///
/// Stored as the 16-hex-character string it was created from, case
/// preserved: directory names and config lines use it verbatim, and the
/// stock donor table itself mixes case. Equality is byte-wise on the
/// stored string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleId {
    raw: String,
    // Big-endian byte value of `raw`, decoded once at parse time.
    be: [u8; 8],
}

impl TitleId {
    /// Parses a 16-hex-character identifier string.
    pub fn parse(s: &str) -> Result<Self, TitleIdError> {
        if s.len() != 16 {
            return Err(TitleIdError::BadLength(s.len()));
        }
        let decoded = hex::decode(s).map_err(|_| TitleIdError::NotHex(s.to_string()))?;
        let mut be = [0u8; 8];
        be.copy_from_slice(&decoded);
        Ok(Self {
            raw: s.to_string(),
            be,
        })
    }

    /// The identifier string exactly as given at parse time.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The on-disk little-endian form of the identifier.
    ///
    /// The hex string, split into 2-character octet pairs, reassembled in
    /// reverse pair order and decoded. `"0100C6E00AF2C000"` becomes
    /// `00 C0 F2 0A E0 C6 00 01`.
    pub fn le_bytes(&self) -> [u8; 8] {
        let mut bytes = self.be;
        bytes.reverse();
        bytes
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TitleId {
    type Err = TitleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
