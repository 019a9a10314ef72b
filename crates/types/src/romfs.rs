use std::fmt;
use std::str::FromStr;

/// Error for an unrecognized RomFs style selector.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown RomFs style '{0}' (expected 0, 1 or 2)")]
pub struct RomfsStyleError(pub String);

/// Layout variant of a game's asset subtree.
///
/// Loaders accept the assets either as a plain `RomFs/` directory or as a
/// single packed image under one of two file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RomfsStyle {
    /// `RomFs/` directory.
    #[default]
    Dir,
    /// `RomFs.bin` packed image.
    Bin,
    /// `RomFs.romfs` packed image.
    Romfs,
}

impl RomfsStyle {
    /// Relative name of the asset subtree under a game or donor root.
    pub fn subpath(&self) -> &'static str {
        match self {
            RomfsStyle::Dir => "RomFs",
            RomfsStyle::Bin => "RomFs.bin",
            RomfsStyle::Romfs => "RomFs.romfs",
        }
    }

    /// True when the asset subtree is a directory rather than a file.
    pub fn is_dir(&self) -> bool {
        matches!(self, RomfsStyle::Dir)
    }

    /// The persisted selector digit.
    pub fn selector(&self) -> u8 {
        match self {
            RomfsStyle::Dir => 0,
            RomfsStyle::Bin => 1,
            RomfsStyle::Romfs => 2,
        }
    }

    /// Parses the persisted selector digit.
    pub fn from_selector(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(RomfsStyle::Dir),
            1 => Some(RomfsStyle::Bin),
            2 => Some(RomfsStyle::Romfs),
            _ => None,
        }
    }
}

impl fmt::Display for RomfsStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

impl FromStr for RomfsStyle {
    type Err = RomfsStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "dir" => Ok(RomfsStyle::Dir),
            "1" | "bin" => Ok(RomfsStyle::Bin),
            "2" | "romfs" => Ok(RomfsStyle::Romfs),
            other => Err(RomfsStyleError(other.to_string())),
        }
    }
}
