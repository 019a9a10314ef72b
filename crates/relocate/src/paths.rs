//! Path layout for game storage and donor slots.
//!
//! Pure construction from the configured roots and fixed relative names,
//! no I/O. Every game-name component is validated before a path is built:
//! a crafted folder name must not be able to escape the configured roots.

use std::path::{Path, PathBuf};

use donorswap_registry::PathConfig;
use donorswap_types::{RomfsStyle, TitleId};

use crate::error::RelocateError;

/// Executable subtree directory name.
pub const EXEFS_DIR: &str = "ExeFs";
/// Manifest file name inside the executable subtree.
pub const NPDM_FILE: &str = "main.npdm";

/// Computes absolute paths for games and donor slots.
#[derive(Debug, Clone)]
pub struct Layout {
    games_root: PathBuf,
    donor_root: PathBuf,
    romfs: RomfsStyle,
}

impl Layout {
    pub fn from_config(cfg: &PathConfig) -> Self {
        Self {
            games_root: cfg.games_root.clone(),
            donor_root: cfg.donor_root.clone(),
            romfs: cfg.romfs_style,
        }
    }

    pub fn games_root(&self) -> &Path {
        &self.games_root
    }

    pub fn donor_root(&self) -> &Path {
        &self.donor_root
    }

    pub fn romfs_style(&self) -> RomfsStyle {
        self.romfs
    }

    /// Storage root of a game: `<games_root>/<game>`.
    pub fn game_root(&self, game: &str) -> Result<PathBuf, RelocateError> {
        validate_game_name(game)?;
        Ok(self.games_root.join(game))
    }

    /// Asset subtree of a game in storage.
    pub fn game_romfs(&self, game: &str) -> Result<PathBuf, RelocateError> {
        Ok(self.game_root(game)?.join(self.romfs.subpath()))
    }

    /// Executable subtree of a game in storage.
    pub fn game_exefs(&self, game: &str) -> Result<PathBuf, RelocateError> {
        Ok(self.game_root(game)?.join(EXEFS_DIR))
    }

    /// Manifest of a game in storage.
    pub fn npdm_path(&self, game: &str) -> Result<PathBuf, RelocateError> {
        Ok(self.game_exefs(game)?.join(NPDM_FILE))
    }

    /// Directory the loader scans for this donor: `<donor_root>/<title-id>`.
    /// Title ids are hex-only, structurally safe as a path component.
    pub fn donor_dir(&self, donor: &TitleId) -> PathBuf {
        self.donor_root.join(donor.as_str())
    }

    /// Asset subtree under a donor slot.
    pub fn donor_romfs(&self, donor: &TitleId) -> PathBuf {
        self.donor_dir(donor).join(self.romfs.subpath())
    }

    /// Executable subtree under a donor slot.
    pub fn donor_exefs(&self, donor: &TitleId) -> PathBuf {
        self.donor_dir(donor).join(EXEFS_DIR)
    }
}

/// Rejects game names that could escape the configured root: empty names,
/// path separators, and current/parent-directory segments.
pub fn validate_game_name(name: &str) -> Result<(), RelocateError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(RelocateError::InvalidName(name.to_string()));
    }
    Ok(())
}
