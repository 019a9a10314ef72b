//! Persisted config store.
//!
//! Hand-written two-section text format, fixed by what's already on
//! users' SD cards:
//!
//! ```text
//! [paths]
//! games_root = /switch/games
//! donor_root = /atmosphere/titles
//! romfs_style = 0
//!
//! [donors]
//! Blazblue = 0100C6E00AF2C000
//!
//! [assignments]
//! 0100C6E00AF2C000 = None
//! ```
//!
//! `None` is the literal absence marker. Parsing is strict: an
//! unparseable line aborts the load rather than silently dropping an
//! assignment record.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use donorswap_types::TitleId;
use tracing::info;

use crate::error::RegistryError;
use crate::registry::{DonorSlot, PathConfig, Registry};

const ABSENT_MARKER: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Paths,
    Donors,
    Assignments,
}

/// Loads and persists the registry at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the registry, synthesizing and persisting the stock one when
    /// no config file exists yet.
    pub fn load(&self, default_paths: PathConfig) -> Result<Registry, RegistryError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no config found, writing stock registry");
            let registry = Registry::stock(default_paths);
            self.save(&registry)?;
            return Ok(registry);
        }

        let text = fs::read_to_string(&self.path)?;
        parse(&text, default_paths)
    }

    /// Rewrites the config fully. Written to a sibling temp file first and
    /// renamed over the target, so a subsequent load never observes a
    /// partial file.
    pub fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("ini.tmp");
        fs::write(&tmp, render(registry))?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Discards all assignment state and rewrites the stock registry.
    pub fn reset(&self, paths: PathConfig) -> Result<Registry, RegistryError> {
        let registry = Registry::stock(paths);
        self.save(&registry)?;
        info!(path = %self.path.display(), "config reset to stock donor table");
        Ok(registry)
    }
}

fn render(registry: &Registry) -> String {
    let mut out = String::new();

    out.push_str("[paths]\n");
    out.push_str(&format!(
        "games_root = {}\n",
        registry.paths.games_root.display()
    ));
    out.push_str(&format!(
        "donor_root = {}\n",
        registry.paths.donor_root.display()
    ));
    out.push_str(&format!(
        "romfs_style = {}\n",
        registry.paths.romfs_style.selector()
    ));

    out.push_str("\n[donors]\n");
    for slot in &registry.slots {
        out.push_str(&format!("{} = {}\n", slot.display_name, slot.title_id));
    }

    out.push_str("\n[assignments]\n");
    for slot in &registry.slots {
        let game = slot.assigned_game.as_deref().unwrap_or(ABSENT_MARKER);
        out.push_str(&format!("{} = {}\n", slot.title_id, game));
    }

    out
}

fn parse(text: &str, default_paths: PathConfig) -> Result<Registry, RegistryError> {
    let mut paths = default_paths;
    let mut slots: Vec<DonorSlot> = Vec::new();
    let mut assignments: HashMap<String, Option<String>> = HashMap::new();
    let mut section = Section::None;
    let mut last_line = 0;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = match line {
                "[paths]" => Section::Paths,
                "[donors]" => Section::Donors,
                "[assignments]" => Section::Assignments,
                other => {
                    return Err(RegistryError::corrupt(
                        line_no,
                        format!("unknown section '{other}'"),
                    ));
                }
            };
            continue;
        }

        match section {
            Section::None => {
                return Err(RegistryError::corrupt(line_no, "entry outside any section"));
            }
            Section::Paths => parse_path_line(line, line_no, &mut paths)?,
            Section::Donors => {
                // Title id is on the right; split at the last '=' so a
                // display name containing '=' still parses.
                let Some((name, tid)) = line.rsplit_once('=') else {
                    return Err(RegistryError::corrupt(line_no, "expected 'name = title-id'"));
                };
                let name = name.trim();
                let title_id = TitleId::parse(tid.trim())
                    .map_err(|e| RegistryError::corrupt(line_no, e.to_string()))?;
                if name.is_empty() {
                    return Err(RegistryError::corrupt(line_no, "empty donor name"));
                }
                if slots.iter().any(|s| s.title_id == title_id) {
                    return Err(RegistryError::corrupt(
                        line_no,
                        format!("duplicate donor '{title_id}'"),
                    ));
                }
                slots.push(DonorSlot {
                    title_id,
                    display_name: name.to_string(),
                    assigned_game: None,
                });
            }
            Section::Assignments => {
                // Title id is on the left; the game name may contain '='.
                let Some((tid, game)) = line.split_once('=') else {
                    return Err(RegistryError::corrupt(
                        line_no,
                        "expected 'title-id = game-or-None'",
                    ));
                };
                let title_id = TitleId::parse(tid.trim())
                    .map_err(|e| RegistryError::corrupt(line_no, e.to_string()))?;
                let game = game.trim();
                if game.is_empty() {
                    return Err(RegistryError::corrupt(line_no, "empty assignment value"));
                }
                if !slots.iter().any(|s| s.title_id == title_id) {
                    return Err(RegistryError::corrupt(
                        line_no,
                        format!("assignment for unknown donor '{title_id}'"),
                    ));
                }
                let value = if game == ABSENT_MARKER {
                    None
                } else {
                    Some(game.to_string())
                };
                if assignments
                    .insert(title_id.as_str().to_string(), value)
                    .is_some()
                {
                    return Err(RegistryError::corrupt(
                        line_no,
                        format!("duplicate assignment for '{title_id}'"),
                    ));
                }
            }
        }
    }

    if slots.is_empty() {
        return Err(RegistryError::corrupt(last_line, "no donor entries"));
    }

    for slot in &mut slots {
        match assignments.remove(slot.title_id.as_str()) {
            Some(value) => slot.assigned_game = value,
            None => {
                return Err(RegistryError::corrupt(
                    last_line,
                    format!("missing assignment record for '{}'", slot.title_id),
                ));
            }
        }
    }

    Ok(Registry { paths, slots })
}

fn parse_path_line(
    line: &str,
    line_no: usize,
    paths: &mut PathConfig,
) -> Result<(), RegistryError> {
    let Some((key, value)) = line.split_once('=') else {
        return Err(RegistryError::corrupt(line_no, "expected 'key = value'"));
    };
    let value = value.trim();
    match key.trim() {
        "games_root" => paths.games_root = PathBuf::from(value),
        "donor_root" => paths.donor_root = PathBuf::from(value),
        "romfs_style" => {
            paths.romfs_style = value
                .parse()
                .map_err(|_| RegistryError::corrupt(line_no, format!("bad romfs_style '{value}'")))?;
        }
        other => {
            return Err(RegistryError::corrupt(
                line_no,
                format!("unknown path key '{other}'"),
            ));
        }
    }
    Ok(())
}
