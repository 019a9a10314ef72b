//! The swap state machine: select donor, select game, swap.

use std::fs;

use donorswap_npdm as npdm;
use donorswap_registry::{ConfigStore, Registry};
use donorswap_relocate::{Layout, RelocateError, Relocator, SlotOutcome};
use donorswap_types::TitleId;
use serde::Serialize;
use tracing::info;

use crate::error::SwapError;
use crate::selection::Selection;

/// What a successful swap did.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub game: String,
    pub donor: TitleId,
    /// Game evicted back to storage to make room, if the slot was taken.
    pub evicted: Option<String>,
}

/// One display row of the current registry state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatus {
    pub display_name: String,
    pub title_id: String,
    pub assigned_game: Option<String>,
}

/// Orchestrates donor/game selection and the swap operations on top of
/// the relocator, patcher and registry store.
pub struct SwapController {
    store: ConfigStore,
    registry: Registry,
    relocator: Relocator,
    selection: Selection,
}

impl SwapController {
    /// Builds a controller over a loaded registry. The layout is derived
    /// from the registry's persisted path configuration.
    pub fn new(store: ConfigStore, registry: Registry) -> Self {
        let layout = Layout::from_config(&registry.paths);
        let relocator = Relocator::new(layout, store.clone());
        Self {
            store,
            registry,
            relocator,
            selection: Selection::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn layout(&self) -> &Layout {
        self.relocator.layout()
    }

    /// Selects a donor by title id or display name; `None` clears the
    /// selection. No side effects beyond the in-memory selection.
    pub fn select_donor(&mut self, key: Option<&str>) -> Result<(), SwapError> {
        match key {
            None => self.selection.clear_donor(),
            Some(key) => {
                let slot = self
                    .registry
                    .find_slot(key)
                    .ok_or_else(|| SwapError::DonorNotFound(key.to_string()))?;
                self.selection.donor = Some(slot.title_id.clone());
            }
        }
        Ok(())
    }

    /// Selects a game by folder name, validated to exist under the games
    /// root; `None` clears the selection.
    pub fn select_game(&mut self, name: Option<&str>) -> Result<(), SwapError> {
        match name {
            None => self.selection.clear_game(),
            Some(name) => {
                let root = self.layout().game_root(name)?;
                if !root.is_dir() {
                    return Err(SwapError::GameNotFound(name.to_string()));
                }
                self.selection.game = Some(name.to_string());
            }
        }
        Ok(())
    }

    /// Lists game folders in storage, sorted by name.
    pub fn list_games(&self) -> Result<Vec<String>, SwapError> {
        let mut games = Vec::new();
        for entry in fs::read_dir(self.layout().games_root())? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                games.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        games.sort();
        Ok(games)
    }

    /// Installs the selected game into the selected donor slot.
    ///
    /// A slot occupied by a *different* game is evicted back to storage
    /// first; if that eviction fails, the swap aborts before the install.
    /// With `patch_npdm`, the game's manifest is rewritten under the
    /// donor's identity before the move.
    pub fn swap_in(&mut self, patch_npdm: bool) -> Result<SwapOutcome, SwapError> {
        let (Some(donor), Some(game)) = (self.selection.donor.clone(), self.selection.game.clone())
        else {
            return Err(SwapError::NothingSelected);
        };

        if let Some(holder) = self.registry.slot_for_game(&game)
            && holder.title_id != donor
        {
            return Err(SwapError::GameInUse {
                game,
                donor: holder.title_id.as_str().to_string(),
            });
        }

        let mut evicted = None;
        if let Some(slot) = self.registry.find_slot(donor.as_str())
            && let Some(resident) = slot.assigned_game.clone()
        {
            if resident == game {
                return Err(SwapError::Relocate(RelocateError::AlreadyOccupied {
                    donor: donor.as_str().to_string(),
                    game: resident,
                }));
            }
            info!(donor = %donor, resident = %resident, "evicting resident game");
            self.relocator.restore(&mut self.registry, donor.as_str())?;
            evicted = Some(resident);
        }

        if patch_npdm {
            npdm::patch(&self.layout().npdm_path(&game)?, &donor)?;
        }

        self.relocator
            .install(&mut self.registry, &game, donor.as_str())?;

        Ok(SwapOutcome {
            game,
            donor,
            evicted,
        })
    }

    /// Restores the selected donor's game back to storage. Returns the
    /// restored game's name.
    pub fn swap_out(&mut self) -> Result<String, SwapError> {
        let Some(donor) = self.selection.donor.clone() else {
            return Err(SwapError::NoDonorSelected);
        };
        Ok(self.relocator.restore(&mut self.registry, donor.as_str())?)
    }

    /// Restores every occupied slot, one outcome per slot.
    pub fn restore_all(&mut self) -> Vec<SlotOutcome> {
        self.relocator.restore_all(&mut self.registry)
    }

    /// Discards all assignment state and rewrites the stock registry.
    /// The in-memory selection survives.
    pub fn reset_config(&mut self) -> Result<(), SwapError> {
        let paths = self.registry.paths.clone();
        self.registry = self.store.reset(paths)?;
        Ok(())
    }

    /// Per-slot display rows of the current registry state.
    pub fn status(&self) -> Vec<SlotStatus> {
        self.registry
            .slots
            .iter()
            .map(|s| SlotStatus {
                display_name: s.display_name.clone(),
                title_id: s.title_id.as_str().to_string(),
                assigned_game: s.assigned_game.clone(),
            })
            .collect()
    }
}
