//! Install and restore operations over donor slots.

use donorswap_registry::{ConfigStore, Registry};
use donorswap_types::TitleId;
use tracing::{error, info};

use crate::error::{RelocateError, Step};
use crate::moves::move_subtree;
use crate::paths::Layout;

/// Outcome of one slot in a batch restore.
#[derive(Debug)]
pub struct SlotOutcome {
    pub title_id: TitleId,
    pub game: String,
    pub result: Result<(), RelocateError>,
}

/// Moves game bundles between storage and donor slots, keeping the
/// persisted registry in step with the filesystem.
///
/// A failed step halts the operation and is reported with the step that
/// failed; earlier successful moves are left in place. Recovery from
/// partial state is [`restore_all`](Relocator::restore_all) plus, in the
/// worst case, a config reset.
pub struct Relocator {
    layout: Layout,
    store: ConfigStore,
}

impl Relocator {
    pub fn new(layout: Layout, store: ConfigStore) -> Self {
        Self { layout, store }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Moves `game` from storage into `donor`'s slot.
    ///
    /// Preconditions, checked before any filesystem mutation: the slot is
    /// vacant, the donor directory is absent on disk, and the game folder
    /// exists in storage. On full success the assignment is recorded and
    /// the registry persisted.
    pub fn install(
        &self,
        registry: &mut Registry,
        game: &str,
        donor_key: &str,
    ) -> Result<(), RelocateError> {
        let game_root = self.layout.game_root(game)?;

        let slot = registry
            .find_slot(donor_key)
            .ok_or_else(|| RelocateError::UnknownDonor(donor_key.to_string()))?;
        if let Some(resident) = &slot.assigned_game {
            return Err(RelocateError::AlreadyOccupied {
                donor: slot.title_id.as_str().to_string(),
                game: resident.clone(),
            });
        }
        let tid = slot.title_id.clone();

        let donor_dir = self.layout.donor_dir(&tid);
        if donor_dir.exists() {
            return Err(RelocateError::DonorDirExists(donor_dir));
        }
        if !game_root.is_dir() {
            return Err(RelocateError::GameMissing(game.to_string()));
        }

        info!(game, donor = %tid, "installing game into donor slot");

        move_subtree(&self.layout.game_romfs(game)?, &self.layout.donor_romfs(&tid))
            .map_err(RelocateError::at_step(Step::MoveAssets))?;
        move_subtree(&self.layout.game_exefs(game)?, &self.layout.donor_exefs(&tid))
            .map_err(RelocateError::at_step(Step::MoveExec))?;
        self.remove_leftovers(game)?;

        let slot = registry
            .find_slot_mut(tid.as_str())
            .ok_or_else(|| RelocateError::UnknownDonor(donor_key.to_string()))?;
        slot.assigned_game = Some(game.to_string());
        self.store.save(registry)?;

        info!(game, donor = %tid, "install complete");
        Ok(())
    }

    /// Moves the game occupying `donor`'s slot back to storage.
    ///
    /// Returns the restored game's name. Preconditions: the slot is
    /// occupied and the donor directory exists on disk.
    pub fn restore(
        &self,
        registry: &mut Registry,
        donor_key: &str,
    ) -> Result<String, RelocateError> {
        let slot = registry
            .find_slot(donor_key)
            .ok_or_else(|| RelocateError::UnknownDonor(donor_key.to_string()))?;
        let tid = slot.title_id.clone();
        let Some(game) = slot.assigned_game.clone() else {
            return Err(RelocateError::AlreadyAbsent(tid.as_str().to_string()));
        };

        let donor_dir = self.layout.donor_dir(&tid);
        if !donor_dir.exists() {
            return Err(RelocateError::DonorDirMissing(donor_dir));
        }

        info!(game = %game, donor = %tid, "restoring game to storage");

        move_subtree(&self.layout.donor_exefs(&tid), &self.layout.game_exefs(&game)?)
            .map_err(RelocateError::at_step(Step::MoveExec))?;
        move_subtree(&self.layout.donor_romfs(&tid), &self.layout.game_romfs(&game)?)
            .map_err(RelocateError::at_step(Step::MoveAssets))?;

        // Both subtrees are out; drop the emptied donor directory so the
        // loader stops seeing the slot as populated.
        std::fs::remove_dir_all(&donor_dir)
            .map_err(|e| RelocateError::at_step(Step::Cleanup)(e.into()))?;

        let slot = registry
            .find_slot_mut(tid.as_str())
            .ok_or_else(|| RelocateError::UnknownDonor(donor_key.to_string()))?;
        slot.assigned_game = None;
        self.store.save(registry)?;

        info!(game = %game, donor = %tid, "restore complete");
        Ok(game)
    }

    /// Restores every occupied slot, continuing past individual failures
    /// so one stuck donor does not block recovery of the others. Returns
    /// one outcome per occupied slot.
    pub fn restore_all(&self, registry: &mut Registry) -> Vec<SlotOutcome> {
        let occupied: Vec<(TitleId, String)> = registry
            .occupied_slots()
            .filter_map(|s| {
                s.assigned_game
                    .clone()
                    .map(|g| (s.title_id.clone(), g))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(occupied.len());
        for (tid, game) in occupied {
            let result = self.restore(registry, tid.as_str()).map(|_| ());
            if let Err(e) = &result {
                error!(donor = %tid, game = %game, error = %e, "restore failed");
            }
            outcomes.push(SlotOutcome {
                title_id: tid,
                game,
                result,
            });
        }
        outcomes
    }

    /// Removes whatever the moves left behind at the game's storage
    /// location. Already-gone paths are fine; anything else is a cleanup
    /// failure.
    fn remove_leftovers(&self, game: &str) -> Result<(), RelocateError> {
        for path in [self.layout.game_romfs(game)?, self.layout.game_exefs(game)?] {
            let result = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            if let Err(e) = result
                && e.kind() != std::io::ErrorKind::NotFound
            {
                return Err(RelocateError::at_step(Step::Cleanup)(e.into()));
            }
        }
        Ok(())
    }
}
