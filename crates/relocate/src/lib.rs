//! Two-subtree relocation of game bundles between storage and donor slots.
//!
//! A playable bundle is a RomFs subtree plus an ExeFs subtree. Installing
//! moves both from `<games_root>/<game>/` to `<donor_root>/<title-id>/`;
//! restoring moves them back. A failed step halts and is reported as-is,
//! without undoing earlier steps; `restore_all` is the recovery path for
//! partial state.

mod error;
mod moves;
mod paths;
mod relocate;

pub use error::{MoveError, RelocateError, Step};
pub use moves::move_subtree;
pub use paths::{EXEFS_DIR, Layout, NPDM_FILE};
pub use relocate::{Relocator, SlotOutcome};
