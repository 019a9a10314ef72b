//! Session selection state.

use donorswap_types::TitleId;

/// The current donor/game selection of the interactive session.
///
/// Never cleared implicitly: a failed operation leaves the selection in
/// place so the user can fix the world and retry. Only an explicit
/// none-selection clears a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub donor: Option<TitleId>,
    pub game: Option<String>,
}

impl Selection {
    pub fn clear_donor(&mut self) {
        self.donor = None;
    }

    pub fn clear_game(&mut self) {
        self.game = None;
    }
}
