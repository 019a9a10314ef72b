//! Donor slot and registry types.

use std::path::PathBuf;

use donorswap_types::{RomfsStyle, TitleId};

/// The stock donor table: titles the loader whitelist recognizes, as
/// (display name, title id) pairs. Compiled in; the persisted config is
/// synthesized from this list on first run and on explicit reset.
pub const STOCK_DONORS: &[(&str, &str)] = &[
    ("Blazblue", "0100C6E00AF2C000"),
    ("Fallout Shelter", "010043500A17A000"),
    ("Fortnite", "010025400AECE000"),
    ("Hulu", "0100A66003384000"),
    ("Kitten Squad", "01000C900A136000"),
    ("Octopath Demo", "010096000B3EA000"),
    ("PaccMan VS", "0100BA3003B70000"),
    ("Pic-a-Pix Deluxe Demo", "01006E30099B8000"),
    ("Pinball FX3", "0100DB7003828000"),
    ("PixelJunk Monsters 2 Demo", "01004AF00A772000"),
    ("Pokémon Quest", "01005D100807A000"),
    ("Stern Pinball Arcade", "0100AE0006474000"),
    ("The Pinball Arcade", "0100cd300880E000"),
];

/// One donor title slot.
///
/// The title id is immutable once the slot exists. At most one game
/// occupies a slot at a time; the registry does not by itself stop a
/// caller from assigning the same game to two slots; callers check with
/// [`Registry::slot_for_game`] before assigning.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorSlot {
    pub title_id: TitleId,
    pub display_name: String,
    pub assigned_game: Option<String>,
}

impl DonorSlot {
    /// True when no game occupies this slot.
    pub fn is_vacant(&self) -> bool {
        self.assigned_game.is_none()
    }
}

/// Persisted path configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PathConfig {
    /// Root directory for game storage.
    pub games_root: PathBuf,
    /// Root directory the loader scans for donor titles.
    pub donor_root: PathBuf,
    /// Layout variant of the asset subtree.
    pub romfs_style: RomfsStyle,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            games_root: PathBuf::from("/switch/games"),
            donor_root: PathBuf::from("/atmosphere/titles"),
            romfs_style: RomfsStyle::Dir,
        }
    }
}

/// The full set of donor slots plus path configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    pub paths: PathConfig,
    pub slots: Vec<DonorSlot>,
}

impl Registry {
    /// Builds the stock registry with every slot vacant.
    ///
    /// The stock table is compiled in and known-good, so parsing it
    /// cannot fail at runtime.
    pub fn stock(paths: PathConfig) -> Self {
        let slots = STOCK_DONORS
            .iter()
            .filter_map(|(name, tid)| {
                let title_id = TitleId::parse(tid).ok()?;
                Some(DonorSlot {
                    title_id,
                    display_name: (*name).to_string(),
                    assigned_game: None,
                })
            })
            .collect();
        Self { paths, slots }
    }

    /// Finds a slot by title id or display name. Linear scan: the table
    /// holds about a dozen entries.
    pub fn find_slot(&self, key: &str) -> Option<&DonorSlot> {
        self.slots
            .iter()
            .find(|s| s.title_id.as_str() == key || s.display_name == key)
    }

    /// Mutable variant of [`find_slot`](Self::find_slot).
    pub fn find_slot_mut(&mut self, key: &str) -> Option<&mut DonorSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.title_id.as_str() == key || s.display_name == key)
    }

    /// Finds the slot currently occupied by `game`, if any. Comparison is
    /// case-sensitive.
    pub fn slot_for_game(&self, game: &str) -> Option<&DonorSlot> {
        self.slots
            .iter()
            .find(|s| s.assigned_game.as_deref() == Some(game))
    }

    /// Slots with a game currently assigned.
    pub fn occupied_slots(&self) -> impl Iterator<Item = &DonorSlot> {
        self.slots.iter().filter(|s| !s.is_vacant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stock_table_integrity() {
        let reg = Registry::stock(PathConfig::default());
        assert_eq!(reg.slots.len(), 13);
        assert!(reg.slots.iter().all(DonorSlot::is_vacant));

        let ids: HashSet<&str> = reg.slots.iter().map(|s| s.title_id.as_str()).collect();
        assert_eq!(ids.len(), 13, "stock title ids must be unique");
    }

    #[test]
    fn find_slot_by_id_or_name() {
        let reg = Registry::stock(PathConfig::default());
        assert_eq!(
            reg.find_slot("0100C6E00AF2C000").unwrap().display_name,
            "Blazblue"
        );
        assert_eq!(
            reg.find_slot("Pinball FX3").unwrap().title_id.as_str(),
            "0100DB7003828000"
        );
        assert!(reg.find_slot("Not A Donor").is_none());
    }

    #[test]
    fn slot_for_game_is_case_sensitive() {
        let mut reg = Registry::stock(PathConfig::default());
        reg.slots[0].assigned_game = Some("Celeste".into());
        assert!(reg.slot_for_game("Celeste").is_some());
        assert!(reg.slot_for_game("celeste").is_none());
    }

    #[test]
    fn occupied_slots_filters_vacant() {
        let mut reg = Registry::stock(PathConfig::default());
        reg.slots[2].assigned_game = Some("Hades".into());
        reg.slots[5].assigned_game = Some("Celeste".into());
        let occupied: Vec<_> = reg.occupied_slots().collect();
        assert_eq!(occupied.len(), 2);
    }
}
