//! Shared domain types: title identifiers and RomFs layout styles.

mod romfs;
mod title_id;

pub use romfs::{RomfsStyle, RomfsStyleError};
pub use title_id::{TitleId, TitleIdError};
