//! Swap session controller.
//!
//! Library crate with no UI dependencies: the CLI presents menus and
//! feeds the chosen donor/game keys in. Holds the one piece of session
//! state (the current selection) explicitly, so operations are testable
//! without shared process globals.

mod controller;
mod error;
mod selection;

pub use controller::{SlotStatus, SwapController, SwapOutcome};
pub use error::SwapError;
pub use selection::Selection;
