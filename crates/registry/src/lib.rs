//! Donor slot registry and persisted config store.
//!
//! The registry is the single source of truth for which game currently
//! occupies which donor title slot, plus the path configuration the rest
//! of the system derives its layout from. It is read at startup and fully
//! rewritten after every assignment change.

mod error;
mod registry;
mod store;

pub use error::RegistryError;
pub use registry::{DonorSlot, PathConfig, Registry, STOCK_DONORS};
pub use store::ConfigStore;
