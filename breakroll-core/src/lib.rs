//! Breakroll Draw Engine
//!
//! Platform-agnostic core for running a live draw: a fixed catalog of items is
//! handed out one at a time to named participants, progress survives restarts
//! through a single persistence slot, and the board layout is computed here so
//! any renderer can draw it. This crate has no UI or platform-specific code.

pub mod catalog;
pub mod codec;
pub mod constants;
pub mod draw;
pub mod layout;
pub mod session;
pub mod settings;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Item};
pub use codec::{PersistedItem, SaveError, Snapshot, SnapshotError, reconcile};
pub use draw::{Exhausted, normalize_participant};
pub use layout::{BannerSpan, Cell, LayoutError, LayoutPlacer, Placement, ReservedBlock};
pub use session::BreakSession;
pub use settings::{OperatorSettings, SettingField, SettingUpdate, ViewMode};
pub use state::{DrawRecord, ItemEntry, ItemStatus, ReconciledState};
pub use storage::{MemorySlot, StateSlot};
