//! Centralized constants for Breakroll draw logic.
//!
//! Grid geometry and persistence identifiers live here so that the board
//! footprint and the snapshot format can only change through reviewed code.

// Participants -------------------------------------------------------------
/// Stored in place of a blank participant name.
pub const PLACEHOLDER_PARTICIPANT: &str = "(no name)";

// Persistence --------------------------------------------------------------
/// Name of the single persistence slot.
pub const STORAGE_KEY: &str = "card_break_roller_state";
/// Version written by the current snapshot encoder.
pub const SNAPSHOT_VERSION: u32 = 2;
/// Documents without a version field use the first layout.
pub(crate) const LEGACY_SNAPSHOT_VERSION: u32 = 1;

// Settings defaults --------------------------------------------------------
pub const DEFAULT_BACKGROUND: &str = "#f5f5f7";

// Board geometry -----------------------------------------------------------
pub const GRID_COLUMNS: usize = 10;
pub const GRID_ROWS: usize = 4;
/// First row (0-based) covered by the banner block.
pub const BANNER_ROW: usize = 1;
pub const BANNER_ROWS: usize = 2;
pub const BANNER_COLUMNS: usize = 4;
