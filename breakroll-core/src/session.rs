use log::warn;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::catalog::Catalog;
use crate::codec;
use crate::draw::{self, Exhausted};
use crate::layout::{LayoutPlacer, Placement};
use crate::settings::{SettingField, SettingUpdate};
use crate::state::{DrawRecord, ItemEntry, ReconciledState};
use crate::storage::StateSlot;

/// High-level session owning the reconciled state, its persistence slot, and
/// the draw RNG. Every mutation is followed by a full save.
pub struct BreakSession<S: StateSlot> {
    catalog: Catalog,
    slot: S,
    state: ReconciledState,
    placer: LayoutPlacer,
    rng: ChaCha20Rng,
    last_save_error: Option<String>,
}

impl<S: StateSlot> BreakSession<S> {
    /// Load and reconcile the slot against `catalog`, drawing with OS entropy.
    #[must_use]
    pub fn open(catalog: Catalog, slot: S) -> Self {
        Self::with_rng(catalog, slot, ChaCha20Rng::from_entropy())
    }

    /// Same as [`Self::open`] with a reproducible draw sequence.
    #[must_use]
    pub fn open_seeded(catalog: Catalog, slot: S, seed: u64) -> Self {
        Self::with_rng(catalog, slot, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, slot: S, rng: ChaCha20Rng) -> Self {
        let state = codec::load(&slot, &catalog);
        Self {
            catalog,
            slot,
            state,
            placer: LayoutPlacer::standard(),
            rng,
            last_save_error: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ReconciledState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn placer(&self) -> &LayoutPlacer {
        &self.placer
    }

    /// Message from the most recent failed save, cleared by the next success.
    #[must_use]
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Draw an item for `participant`, stamped with the current wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] when nothing is left to draw; nothing is saved then.
    pub fn draw(&mut self, participant: &str) -> Result<DrawRecord, Exhausted> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let record = draw::draw(&mut self.state, participant, now_ms, &mut self.rng)?;
        self.persist();
        Ok(record)
    }

    /// Reset draw progress, keeping theme and branding.
    pub fn reset(&mut self) {
        self.reset_preserving(&SettingField::reset_default());
    }

    /// Reset draw progress, keeping exactly the `keep` settings fields.
    pub fn reset_preserving(&mut self, keep: &[SettingField]) {
        let settings = self.state.settings.preserving(keep);
        self.state = ReconciledState::fresh(&self.catalog);
        self.state.settings = settings;
        self.persist();
    }

    /// Apply one settings update and persist.
    pub fn update_settings(&mut self, update: SettingUpdate) -> SettingField {
        let field = self.state.settings.apply(update);
        self.persist();
        field
    }

    /// Current entries, in catalog order, placed onto the board.
    #[must_use]
    pub fn placements(&self) -> Vec<Placement<'_, ItemEntry>> {
        self.placer.place(&self.state.items)
    }

    fn persist(&mut self) {
        match codec::save(&self.slot, &self.state) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                warn!("Failed to save state: {err}");
                self.last_save_error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ViewMode;
    use crate::storage::MemorySlot;
    use std::fmt;

    #[derive(Debug)]
    struct Readonly;

    impl fmt::Display for Readonly {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("slot is read-only")
        }
    }

    impl std::error::Error for Readonly {}

    struct ReadonlySlot;

    impl StateSlot for ReadonlySlot {
        type Error = Readonly;

        fn read(&self) -> Result<Option<String>, Self::Error> {
            Ok(None)
        }

        fn write(&self, _payload: &str) -> Result<(), Self::Error> {
            Err(Readonly)
        }
    }

    #[test]
    fn every_mutation_is_persisted() {
        let slot = MemorySlot::new();
        let mut session = BreakSession::open_seeded(Catalog::builtin(), slot.clone(), 11);
        session.draw("pat").unwrap();
        let reopened = BreakSession::open(Catalog::builtin(), slot.clone());
        assert_eq!(reopened.state(), session.state());

        session.update_settings(SettingUpdate::ViewMode(ViewMode::Summary));
        let reopened = BreakSession::open(Catalog::builtin(), slot);
        assert_eq!(reopened.state().settings.view_mode, ViewMode::Summary);
    }

    #[test]
    fn save_failures_are_recorded_not_raised() {
        let mut session = BreakSession::open_seeded(Catalog::builtin(), ReadonlySlot, 3);
        let record = session.draw("quinn").unwrap();
        assert_eq!(session.state().history, vec![record]);
        assert_eq!(session.last_save_error(), Some("Storage error: slot is read-only"));
    }

    #[test]
    fn default_reset_keeps_theme_and_branding_only() {
        let mut session = BreakSession::open_seeded(Catalog::builtin(), MemorySlot::new(), 5);
        session.update_settings(SettingUpdate::Label("Rips".into()));
        session.update_settings(SettingUpdate::Gradient(true));
        session.update_settings(SettingUpdate::ViewMode(ViewMode::Summary));
        session.draw("a").unwrap();
        session.reset();
        let state = session.state();
        assert!(state.history.is_empty());
        assert_eq!(state.available_count(), 32);
        assert_eq!(state.settings.label, "Rips");
        assert!(state.settings.gradient);
        assert_eq!(state.settings.view_mode, ViewMode::Primary);
    }

    #[test]
    fn placements_carry_live_status_in_catalog_order() {
        let mut session = BreakSession::open_seeded(Catalog::builtin(), MemorySlot::new(), 1);
        let record = session.draw("zed").unwrap();
        let placements = session.placements();
        assert_eq!(placements.len(), 32);
        assert_eq!(placements[0].item.id(), "ari");
        assert_eq!(placements[13].cell.index, 17);
        let taken: Vec<_> = placements.iter().filter(|p| p.item.is_taken()).collect();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].item.id(), record.item_id);
        assert_eq!(taken[0].item.status.taken_by, "zed");
    }
}
