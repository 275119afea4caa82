use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Item};
use crate::settings::OperatorSettings;

/// Mutable draw status of one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatus {
    pub taken: bool,
    pub taken_by: String,
}

impl ItemStatus {
    #[must_use]
    pub const fn untaken() -> Self {
        Self {
            taken: false,
            taken_by: String::new(),
        }
    }

    #[must_use]
    pub fn taken_by(participant: impl Into<String>) -> Self {
        Self {
            taken: true,
            taken_by: participant.into(),
        }
    }
}

/// Catalog item joined with its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    pub item: Item,
    pub status: ItemStatus,
}

impl ItemEntry {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.item.id
    }

    #[must_use]
    pub const fn is_taken(&self) -> bool {
        self.status.taken
    }
}

/// One line of the draw history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    #[serde(default)]
    pub participant: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_display_name: String,
    #[serde(default)]
    pub item_short_label: String,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl DrawRecord {
    /// `participant → Display Name (SHORT)`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} \u{2192} {} ({})",
            self.participant, self.item_display_name, self.item_short_label
        )
    }
}

/// The root state object: catalog-ordered items, history, and settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledState {
    pub items: Vec<ItemEntry>,
    pub history: Vec<DrawRecord>,
    pub settings: OperatorSettings,
}

impl ReconciledState {
    /// Every catalog item untaken, empty history, default settings.
    #[must_use]
    pub fn fresh(catalog: &Catalog) -> Self {
        crate::codec::reconcile(catalog, &crate::codec::Snapshot::default())
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&ItemEntry> {
        self.items.iter().find(|entry| entry.id() == id)
    }

    pub fn available(&self) -> impl Iterator<Item = &ItemEntry> {
        self.items.iter().filter(|entry| !entry.is_taken())
    }

    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    #[must_use]
    pub fn taken_count(&self) -> usize {
        self.items.len() - self.available_count()
    }
}
