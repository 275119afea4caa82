//! Snapshot encoding, schema migration, and catalog reconciliation.
//!
//! The catalog decides which ids exist; the snapshot only supplies status for
//! ids it recognizes. Decoding is lenient: every sub-field falls back to its
//! default on its own, so one corrupt value never discards the whole snapshot.
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::constants::{LEGACY_SNAPSHOT_VERSION, SNAPSHOT_VERSION};
use crate::draw::normalize_participant;
use crate::settings::OperatorSettings;
use crate::state::{DrawRecord, ItemEntry, ItemStatus, ReconciledState};
use crate::storage::StateSlot;

/// Status record as written to the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedItem {
    pub id: String,
    pub taken: bool,
    pub taken_by: String,
}

/// The versioned document stored in the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub items: Vec<PersistedItem>,
    pub history: Vec<DrawRecord>,
    pub settings: OperatorSettings,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            items: Vec::new(),
            history: Vec::new(),
            settings: OperatorSettings::default(),
        }
    }
}

impl Snapshot {
    #[must_use]
    pub fn from_state(state: &ReconciledState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            items: state
                .items
                .iter()
                .map(|entry| PersistedItem {
                    id: entry.item.id.clone(),
                    taken: entry.status.taken,
                    taken_by: entry.status.taken_by.clone(),
                })
                .collect(),
            history: state.history.clone(),
            settings: state.settings.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot root is not an object")]
    NotAnObject,
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u64),
}

#[derive(Debug, Error)]
pub enum SaveError<E: std::error::Error + 'static> {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(#[source] E),
}

/// Merge a snapshot into the current catalog.
///
/// Iteration is driven by the catalog, so ids the snapshot does not know start
/// untaken and ids the catalog no longer has are dropped.
#[must_use]
pub fn reconcile(catalog: &Catalog, snapshot: &Snapshot) -> ReconciledState {
    let mut saved: HashMap<&str, &PersistedItem> = HashMap::with_capacity(snapshot.items.len());
    for record in &snapshot.items {
        saved.entry(record.id.as_str()).or_insert(record);
    }

    let items = catalog
        .items()
        .iter()
        .map(|item| {
            let status = saved
                .get(item.id.as_str())
                .map_or_else(ItemStatus::untaken, |record| repaired_status(record));
            ItemEntry {
                item: item.clone(),
                status,
            }
        })
        .collect();

    let dropped = snapshot
        .items
        .iter()
        .filter(|record| catalog.get(&record.id).is_none())
        .count();
    if dropped > 0 {
        debug!("dropped {dropped} snapshot item(s) missing from the catalog");
    }

    ReconciledState {
        items,
        history: snapshot.history.clone(),
        settings: snapshot.settings.clone(),
    }
}

fn repaired_status(record: &PersistedItem) -> ItemStatus {
    if !record.taken {
        return ItemStatus::untaken();
    }
    ItemStatus::taken_by(normalize_participant(&record.taken_by))
}

/// Serialize the full state for the slot.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(state: &ReconciledState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Snapshot::from_state(state))
}

/// Parse a stored payload, migrating older layouts to the current schema.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON object or carries a version
/// newer than this build understands.
pub fn decode(payload: &str) -> Result<Snapshot, SnapshotError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(root) = value else {
        return Err(SnapshotError::NotAnObject);
    };
    let root = migrate(root)?;
    Ok(snapshot_from_object(&root))
}

/// Read and reconcile the slot. Never fails: an absent, unreadable, or
/// unparsable slot yields fresh state.
pub fn load<S: StateSlot>(slot: &S, catalog: &Catalog) -> ReconciledState {
    let payload = match slot.read() {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!("no saved state found, starting fresh");
            return ReconciledState::fresh(catalog);
        }
        Err(err) => {
            warn!("Error reading saved state, starting fresh: {err}");
            return ReconciledState::fresh(catalog);
        }
    };
    match decode(&payload) {
        Ok(snapshot) => reconcile(catalog, &snapshot),
        Err(err) => {
            warn!("Error loading state, starting fresh: {err}");
            ReconciledState::fresh(catalog)
        }
    }
}

/// Overwrite the slot with the complete state.
///
/// # Errors
///
/// Returns an error if the state cannot be serialized or stored.
pub fn save<S: StateSlot>(slot: &S, state: &ReconciledState) -> Result<(), SaveError<S::Error>> {
    let payload = encode(state)?;
    slot.write(&payload).map_err(SaveError::Storage)
}

// Migrations ---------------------------------------------------------------

fn migrate(mut root: Map<String, Value>) -> Result<Map<String, Value>, SnapshotError> {
    let mut version = match root.get("version") {
        None | Some(Value::Null) => u64::from(LEGACY_SNAPSHOT_VERSION),
        Some(value) => value
            .as_u64()
            .ok_or(SnapshotError::UnsupportedVersion(0))?,
    };
    if version == 0 || version > u64::from(SNAPSHOT_VERSION) {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    while version < u64::from(SNAPSHOT_VERSION) {
        root = match version {
            1 => migrate_v1_to_v2(&root),
            other => return Err(SnapshotError::UnsupportedVersion(other)),
        };
        version += 1;
    }
    Ok(root)
}

/// v1 stored `teams`, `assignments`, and branding under url-style keys.
fn migrate_v1_to_v2(root: &Map<String, Value>) -> Map<String, Value> {
    let items: Vec<Value> = array_field(root, "teams")
        .iter()
        .filter_map(Value::as_object)
        .map(|team| {
            let mut record = Map::new();
            copy_key(team, "id", &mut record, "id");
            copy_key(team, "taken", &mut record, "taken");
            copy_key(team, "takenBy", &mut record, "takenBy");
            Value::Object(record)
        })
        .collect();

    let history: Vec<Value> = array_field(root, "assignments")
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| {
            let mut record = Map::new();
            copy_key(entry, "viewer", &mut record, "participant");
            copy_key(entry, "teamId", &mut record, "itemId");
            copy_key(entry, "teamName", &mut record, "itemDisplayName");
            copy_key(entry, "short", &mut record, "itemShortLabel");
            copy_key(entry, "timestamp", &mut record, "timestampMs");
            Value::Object(record)
        })
        .collect();

    let mut settings = Map::new();
    if let Some(Value::Object(old)) = root.get("settings") {
        copy_key(old, "streamName", &mut settings, "label");
        copy_key(old, "bannerLogoUrl", &mut settings, "image");
        copy_key(old, "iconLogoUrl", &mut settings, "icon");
        copy_key(old, "colors", &mut settings, "colors");
    }

    let mut next = Map::new();
    next.insert("version".into(), Value::from(2));
    next.insert("items".into(), Value::Array(items));
    next.insert("history".into(), Value::Array(history));
    next.insert("settings".into(), Value::Object(settings));
    next
}

fn array_field<'a>(root: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    root.get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

fn copy_key(from: &Map<String, Value>, key: &str, to: &mut Map<String, Value>, as_key: &str) {
    if let Some(value) = from.get(key) {
        to.insert(as_key.to_string(), value.clone());
    }
}

// Lenient field decoding ---------------------------------------------------

fn snapshot_from_object(root: &Map<String, Value>) -> Snapshot {
    let items = array_field(root, "items")
        .iter()
        .filter_map(persisted_item)
        .collect();
    let history = array_field(root, "history")
        .iter()
        .filter_map(draw_record)
        .collect();
    let settings = match root.get("settings") {
        Some(Value::Object(map)) => lenient_settings(map),
        _ => OperatorSettings::default(),
    };
    Snapshot {
        version: SNAPSHOT_VERSION,
        items,
        history,
        settings,
    }
}

fn field_or<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, fallback: T) -> T {
    match map.get(key) {
        None | Some(Value::Null) => fallback,
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
            warn!("ignoring malformed `{key}` in saved state: {err}");
            fallback
        }),
    }
}

fn persisted_item(value: &Value) -> Option<PersistedItem> {
    let map = value.as_object()?;
    let Some(id) = map.get("id").and_then(Value::as_str) else {
        warn!("skipping saved item without an id");
        return None;
    };
    Some(PersistedItem {
        id: id.to_string(),
        taken: field_or(map, "taken", false),
        taken_by: field_or(map, "takenBy", String::new()),
    })
}

fn draw_record(value: &Value) -> Option<DrawRecord> {
    let Some(map) = value.as_object() else {
        warn!("skipping malformed history entry");
        return None;
    };
    Some(DrawRecord {
        participant: normalize_participant(&field_or(map, "participant", String::new())),
        item_id: field_or(map, "itemId", String::new()),
        item_display_name: field_or(map, "itemDisplayName", String::new()),
        item_short_label: field_or(map, "itemShortLabel", String::new()),
        timestamp_ms: field_or(map, "timestampMs", 0),
    })
}

fn lenient_settings(map: &Map<String, Value>) -> OperatorSettings {
    let defaults = OperatorSettings::default();
    let colors = match map.get("colors") {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
            .collect(),
        _ => BTreeMap::new(),
    };
    let image: Option<String> = field_or(map, "image", None);
    let icon: Option<String> = field_or(map, "icon", None);
    OperatorSettings {
        label: field_or(map, "label", defaults.label),
        image: image.filter(|payload| !payload.trim().is_empty()),
        icon: icon.filter(|payload| !payload.trim().is_empty()),
        colors,
        background: field_or(map, "background", defaults.background),
        gradient: field_or(map, "gradient", defaults.gradient),
        view_mode: field_or(map, "viewMode", defaults.view_mode),
    }
}
