//! Exclusion-respecting random draw
use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::constants::PLACEHOLDER_PARTICIPANT;
use crate::state::{DrawRecord, ItemStatus, ReconciledState};

/// No untaken items remain. A normal outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("all items have already been taken")]
pub struct Exhausted;

/// Trim a participant name, substituting the placeholder when blank.
#[must_use]
pub fn normalize_participant(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        PLACEHOLDER_PARTICIPANT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Assign one uniformly chosen untaken item to `participant`.
///
/// Exactly one item moves from untaken to taken on success; on exhaustion the
/// state is left untouched.
///
/// # Errors
///
/// Returns [`Exhausted`] when every item is already taken.
pub fn draw<R: Rng + ?Sized>(
    state: &mut ReconciledState,
    participant: &str,
    timestamp_ms: i64,
    rng: &mut R,
) -> Result<DrawRecord, Exhausted> {
    let available: Vec<usize> = state
        .items
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.is_taken())
        .map(|(idx, _)| idx)
        .collect();
    if available.is_empty() {
        return Err(Exhausted);
    }

    let pick = available[rng.gen_range(0..available.len())];
    let participant = normalize_participant(participant);
    let entry = &mut state.items[pick];
    entry.status = ItemStatus::taken_by(participant.clone());

    let record = DrawRecord {
        participant,
        item_id: entry.item.id.clone(),
        item_display_name: entry.item.display_name.clone(),
        item_short_label: entry.item.short_label.clone(),
        timestamp_ms,
    };
    debug!(
        "drew {} for {} ({} of {} remaining)",
        record.item_id,
        record.participant,
        available.len() - 1,
        state.items.len()
    );
    state.history.push(record.clone());
    Ok(record)
}
