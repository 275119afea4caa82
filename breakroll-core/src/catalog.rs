//! Catalog of drawable items
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A drawable item. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub display_name: String,
    pub short_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Item {
    #[must_use]
    pub fn new(id: &str, display_name: &str, short_label: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            short_label: short_label.to_string(),
            image_ref: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog item at position {position} has a blank id")]
    BlankId { position: usize },
    #[error("duplicate catalog id `{0}`")]
    DuplicateId(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered, read-only list of drawable items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog, rejecting blank or repeated ids.
    ///
    /// # Errors
    ///
    /// Returns an error if any id is blank or appears more than once.
    pub fn new(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(CatalogError::BlankId { position });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Load a catalog from a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the ids are invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// The compiled-in catalog: one record per franchise.
    #[must_use]
    pub fn builtin() -> Self {
        let items = BUILTIN_ITEMS
            .iter()
            .map(|(id, name, short)| Item::new(id, name, short))
            .collect();
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_ITEMS: [(&str, &str, &str); 32] = [
    ("ari", "Arizona Cardinals", "ARI"),
    ("atl", "Atlanta Falcons", "ATL"),
    ("bal", "Baltimore Ravens", "BAL"),
    ("buf", "Buffalo Bills", "BUF"),
    ("car", "Carolina Panthers", "CAR"),
    ("chi", "Chicago Bears", "CHI"),
    ("cin", "Cincinnati Bengals", "CIN"),
    ("cle", "Cleveland Browns", "CLE"),
    ("dal", "Dallas Cowboys", "DAL"),
    ("den", "Denver Broncos", "DEN"),
    ("det", "Detroit Lions", "DET"),
    ("gb", "Green Bay Packers", "GB"),
    ("hou", "Houston Texans", "HOU"),
    ("ind", "Indianapolis Colts", "IND"),
    ("jax", "Jacksonville Jaguars", "JAX"),
    ("kc", "Kansas City Chiefs", "KC"),
    ("lv", "Las Vegas Raiders", "LV"),
    ("lac", "Los Angeles Chargers", "LAC"),
    ("lar", "Los Angeles Rams", "LAR"),
    ("mia", "Miami Dolphins", "MIA"),
    ("min", "Minnesota Vikings", "MIN"),
    ("ne", "New England Patriots", "NE"),
    ("no", "New Orleans Saints", "NO"),
    ("nyg", "New York Giants", "NYG"),
    ("nyj", "New York Jets", "NYJ"),
    ("phi", "Philadelphia Eagles", "PHI"),
    ("pit", "Pittsburgh Steelers", "PIT"),
    ("sf", "San Francisco 49ers", "SF"),
    ("sea", "Seattle Seahawks", "SEA"),
    ("tb", "Tampa Bay Buccaneers", "TB"),
    ("ten", "Tennessee Titans", "TEN"),
    ("wsh", "Washington Commanders", "WSH"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 32);
        assert!(Catalog::new(catalog.items().to_vec()).is_ok());
        assert_eq!(catalog.get("kc").map(|i| i.short_label.as_str()), Some("KC"));
    }

    #[test]
    fn from_json_reads_camel_case_records() {
        let json = r#"[
            { "id": "a", "displayName": "Alpha", "shortLabel": "A" },
            { "id": "b", "displayName": "Beta", "shortLabel": "B", "imageRef": "b.png" }
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[1].image_ref.as_deref(), Some("b.png"));
    }

    #[test]
    fn duplicate_and_blank_ids_are_rejected() {
        let dup = Catalog::new(vec![Item::new("a", "A", "A"), Item::new("a", "B", "B")]);
        assert!(matches!(dup, Err(CatalogError::DuplicateId(id)) if id == "a"));

        let blank = Catalog::new(vec![Item::new("a", "A", "A"), Item::new("  ", "B", "B")]);
        assert!(matches!(blank, Err(CatalogError::BlankId { position: 1 })));
    }
}
