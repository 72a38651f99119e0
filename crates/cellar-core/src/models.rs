//! Data models for Cellar
//!
//! Defines the core data structures: CellarConfig, Item, and Cellar.
//! Field names serialize in camelCase to match the on-disk store format.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grid coordinate as `(row, col)`
pub type Cell = (i32, i32);

/// Smallest allowed number of rows or columns
pub const MIN_DIMENSION: i32 = 1;

/// Largest allowed number of rows or columns
pub const MAX_DIMENSION: i32 = 24;

/// Rows and columns used when nothing else is specified
pub const DEFAULT_DIMENSION: i32 = 4;

/// Highest rating an item can carry
pub const MAX_RATING: f32 = 5.0;

/// Shape and identity of a cellar grid
///
/// When `enabled_cells` is `None` every cell of the `rows` x `cols`
/// rectangle is usable. Otherwise only the listed cells are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CellarConfig {
    /// Display name, unique across the registry (case-insensitive)
    #[serde(default = "default_cellar_name")]
    pub name: String,
    /// Number of rows
    #[serde(default = "default_dimension")]
    pub rows: i32,
    /// Number of columns
    #[serde(default = "default_dimension")]
    pub cols: i32,
    /// Sparse mask of usable cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_cells: Option<BTreeSet<Cell>>,
}

impl Default for CellarConfig {
    fn default() -> Self {
        Self {
            name: default_cellar_name(),
            rows: DEFAULT_DIMENSION,
            cols: DEFAULT_DIMENSION,
            enabled_cells: None,
        }
    }
}

impl CellarConfig {
    /// Create a dense configuration with the given name and dimensions
    pub fn new(name: impl Into<String>, rows: i32, cols: i32) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            enabled_cells: None,
        }
    }

    /// Replace the enabled-cell mask
    pub fn with_enabled_cells(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.enabled_cells = Some(cells.into_iter().collect());
        self
    }

    /// Whether every cell of the rectangle is usable
    pub fn is_dense(&self) -> bool {
        self.enabled_cells.is_none()
    }

    /// Whether `(row, col)` lies inside the rectangle, ignoring the mask
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && row < self.rows && col < self.cols
    }

    /// Clamp dimensions into bounds and drop mask entries that fall outside
    pub fn normalized(mut self) -> Self {
        self.rows = self.rows.clamp(MIN_DIMENSION, MAX_DIMENSION);
        self.cols = self.cols.clamp(MIN_DIMENSION, MAX_DIMENSION);
        let (rows, cols) = (self.rows, self.cols);
        if let Some(cells) = self.enabled_cells.as_mut() {
            cells.retain(|&(r, c)| r >= 0 && c >= 0 && r < rows && c < cols);
        }
        self
    }
}

fn default_cellar_name() -> String {
    "Cellar 1".to_string()
}

fn default_dimension() -> i32 {
    DEFAULT_DIMENSION
}

/// Wine colour
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum WineKind {
    #[default]
    Red,
    White,
    Rose,
    Sparkling,
    Sweet,
}

impl WineKind {
    /// All kinds, in display order
    pub const ALL: [WineKind; 5] = [
        WineKind::Red,
        WineKind::White,
        WineKind::Rose,
        WineKind::Sparkling,
        WineKind::Sweet,
    ];

    /// Stable identifier used on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            WineKind::Red => "RED",
            WineKind::White => "WHITE",
            WineKind::Rose => "ROSE",
            WineKind::Sparkling => "SPARKLING",
            WineKind::Sweet => "SWEET",
        }
    }

    /// Parse a kind, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for WineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_lowercase())
    }
}

// Unknown values fall back to red instead of failing the whole file.
impl From<String> for WineKind {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or_default()
    }
}

impl From<WineKind> for String {
    fn from(kind: WineKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A bottle placed in a cellar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Vintage year (free text, e.g. "2015" or "NV")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vintage: Option<String>,
    /// Free-text note
    #[serde(default, alias = "comment", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Rating between 0 and `MAX_RATING`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Managed photo path or external URI
    #[serde(default, alias = "photoUri", skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,
    /// Wine colour
    #[serde(default, rename = "type")]
    pub kind: WineKind,
    /// Country of origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Region of origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Current row
    #[serde(default)]
    pub row: i32,
    /// Current column
    #[serde(default)]
    pub col: i32,
    /// When this item was created
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item at the given position
    pub fn new(name: impl Into<String>, row: i32, col: i32) -> Self {
        Self::with_id(Uuid::new_v4(), name, row, col)
    }

    /// Create an item with a specific ID (for loading from storage)
    pub fn with_id(id: Uuid, name: impl Into<String>, row: i32, col: i32) -> Self {
        Self {
            id,
            name: name.into(),
            vintage: None,
            note: None,
            rating: None,
            photo_reference: None,
            kind: WineKind::default(),
            country: None,
            region: None,
            row,
            col,
            created_at: Utc::now(),
        }
    }

    /// Current position
    pub fn position(&self) -> Cell {
        (self.row, self.col)
    }

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Update the vintage
    pub fn set_vintage(&mut self, vintage: Option<String>) {
        self.vintage = non_blank(vintage);
    }

    /// Update the note
    pub fn set_note(&mut self, note: Option<String>) {
        self.note = non_blank(note);
    }

    /// Update the rating, clamped to `0..=MAX_RATING`
    pub fn set_rating(&mut self, rating: Option<f32>) {
        self.rating = clamp_rating(rating);
    }

    /// Update the photo reference
    pub fn set_photo_reference(&mut self, reference: Option<String>) {
        self.photo_reference = non_blank(reference);
    }

    /// Update the wine colour
    pub fn set_kind(&mut self, kind: WineKind) {
        self.kind = kind;
    }

    /// Update country and region of origin
    pub fn set_origin(&mut self, country: Option<String>, region: Option<String>) {
        self.country = non_blank(country);
        self.region = non_blank(region);
    }

    /// The mutable, non-positional fields of this item
    pub fn patch(&self) -> ItemPatch {
        ItemPatch {
            name: self.name.clone(),
            vintage: self.vintage.clone(),
            note: self.note.clone(),
            rating: self.rating,
            photo_reference: self.photo_reference.clone(),
            kind: self.kind,
            country: self.country.clone(),
            region: self.region.clone(),
        }
    }

    /// Replace every mutable field with the values from `patch`
    ///
    /// Identity, position and creation time are left untouched.
    pub fn apply(&mut self, patch: ItemPatch) {
        self.name = patch.name;
        self.set_vintage(patch.vintage);
        self.set_note(patch.note);
        self.set_rating(patch.rating);
        self.set_photo_reference(patch.photo_reference);
        self.kind = patch.kind;
        self.set_origin(patch.country, patch.region);
    }

    /// Collapse blank strings to `None` and bring the rating into range
    pub fn normalized(mut self) -> Self {
        let patch = self.patch();
        self.apply(patch);
        self
    }

    /// Case-insensitive substring match on the descriptive fields
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        std::iter::once(Some(&self.name))
            .chain([
                self.vintage.as_ref(),
                self.note.as_ref(),
                self.country.as_ref(),
                self.region.as_ref(),
            ])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Replacement values for an item's mutable fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: String,
    pub vintage: Option<String>,
    pub note: Option<String>,
    pub rating: Option<f32>,
    pub photo_reference: Option<String>,
    pub kind: WineKind,
    pub country: Option<String>,
    pub region: Option<String>,
}

/// One configured grid plus the items placed in it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cellar {
    /// Grid configuration
    #[serde(default)]
    pub config: CellarConfig,
    /// Items, in insertion order
    #[serde(default, alias = "wines")]
    pub items: Vec<Item>,
}

impl Cellar {
    /// Create an empty cellar with the given configuration
    pub fn new(config: CellarConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
        }
    }

    /// Name and item count
    pub fn summary(&self) -> CellarSummary {
        CellarSummary {
            name: self.config.name.clone(),
            item_count: self.items.len(),
        }
    }
}

/// Name and size of a cellar, for listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CellarSummary {
    pub name: String,
    pub item_count: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn clamp_rating(rating: Option<f32>) -> Option<f32> {
    rating
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(0.0, MAX_RATING))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_new() {
        let item = Item::new("Margaux", 1, 2);
        assert_eq!(item.name, "Margaux");
        assert_eq!(item.position(), (1, 2));
        assert_eq!(item.kind, WineKind::Red);
        assert!(item.vintage.is_none());
        assert!(item.photo_reference.is_none());
    }

    #[test]
    fn test_item_with_id() {
        let id = Uuid::new_v4();
        let item = Item::with_id(id, "Chablis", 0, 0);
        assert_eq!(item.id, id);
        assert_eq!(item.name, "Chablis");
    }

    #[test]
    fn test_rating_is_clamped() {
        let mut item = Item::new("Barolo", 0, 0);
        item.set_rating(Some(7.5));
        assert_eq!(item.rating, Some(MAX_RATING));

        item.set_rating(Some(-1.0));
        assert_eq!(item.rating, Some(0.0));

        item.set_rating(Some(f32::NAN));
        assert!(item.rating.is_none());
    }

    #[test]
    fn test_blank_fields_become_none() {
        let mut item = Item::new("Rioja", 0, 0);
        item.set_vintage(Some("  ".to_string()));
        item.set_note(Some(String::new()));
        assert!(item.vintage.is_none());
        assert!(item.note.is_none());
    }

    #[test]
    fn test_apply_keeps_identity_and_position() {
        let mut item = Item::new("Old", 2, 3);
        let id = item.id;
        let created = item.created_at;

        item.apply(ItemPatch {
            name: "New".to_string(),
            vintage: Some("2019".to_string()),
            rating: Some(4.0),
            kind: WineKind::White,
            ..Default::default()
        });

        assert_eq!(item.id, id);
        assert_eq!(item.created_at, created);
        assert_eq!(item.position(), (2, 3));
        assert_eq!(item.name, "New");
        assert_eq!(item.vintage.as_deref(), Some("2019"));
        assert_eq!(item.kind, WineKind::White);
    }

    #[test]
    fn test_matches() {
        let mut item = Item::new("Chateau Margaux", 0, 0);
        item.set_vintage(Some("2010".to_string()));
        item.set_origin(Some("France".to_string()), Some("Bordeaux".to_string()));

        assert!(item.matches("margaux"));
        assert!(item.matches("2010"));
        assert!(item.matches("bordeaux"));
        assert!(item.matches("  "));
        assert!(!item.matches("rioja"));
    }

    #[test]
    fn test_wine_kind_parse() {
        assert_eq!(WineKind::parse("white"), Some(WineKind::White));
        assert_eq!(WineKind::parse("SPARKLING"), Some(WineKind::Sparkling));
        assert_eq!(WineKind::parse("orange"), None);
        assert_eq!(WineKind::from("orange".to_string()), WineKind::Red);
        assert_eq!(format!("{}", WineKind::Rose), "rose");
    }

    #[test]
    fn test_config_normalized() {
        let config =
            CellarConfig::new("Test", 0, 40).with_enabled_cells([(0, 0), (0, 30), (-1, 2)]);
        let normalized = config.normalized();
        assert_eq!(normalized.rows, MIN_DIMENSION);
        assert_eq!(normalized.cols, MAX_DIMENSION);
        assert_eq!(normalized.enabled_cells, Some(BTreeSet::from([(0, 0)])));
    }

    #[test]
    fn test_config_serialization_format() {
        let config = CellarConfig::new("Cave", 2, 3).with_enabled_cells([(1, 2), (0, 0)]);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Cave",
                "rows": 2,
                "cols": 3,
                "enabledCells": [[0, 0], [1, 2]]
            })
        );

        let dense = serde_json::to_value(CellarConfig::default()).unwrap();
        assert!(dense.get("enabledCells").is_none());
    }

    #[test]
    fn test_item_deserialize_defaults_and_aliases() {
        let json = r#"{
            "id": "6f1c2a3e-8a4b-4c5d-9e6f-7a8b9c0d1e2f",
            "name": "Sancerre",
            "comment": "crisp",
            "photoUri": "content://media/1",
            "type": "WHITE",
            "row": 1,
            "col": 2,
            "createdAt": 1700000000000
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.note.as_deref(), Some("crisp"));
        assert_eq!(item.photo_reference.as_deref(), Some("content://media/1"));
        assert_eq!(item.kind, WineKind::White);
        assert_eq!(item.position(), (1, 2));
        assert_eq!(item.created_at.timestamp_millis(), 1_700_000_000_000);

        let minimal: Item = serde_json::from_str(r#"{"name": "Anon"}"#).unwrap();
        assert_eq!(minimal.position(), (0, 0));
        assert!(minimal.rating.is_none());
        assert_eq!(minimal.kind, WineKind::Red);
    }

    #[test]
    fn test_cellar_accepts_legacy_wines_key() {
        let json = r#"{"config": {"name": "Old"}, "wines": [{"name": "A", "row": 0, "col": 1}]}"#;
        let cellar: Cellar = serde_json::from_str(json).unwrap();
        assert_eq!(cellar.config.rows, DEFAULT_DIMENSION);
        assert_eq!(cellar.items.len(), 1);
        assert_eq!(cellar.summary().item_count, 1);
    }
}
