//! Unified storage interface
//!
//! The `Store` is the explicitly constructed state object handed to the
//! presentation layer. It owns:
//! - the cellar registry (source of truth, in memory)
//! - the JSON persistence handle (best-effort mirror on disk)
//! - the photo store (managed photo copies)
//!
//! ## Commands and snapshots
//!
//! Every command returns `true` when it was applied and `false` when it was
//! rejected. An applied command publishes a fresh `Snapshot` to subscribers
//! and, except for cellar selection, rewrites the store file. Write failures
//! are logged and swallowed; the in-memory state stays authoritative.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Creates or loads existing
//!
//! store.add_item(Item::new("Chablis", 0, 0));
//! store.set_dimensions(3, 3);
//!
//! let items = store.items();
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::grid;
use crate::models::{Cell, Cellar, CellarConfig, CellarSummary, Item, ItemPatch};
use crate::photos::{ManagedPhotoDir, PhotoStore, UnmanagedPhotos};
use crate::placement::Placed;
use crate::registry::CellarRegistry;
use crate::storage::JsonPersistence;

/// Published view of the registry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Index of the active cellar
    pub active_index: usize,
    /// Configuration of the active cellar
    pub config: CellarConfig,
    /// Items of the active cellar
    pub items: Vec<Item>,
    /// Name and item count of every cellar
    pub summaries: Vec<CellarSummary>,
}

impl Snapshot {
    fn of(registry: &CellarRegistry) -> Self {
        let active = registry.active();
        Self {
            active_index: registry.active_index(),
            config: active.config.clone(),
            items: active.items.clone(),
            summaries: registry.summaries(),
        }
    }
}

/// Unified storage interface for Cellar
pub struct Store {
    /// Cellars and the active selector
    registry: CellarRegistry,
    /// Store file handler (absent for in-memory stores)
    persistence: Option<JsonPersistence>,
    /// Managed photo copies
    photos: Box<dyn PhotoStore>,
    /// Snapshot publisher
    snapshot: watch::Sender<Snapshot>,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the store with a specific configuration
    ///
    /// A missing or malformed store file yields one default empty cellar.
    pub fn open_with_config(config: &Config) -> Self {
        let persistence = JsonPersistence::from_config(config);
        let registry = persistence.load_registry();
        info!(
            path = ?persistence.path(),
            cellars = registry.len(),
            "Opened cellar store"
        );
        Self::with_parts(
            registry,
            Some(persistence),
            Box::new(ManagedPhotoDir::new(config.photos_dir())),
        )
    }

    /// A store that lives only in memory
    pub fn in_memory() -> Self {
        Self::with_parts(CellarRegistry::default(), None, Box::new(UnmanagedPhotos))
    }

    /// Assemble a store from its parts
    pub fn with_parts(
        registry: CellarRegistry,
        persistence: Option<JsonPersistence>,
        photos: Box<dyn PhotoStore>,
    ) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::of(&registry));
        Self {
            registry,
            persistence,
            photos,
            snapshot,
        }
    }

    // ==================== Queries ====================

    /// The registry behind this store
    pub fn registry(&self) -> &CellarRegistry {
        &self.registry
    }

    /// The active cellar
    pub fn active_cellar(&self) -> &Cellar {
        self.registry.active()
    }

    /// Index of the active cellar
    pub fn active_index(&self) -> usize {
        self.registry.active_index()
    }

    /// Configuration of the active cellar
    pub fn config(&self) -> &CellarConfig {
        &self.registry.active().config
    }

    /// Items of the active cellar
    pub fn items(&self) -> &[Item] {
        self.registry.active().items()
    }

    /// Get an item of the active cellar by ID
    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.registry.active().item(id)
    }

    /// Get the item at a position of the active cellar
    pub fn item_at(&self, row: i32, col: i32) -> Option<&Item> {
        self.registry.active().item_at(row, col)
    }

    /// Whether a position of the active cellar holds an item
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.registry.active().is_occupied(row, col)
    }

    /// Search the active cellar's items
    pub fn search_items(&self, query: &str) -> Vec<&Item> {
        self.registry.active().search(query)
    }

    /// Items of the active cellar that cannot be rendered
    pub fn orphans(&self) -> Vec<&Item> {
        self.registry.active().orphans()
    }

    /// Name and item count of every cellar
    pub fn summaries(&self) -> Vec<CellarSummary> {
        self.registry.summaries()
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    // ==================== Item Commands ====================

    /// Add an item to the active cellar
    ///
    /// Replaces the occupant in place when the cell is taken.
    pub fn add_item(&mut self, mut item: Item) -> bool {
        let position = item.position();
        if !grid::is_usable(self.config(), position.0, position.1) {
            debug!(?position, "Rejected item on unusable cell");
            return false;
        }

        item.photo_reference = self.adopt_photo(item.id, item.photo_reference.take());
        let Some(placed) = self.registry.active_mut().add_item(item) else {
            return false;
        };

        if let Placed::Replaced { previous } = placed {
            let current = self
                .item_at(position.0, position.1)
                .and_then(|item| item.photo_reference.clone());
            if previous.photo_reference != current {
                self.release_photo(previous.photo_reference.as_deref());
            }
        }

        self.commit();
        true
    }

    /// Replace the mutable fields of an item in the active cellar
    pub fn update_item(&mut self, id: Uuid, mut patch: ItemPatch) -> bool {
        let Some(old_photo) = self.item(id).map(|item| item.photo_reference.clone()) else {
            debug!(%id, "Rejected update of unknown item");
            return false;
        };

        let new_photo = patch.photo_reference.take().filter(|r| !r.trim().is_empty());
        patch.photo_reference = if new_photo != old_photo {
            self.adopt_photo(id, new_photo)
        } else {
            new_photo
        };
        let kept_photo = patch.photo_reference.clone();

        if self.registry.active_mut().update_item(id, patch).is_none() {
            return false;
        }
        if old_photo != kept_photo {
            self.release_photo(old_photo.as_deref());
        }

        self.commit();
        true
    }

    /// Delete an item from the active cellar, releasing its managed photo
    pub fn delete_item(&mut self, id: Uuid) -> bool {
        let Some(item) = self.registry.active_mut().delete_item(id) else {
            debug!(%id, "Rejected delete of unknown item");
            return false;
        };
        self.release_photo(item.photo_reference.as_deref());
        self.commit();
        true
    }

    /// Move an item of the active cellar, swapping with any occupant
    pub fn move_item(&mut self, id: Uuid, row: i32, col: i32) -> bool {
        let moved = self.registry.active_mut().move_item(id, row, col);
        self.finish(moved, "move item")
    }

    // ==================== Configuration Commands ====================

    /// Replace the active cellar's configuration
    pub fn set_config(&mut self, config: CellarConfig) -> bool {
        let changed = self.registry.set_config(config);
        self.finish(changed, "set config")
    }

    /// Rename the active cellar
    pub fn set_name(&mut self, name: &str) -> bool {
        let changed = self.registry.set_name(name);
        self.finish(changed, "set name")
    }

    /// Resize the active cellar
    pub fn set_dimensions(&mut self, rows: i32, cols: i32) -> bool {
        let changed = self.registry.set_dimensions(rows, cols);
        self.finish(changed, "set dimensions")
    }

    /// Set the number of rows of the active cellar
    pub fn set_rows(&mut self, rows: i32) -> bool {
        let cols = self.config().cols;
        self.set_dimensions(rows, cols)
    }

    /// Set the number of columns of the active cellar
    pub fn set_cols(&mut self, cols: i32) -> bool {
        let rows = self.config().rows;
        self.set_dimensions(rows, cols)
    }

    /// Enable or disable one cell of the active cellar
    pub fn set_cell_enabled(&mut self, row: i32, col: i32, enabled: bool) -> bool {
        let changed = self.registry.set_cell_enabled(row, col, enabled);
        self.finish(changed, "toggle cell")
    }

    /// Enable one more cell in the active cellar
    pub fn add_compartment(&mut self) -> bool {
        let changed = self.registry.add_compartment();
        self.finish(changed, "add compartment")
    }

    /// Relocate an empty enabled cell to an empty disabled one
    pub fn move_compartment(&mut self, src: Cell, dst: Cell) -> bool {
        let changed = self.registry.move_compartment(src, dst);
        self.finish(changed, "move compartment")
    }

    // ==================== Cellar Commands ====================

    /// Add a cellar and make it active
    pub fn add_cellar(&mut self, name: Option<&str>, config: Option<CellarConfig>) -> bool {
        let added = self.registry.add_cellar(name, config);
        if added {
            info!(name = %self.config().name, "Added cellar");
        }
        self.finish(added, "add cellar")
    }

    /// Delete the cellar at `index`, releasing its managed photos
    pub fn delete_cellar(&mut self, index: usize) -> bool {
        let photos: Vec<String> = self
            .registry
            .cellars()
            .get(index)
            .map(|cellar| {
                cellar
                    .items
                    .iter()
                    .filter_map(|item| item.photo_reference.clone())
                    .collect()
            })
            .unwrap_or_default();

        if !self.registry.delete_cellar(index) {
            return self.finish(false, "delete cellar");
        }
        for photo in &photos {
            self.release_photo(Some(photo));
        }
        info!(index, "Deleted cellar");
        self.finish(true, "delete cellar")
    }

    /// Delete the active cellar
    pub fn delete_active_cellar(&mut self) -> bool {
        self.delete_cellar(self.active_index())
    }

    /// Rename the cellar at `index`
    pub fn rename_cellar(&mut self, index: usize, name: &str) -> bool {
        let renamed = self.registry.rename_cellar(index, name);
        self.finish(renamed, "rename cellar")
    }

    /// Make the cellar at `index` active
    ///
    /// Subscribers are notified; the store file is left alone since the
    /// active index is not part of it.
    pub fn set_active_cellar(&mut self, index: usize) -> bool {
        if !self.registry.set_active_cellar(index) {
            debug!(index, "Command rejected: select cellar");
            return false;
        }
        self.publish();
        true
    }

    /// Move the cellar at `from` to position `to`
    pub fn move_cellar(&mut self, from: usize, to: usize) -> bool {
        let moved = self.registry.move_cellar(from, to);
        self.finish(moved, "move cellar")
    }

    // ==================== Internals ====================

    fn finish(&mut self, applied: bool, command: &str) -> bool {
        if applied {
            self.commit();
        } else {
            debug!(command, "Command rejected");
        }
        applied
    }

    fn publish(&self) {
        self.snapshot.send_replace(Snapshot::of(&self.registry));
    }

    /// Publish a snapshot and write the store file (best effort)
    fn commit(&mut self) {
        self.publish();

        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(self.registry.cellars()) {
                warn!(
                    hint = e.recovery_suggestion().unwrap_or_default(),
                    "Failed to save cellars to {:?}: {}",
                    persistence.path(),
                    e
                );
            }
        }
    }

    /// Turn an external photo reference into a managed one when possible
    fn adopt_photo(&self, item_id: Uuid, reference: Option<String>) -> Option<String> {
        let reference = reference.filter(|r| !r.trim().is_empty())?;
        if self.photos.is_managed(&reference) {
            return Some(reference);
        }
        match self.photos.persist(item_id, &reference) {
            Ok(managed) => Some(managed),
            Err(e) => {
                warn!("Keeping external photo reference {}: {}", reference, e);
                Some(reference)
            }
        }
    }

    fn release_photo(&self, reference: Option<&str>) {
        let Some(reference) = reference else {
            return;
        };
        if let Err(e) = self.photos.release(reference) {
            warn!("Failed to release photo {}: {}", reference, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    use tempfile::TempDir;

    use crate::storage::StorageResult;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            log_file: None,
            log_level: "info".to_string(),
        }
    }

    /// Records photo calls; references starting with "managed:" are owned
    #[derive(Default, Clone)]
    struct RecordingPhotos {
        released: Rc<RefCell<Vec<String>>>,
    }

    impl PhotoStore for RecordingPhotos {
        fn persist(&self, item_id: Uuid, source: &str) -> StorageResult<String> {
            Ok(format!("managed:{}:{}", item_id, source))
        }

        fn release(&self, reference: &str) -> StorageResult<()> {
            if self.is_managed(reference) {
                self.released.borrow_mut().push(reference.to_string());
            }
            Ok(())
        }

        fn is_managed(&self, reference: &str) -> bool {
            reference.starts_with("managed:")
        }
    }

    fn recording_store() -> (Store, Rc<RefCell<Vec<String>>>) {
        let photos = RecordingPhotos::default();
        let released = photos.released.clone();
        let store = Store::with_parts(CellarRegistry::default(), None, Box::new(photos));
        (store, released)
    }

    #[test]
    fn test_open_creates_default_cellar() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_with_config(&test_config(&temp_dir));

        assert_eq!(store.summaries().len(), 1);
        assert_eq!(store.config().rows, 4);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let id = {
            let mut store = Store::open_with_config(&config);
            store.add_cellar(Some("Garage"), Some(CellarConfig::new("", 2, 3)));
            let item = Item::new("Vouvray", 1, 2);
            let id = item.id;
            assert!(store.add_item(item));
            id
        };

        let mut store = Store::open_with_config(&config);
        assert_eq!(
            store.summaries(),
            vec![
                CellarSummary {
                    name: "Cellar 1".to_string(),
                    item_count: 0
                },
                CellarSummary {
                    name: "Garage".to_string(),
                    item_count: 1
                },
            ]
        );

        // Active index is not persisted
        assert_eq!(store.active_index(), 0);
        assert!(store.set_active_cellar(1));
        assert_eq!(store.item(id).unwrap().position(), (1, 2));
    }

    #[test]
    fn test_malformed_store_file_starts_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.cellars_path(), "[{\"config\": 42}]").unwrap();

        let store = Store::open_with_config(&config);
        assert_eq!(store.summaries().len(), 1);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_persistence_failure_is_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        // The store path is a directory, so every write fails
        let blocked = temp_dir.path().join("cellars.json");
        fs::create_dir_all(&blocked).unwrap();

        let mut store = Store::with_parts(
            CellarRegistry::default(),
            Some(JsonPersistence::new(blocked)),
            Box::new(UnmanagedPhotos),
        );

        assert!(store.add_item(Item::new("Still here", 0, 0)));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_add_item_rejected_on_unusable_cell() {
        let mut store = Store::in_memory();
        assert!(!store.add_item(Item::new("Nowhere", 9, 9)));
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_query_surface() {
        let mut store = Store::in_memory();
        let item = Item::new("Gigondas", 2, 1);
        let id = item.id;
        store.add_item(item);

        assert_eq!(store.item(id).unwrap().name, "Gigondas");
        assert_eq!(store.item_at(2, 1).unwrap().id, id);
        assert!(store.is_occupied(2, 1));
        assert!(!store.is_occupied(1, 2));
        assert_eq!(store.search_items("gigo").len(), 1);
        assert!(store.orphans().is_empty());
    }

    #[test]
    fn test_read_your_writes_after_resize() {
        let mut store = Store::in_memory();
        let item = Item::new("Corner", 0, 3);
        let id = item.id;
        store.add_item(item);

        assert!(store.set_dimensions(3, 3));
        assert_eq!(store.item(id).unwrap().position(), (0, 2));
        assert_eq!(store.snapshot().items[0].position(), (0, 2));
    }

    #[test]
    fn test_set_rows_and_cols() {
        let mut store = Store::in_memory();
        assert!(store.set_rows(6));
        assert!(store.set_cols(2));
        assert_eq!((store.config().rows, store.config().cols), (6, 2));
        assert!(!store.set_cols(2));
    }

    #[test]
    fn test_shrink_full_grid_orphans() {
        let mut store = Store::in_memory();
        for r in 0..4 {
            for c in 0..4 {
                assert!(store.add_item(Item::new(format!("{}{}", r, c), r, c)));
            }
        }

        assert!(store.set_dimensions(3, 3));
        assert_eq!(store.items().len(), 16);
        assert_eq!(store.orphans().len(), 7);

        let orphan_ids: HashSet<Uuid> = store.orphans().iter().map(|item| item.id).collect();
        let placed: HashSet<Cell> = store
            .items()
            .iter()
            .filter(|item| !orphan_ids.contains(&item.id))
            .map(Item::position)
            .collect();
        assert_eq!(placed.len(), 9);
    }

    #[test]
    fn test_reapplying_shape_rescues_orphans() {
        let mut store = Store::in_memory();
        for r in 0..4 {
            for c in 0..4 {
                store.add_item(Item::new(format!("{}{}", r, c), r, c));
            }
        }
        store.set_dimensions(3, 3);

        let orphan_ids: HashSet<Uuid> = store.orphans().iter().map(|item| item.id).collect();
        let freed: Vec<Uuid> = store
            .items()
            .iter()
            .map(|item| item.id)
            .filter(|id| !orphan_ids.contains(id))
            .take(2)
            .collect();
        for id in freed {
            assert!(store.delete_item(id));
        }
        assert_eq!(store.orphans().len(), 7);

        assert!(store.set_dimensions(3, 3));
        assert_eq!(store.items().len(), 14);
        assert_eq!(store.orphans().len(), 5);

        // Same again through set_config: nothing left to place
        let config = store.config().clone();
        assert!(store.set_config(config));
        assert_eq!(store.orphans().len(), 5);
    }

    #[test]
    fn test_select_cellar_publishes_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cellars.json");
        let registry = CellarRegistry::from_cellars(vec![
            Cellar::default(),
            Cellar::new(CellarConfig::new("Second", 2, 2)),
        ]);
        let mut store = Store::with_parts(
            registry,
            Some(JsonPersistence::new(&path)),
            Box::new(UnmanagedPhotos),
        );
        let mut rx = store.subscribe();

        assert!(store.set_active_cellar(1));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().active_index, 1);
        assert!(!path.exists());

        assert!(!store.set_active_cellar(5));
        assert!(!rx.has_changed().unwrap());

        assert!(store.set_name("Renamed"));
        assert!(path.exists());
    }

    #[test]
    fn test_subscribers_see_accepted_commands_only() {
        let mut store = Store::in_memory();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        assert!(!store.delete_cellar(0));
        assert!(!rx.has_changed().unwrap());

        assert!(store.add_cellar(None, None));
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.active_index, 1);
        assert_eq!(snapshot.summaries.len(), 2);
        assert_eq!(snapshot.config.name, "Cellar 2");
    }

    #[test]
    fn test_delete_only_cellar_is_noop() {
        let mut store = Store::in_memory();
        assert!(!store.delete_active_cellar());
        assert_eq!(store.summaries().len(), 1);
    }

    #[test]
    fn test_cellar_commands() {
        let mut store = Store::in_memory();
        store.add_cellar(Some("Cave"), None);
        store.add_cellar(Some("cave"), None);
        assert_eq!(store.config().name, "cave (2)");

        assert!(store.rename_cellar(0, "Main"));
        assert!(store.move_cellar(2, 0));
        assert_eq!(store.active_index(), 0);
        assert_eq!(store.config().name, "cave (2)");

        assert!(store.set_name("Spare"));
        assert!(store.delete_cellar(1));
        let names: Vec<String> = store.summaries().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Spare", "Cave"]);
    }

    #[test]
    fn test_compartment_commands() {
        let mut store = Store::in_memory();
        assert!(store.set_config(
            CellarConfig::new("Cellar 1", 2, 2).with_enabled_cells([(0, 0), (0, 1)])
        ));
        store.add_item(Item::new("Anchor", 0, 0));

        assert!(store.move_compartment((0, 1), (1, 0)));
        assert!(!store.move_compartment((0, 0), (1, 1)));
        assert!(store.add_compartment());
        assert!(store.set_cell_enabled(1, 1, true));
        assert_eq!(grid::capacity(store.config()), 4);
    }

    #[test]
    fn test_add_item_adopts_photo() {
        let (mut store, _) = recording_store();
        let mut item = Item::new("Photo", 0, 0);
        item.set_photo_reference(Some("/tmp/label.jpg".to_string()));
        let id = item.id;
        store.add_item(item);

        let reference = store.item(id).unwrap().photo_reference.clone().unwrap();
        assert_eq!(reference, format!("managed:{}:/tmp/label.jpg", id));
    }

    #[test]
    fn test_replace_releases_previous_photo() {
        let (mut store, released) = recording_store();
        let mut first = Item::new("First", 1, 1);
        first.set_photo_reference(Some("a.jpg".to_string()));
        store.add_item(first);
        let first_photo = store.item_at(1, 1).unwrap().photo_reference.clone().unwrap();

        store.add_item(Item::new("Second", 1, 1));
        assert_eq!(*released.borrow(), vec![first_photo]);
        assert!(store.item_at(1, 1).unwrap().photo_reference.is_none());
    }

    #[test]
    fn test_update_photo_releases_old_copy() {
        let (mut store, released) = recording_store();
        let mut item = Item::new("Label", 0, 0);
        item.set_photo_reference(Some("old.jpg".to_string()));
        let id = item.id;
        store.add_item(item);
        let old = store.item(id).unwrap().photo_reference.clone().unwrap();

        // Same photo: nothing released
        let patch = store.item(id).unwrap().patch();
        assert!(store.update_item(id, patch));
        assert!(released.borrow().is_empty());

        let mut patch = store.item(id).unwrap().patch();
        patch.photo_reference = Some("new.jpg".to_string());
        assert!(store.update_item(id, patch));

        assert_eq!(*released.borrow(), vec![old]);
        assert_eq!(
            store.item(id).unwrap().photo_reference.as_deref(),
            Some(format!("managed:{}:new.jpg", id).as_str())
        );
    }

    #[test]
    fn test_delete_releases_photo_once() {
        let (mut store, released) = recording_store();
        let mut item = Item::new("Gone", 0, 0);
        item.set_photo_reference(Some("gone.jpg".to_string()));
        let id = item.id;
        store.add_item(item);

        assert!(store.delete_item(id));
        assert!(!store.delete_item(id));
        assert_eq!(released.borrow().len(), 1);
    }

    #[test]
    fn test_update_unknown_item_rejected() {
        let mut store = Store::in_memory();
        assert!(!store.update_item(Uuid::new_v4(), ItemPatch::default()));
        assert!(!store.move_item(Uuid::new_v4(), 0, 0));
    }

    #[test]
    fn test_managed_photo_dir_wired_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let source: PathBuf = temp_dir.path().join("shot.jpg");
        fs::write(&source, b"jpeg").unwrap();

        let mut store = Store::open_with_config(&config);
        let mut item = Item::new("Shot", 0, 0);
        item.set_photo_reference(Some(source.to_string_lossy().into_owned()));
        let id = item.id;
        store.add_item(item);

        let managed = PathBuf::from(store.item(id).unwrap().photo_reference.clone().unwrap());
        assert!(managed.starts_with(config.photos_dir()));
        assert!(managed.exists());

        store.delete_item(id);
        assert!(!managed.exists());
        assert!(source.exists());
    }
}
