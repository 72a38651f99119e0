//! Placement store
//!
//! CRUD over a cellar's items with the placement invariants: an item only
//! ever sits on a usable cell, and no two items share a cell. Invalid
//! commands are rejected without touching state; each mutating method
//! reports whether anything happened so that the caller can decide whether
//! to publish and persist.

use std::collections::HashSet;

use uuid::Uuid;

use crate::grid;
use crate::migration::{self, Migration};
use crate::models::{Cellar, CellarConfig, Item, ItemPatch};

/// Outcome of an accepted `add_item`
#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    /// The cell was free and the item was appended
    Inserted,
    /// The cell was taken; the occupant was overwritten in place
    Replaced { previous: Item },
}

impl Cellar {
    /// All items, in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by ID
    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The item at `(row, col)`, if any
    pub fn item_at(&self, row: i32, col: i32) -> Option<&Item> {
        self.items.iter().find(|item| item.position() == (row, col))
    }

    /// Whether `(row, col)` holds an item
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.item_at(row, col).is_some()
    }

    /// Items whose name, vintage, note or origin contains `query`
    pub fn search(&self, query: &str) -> Vec<&Item> {
        self.items.iter().filter(|item| item.matches(query)).collect()
    }

    /// Items that cannot be rendered under the current config
    ///
    /// An item is orphaned when its cell is not usable, or when an earlier
    /// item already sits on the same cell (overflow after a migration).
    pub fn orphans(&self) -> Vec<&Item> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|item| {
                !grid::is_usable(&self.config, item.row, item.col) || !seen.insert(item.position())
            })
            .collect()
    }

    /// Place `item` at its position
    ///
    /// Returns `None` when the position is not usable. When the cell is
    /// already taken the new values overwrite the occupant, which keeps its
    /// `id` and `created_at`.
    pub fn add_item(&mut self, item: Item) -> Option<Placed> {
        if !grid::is_usable(&self.config, item.row, item.col) {
            return None;
        }

        let position = item.position();
        match self.items.iter_mut().find(|slot| slot.position() == position) {
            Some(slot) => {
                let previous = slot.clone();
                *slot = Item {
                    id: previous.id,
                    created_at: previous.created_at,
                    ..item
                }
                .normalized();
                Some(Placed::Replaced { previous })
            }
            None => {
                self.items.push(item.normalized());
                Some(Placed::Inserted)
            }
        }
    }

    /// Replace the mutable fields of item `id`
    ///
    /// Returns the previous version, or `None` if the ID is unknown.
    pub fn update_item(&mut self, id: Uuid, patch: ItemPatch) -> Option<Item> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        let previous = item.clone();
        item.apply(patch);
        Some(previous)
    }

    /// Remove item `id` and hand it back
    pub fn delete_item(&mut self, id: Uuid) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Move item `id` to `(row, col)`, swapping with any occupant
    ///
    /// Returns `false` when the ID is unknown, the target is not usable,
    /// or the item already sits there.
    pub fn move_item(&mut self, id: Uuid, row: i32, col: i32) -> bool {
        if !grid::is_usable(&self.config, row, col) {
            return false;
        }
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };

        let from = self.items[index].position();
        if from == (row, col) {
            return false;
        }

        if let Some(other) = self
            .items
            .iter()
            .position(|item| item.id != id && item.position() == (row, col))
        {
            let occupant = &mut self.items[other];
            occupant.row = from.0;
            occupant.col = from.1;
        }

        let item = &mut self.items[index];
        item.row = row;
        item.col = col;
        true
    }

    /// Switch to `config`, migrating every item onto the new grid
    pub fn reconfigure(&mut self, config: CellarConfig) -> Migration {
        let items = std::mem::take(&mut self.items);
        let migration = migration::migrate(items, &config);
        self.items = migration.items.clone();
        self.config = config;
        migration
    }
}
