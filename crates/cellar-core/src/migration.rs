//! Item migration
//!
//! Reconciles item positions after a configuration change. Each item is
//! clamped into the new bounds and kept there if that cell is usable and
//! still free; otherwise the next free usable cell in row-major order is
//! taken, wrapping around to the start of the grid.
//!
//! When there are more items than usable cells, the items that cannot be
//! placed keep their old position. They are reported as orphans and are not
//! renderable until the grid grows again.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::grid;
use crate::models::{Cell, CellarConfig, Item};

/// Result of migrating a set of items onto a new configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    /// Items with their new positions, in input order
    pub items: Vec<Item>,
    /// Number of items whose position changed
    pub relocated: usize,
    /// Items that could not be placed and kept their old position
    pub orphaned: Vec<Uuid>,
}

impl Migration {
    /// Whether every item found a usable cell
    pub fn is_complete(&self) -> bool {
        self.orphaned.is_empty()
    }
}

/// Place `items` onto the grid described by `config`
///
/// A configuration without usable cells leaves every item untouched.
pub fn migrate(items: Vec<Item>, config: &CellarConfig) -> Migration {
    let valid = grid::usable_cells(config);
    if valid.is_empty() {
        return Migration {
            items,
            relocated: 0,
            orphaned: Vec::new(),
        };
    }

    let rank: HashMap<Cell, usize> = valid.iter().enumerate().map(|(i, &cell)| (cell, i)).collect();
    let mut claimed: HashSet<Cell> = HashSet::with_capacity(valid.len());
    let mut relocated = 0;
    let mut orphaned = Vec::new();

    // rows/cols are at least 1 here since the grid has a usable cell
    let max_row = config.rows - 1;
    let max_col = config.cols - 1;

    let items: Vec<Item> = items
        .into_iter()
        .map(|mut item| {
            let desired = (item.row.clamp(0, max_row), item.col.clamp(0, max_col));

            let target = match rank.get(&desired) {
                Some(_) if !claimed.contains(&desired) => Some(desired),
                start => {
                    let start = start.copied().unwrap_or(0);
                    first_free(&valid[start..], &claimed)
                        .or_else(|| first_free(&valid[..start], &claimed))
                }
            };

            match target {
                Some(cell) => {
                    claimed.insert(cell);
                    if item.position() != cell {
                        item.row = cell.0;
                        item.col = cell.1;
                        relocated += 1;
                    }
                }
                None => orphaned.push(item.id),
            }
            item
        })
        .collect();

    Migration {
        items,
        relocated,
        orphaned,
    }
}

fn first_free(cells: &[Cell], claimed: &HashSet<Cell>) -> Option<Cell> {
    cells.iter().copied().find(|cell| !claimed.contains(cell))
}
