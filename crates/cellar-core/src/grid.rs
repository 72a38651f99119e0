//! Grid geometry
//!
//! Pure functions deriving the set of usable cells from a `CellarConfig`.
//! The row-major order returned by `usable_cells` is the canonical tie-break
//! used when items have to be relocated.

use std::collections::BTreeSet;

use crate::models::{Cell, CellarConfig};

/// Whether `(row, col)` can hold an item under `config`
pub fn is_usable(config: &CellarConfig, row: i32, col: i32) -> bool {
    if !config.contains(row, col) {
        return false;
    }
    match &config.enabled_cells {
        Some(cells) => cells.contains(&(row, col)),
        None => true,
    }
}

/// All usable cells, row 0 first, then increasing column
pub fn usable_cells(config: &CellarConfig) -> Vec<Cell> {
    cells_where(config, true)
}

/// In-bounds cells that are not usable, in row-major order
pub fn disabled_cells(config: &CellarConfig) -> Vec<Cell> {
    cells_where(config, false)
}

/// Number of usable cells
pub fn capacity(config: &CellarConfig) -> usize {
    usable_cells(config).len()
}

/// Every cell of a `rows` x `cols` rectangle, as an explicit mask
pub fn dense_cells(rows: i32, cols: i32) -> BTreeSet<Cell> {
    (0..rows.max(0))
        .flat_map(|r| (0..cols.max(0)).map(move |c| (r, c)))
        .collect()
}

/// The explicit mask of `config`, materialising the dense rectangle if needed
pub fn enabled_mask(config: &CellarConfig) -> BTreeSet<Cell> {
    match &config.enabled_cells {
        Some(cells) => cells.clone(),
        None => dense_cells(config.rows, config.cols),
    }
}

fn cells_where(config: &CellarConfig, usable: bool) -> Vec<Cell> {
    (0..config.rows.max(0))
        .flat_map(|r| (0..config.cols.max(0)).map(move |c| (r, c)))
        .filter(|&(r, c)| is_usable(config, r, c) == usable)
        .collect()
}
