//! Cellar registry
//!
//! Owns the ordered list of cellars and the active-cellar selector, keeps
//! cellar names unique, and applies configuration changes to the active
//! cellar through the migration engine.
//!
//! The list is never empty and the active index always points at a valid
//! entry. Commands that would break either rule are rejected and return
//! `false`.

use tracing::{debug, warn};

use crate::grid;
use crate::models::{Cell, Cellar, CellarConfig, CellarSummary, MAX_DIMENSION};

/// Ordered collection of cellars with one of them active
#[derive(Debug, Clone, PartialEq)]
pub struct CellarRegistry {
    cellars: Vec<Cellar>,
    active: usize,
}

impl Default for CellarRegistry {
    fn default() -> Self {
        Self {
            cellars: vec![Cellar::default()],
            active: 0,
        }
    }
}

impl CellarRegistry {
    /// Create a registry from loaded cellars
    ///
    /// An empty list yields one default cellar. Configs are normalised, the
    /// first cellar is active.
    pub fn from_cellars(cellars: Vec<Cellar>) -> Self {
        if cellars.is_empty() {
            return Self::default();
        }
        let cellars = cellars
            .into_iter()
            .map(|mut cellar| {
                cellar.config = cellar.config.normalized();
                cellar
            })
            .collect();
        Self { cellars, active: 0 }
    }

    /// All cellars, in display order
    pub fn cellars(&self) -> &[Cellar] {
        &self.cellars
    }

    /// Number of cellars (always at least one)
    pub fn len(&self) -> usize {
        self.cellars.len()
    }

    /// Always `false`; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.cellars.is_empty()
    }

    /// Index of the active cellar
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active cellar
    pub fn active(&self) -> &Cellar {
        &self.cellars[self.active]
    }

    /// The active cellar, mutably
    pub fn active_mut(&mut self) -> &mut Cellar {
        &mut self.cellars[self.active]
    }

    /// Name and item count of every cellar
    pub fn summaries(&self) -> Vec<CellarSummary> {
        self.cellars.iter().map(Cellar::summary).collect()
    }

    // ==================== Lifecycle ====================

    /// Append a new cellar and make it active
    ///
    /// Without a name the cellar is called "Cellar N" (or takes the name of
    /// the supplied config). A blank name is rejected.
    pub fn add_cellar(&mut self, name: Option<&str>, config: Option<CellarConfig>) -> bool {
        let config = config.map(CellarConfig::normalized);
        let requested = match (name, &config) {
            (Some(name), _) => name.to_string(),
            (None, Some(config)) => config.name.clone(),
            (None, None) => format!("Cellar {}", self.cellars.len() + 1),
        };
        if requested.trim().is_empty() {
            debug!("Rejected cellar with blank name");
            return false;
        }

        let name = self.unique_name(requested.trim(), None);
        let config = CellarConfig {
            name,
            ..config.unwrap_or_default()
        };
        self.cellars.push(Cellar::new(config));
        self.active = self.cellars.len() - 1;
        true
    }

    /// Remove the cellar at `index`
    ///
    /// The last remaining cellar cannot be deleted. The active index is kept
    /// and clamped to the new end of the list.
    pub fn delete_cellar(&mut self, index: usize) -> bool {
        if self.cellars.len() <= 1 || index >= self.cellars.len() {
            debug!(index, count = self.cellars.len(), "Rejected cellar deletion");
            return false;
        }
        self.cellars.remove(index);
        self.active = self.active.min(self.cellars.len() - 1);
        true
    }

    /// Remove the active cellar
    pub fn delete_active_cellar(&mut self) -> bool {
        self.delete_cellar(self.active)
    }

    /// Rename the cellar at `index`, suffixing the name if it collides
    pub fn rename_cellar(&mut self, index: usize, name: &str) -> bool {
        if index >= self.cellars.len() || name.trim().is_empty() {
            return false;
        }
        let name = self.unique_name(name.trim(), Some(index));
        self.cellars[index].config.name = name;
        true
    }

    /// Make the cellar at `index` active
    pub fn set_active_cellar(&mut self, index: usize) -> bool {
        if index >= self.cellars.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Move the cellar at `from` so that it ends up at `to`
    ///
    /// The active index follows the same logical cellar.
    pub fn move_cellar(&mut self, from: usize, to: usize) -> bool {
        let len = self.cellars.len();
        if from >= len || to >= len || from == to {
            return false;
        }

        let cellar = self.cellars.remove(from);
        self.cellars.insert(to, cellar);

        let active = self.active;
        self.active = if active == from {
            to
        } else if from < active && active <= to {
            active - 1
        } else if to <= active && active < from {
            active + 1
        } else {
            active
        };
        true
    }

    // ==================== Active cellar configuration ====================

    /// Replace the active cellar's configuration and migrate its items
    ///
    /// The config is normalised and its name made unique. Re-applying the
    /// current config is a no-op unless items are orphaned, in which case
    /// migration runs again and places them in any freed cells.
    pub fn set_config(&mut self, config: CellarConfig) -> bool {
        let mut config = config.normalized();
        if config.name.trim().is_empty() {
            config.name = self.active().config.name.clone();
        }
        let name = self.unique_name(config.name.trim(), Some(self.active));
        config.name = name;
        if config == self.active().config && self.active().orphans().is_empty() {
            return false;
        }

        let migration = self.active_mut().reconfigure(config);
        if !migration.is_complete() {
            warn!(
                orphaned = migration.orphaned.len(),
                "Grid too small for every item; orphans keep their old position"
            );
        } else if migration.relocated > 0 {
            debug!(relocated = migration.relocated, "Items relocated after reconfiguration");
        }
        true
    }

    /// Rename the active cellar
    pub fn set_name(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        let config = CellarConfig {
            name: name.to_string(),
            ..self.active().config.clone()
        };
        self.set_config(config)
    }

    /// Resize the active cellar, clamping to the allowed bounds
    pub fn set_dimensions(&mut self, rows: i32, cols: i32) -> bool {
        let config = CellarConfig {
            rows,
            cols,
            ..self.active().config.clone()
        };
        self.set_config(config)
    }

    /// Enable or disable a single in-bounds cell of the active cellar
    ///
    /// Disabling an occupied cell relocates its item.
    pub fn set_cell_enabled(&mut self, row: i32, col: i32, enabled: bool) -> bool {
        let config = self.active().config.clone();
        if !config.contains(row, col) || grid::is_usable(&config, row, col) == enabled {
            return false;
        }

        let mut mask = grid::enabled_mask(&config);
        if enabled {
            mask.insert((row, col));
        } else {
            mask.remove(&(row, col));
        }
        self.set_config(CellarConfig {
            enabled_cells: Some(mask),
            ..config
        })
    }

    /// Enable exactly one more cell in the active cellar
    ///
    /// Picks the first disabled cell inside the current bounds. When there
    /// is none the smaller dimension grows by one (columns on a tie) and a
    /// single cell of the new row or column is enabled.
    pub fn add_compartment(&mut self) -> bool {
        let config = self.active().config.clone();
        let mut mask = grid::enabled_mask(&config);

        if let Some(&cell) = grid::disabled_cells(&config).first() {
            mask.insert(cell);
            return self.set_config(CellarConfig {
                enabled_cells: Some(mask),
                ..config
            });
        }

        let can_grow_rows = config.rows < MAX_DIMENSION;
        let can_grow_cols = config.cols < MAX_DIMENSION;
        let grow_cols = match (can_grow_rows, can_grow_cols) {
            (false, false) => {
                debug!("Rejected compartment: grid is at its maximum size");
                return false;
            }
            (true, false) => false,
            (false, true) => true,
            (true, true) => config.cols <= config.rows,
        };

        let (rows, cols, cell): (i32, i32, Cell) = if grow_cols {
            (config.rows, config.cols + 1, ((config.rows - 1).max(0), config.cols))
        } else {
            (config.rows + 1, config.cols, (config.rows, 0))
        };
        mask.insert(cell);
        self.set_config(CellarConfig {
            rows,
            cols,
            enabled_cells: Some(mask),
            ..config
        })
    }

    /// Move an empty enabled cell to an empty disabled position
    pub fn move_compartment(&mut self, src: Cell, dst: Cell) -> bool {
        let cellar = self.active();
        let config = cellar.config.clone();

        let movable = grid::is_usable(&config, src.0, src.1)
            && config.contains(dst.0, dst.1)
            && !grid::is_usable(&config, dst.0, dst.1)
            && !cellar.is_occupied(src.0, src.1)
            && !cellar.is_occupied(dst.0, dst.1);
        if !movable {
            debug!(?src, ?dst, "Rejected compartment move");
            return false;
        }

        let mut mask = grid::enabled_mask(&config);
        mask.remove(&src);
        mask.insert(dst);
        self.set_config(CellarConfig {
            enabled_cells: Some(mask),
            ..config
        })
    }

    // ==================== Names ====================

    /// `desired`, or `desired (N)` with the smallest N >= 2 that is free
    ///
    /// Comparison is case-insensitive; the cellar at `ignore` does not count.
    pub fn unique_name(&self, desired: &str, ignore: Option<usize>) -> String {
        let taken = |candidate: &str| {
            self.cellars
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != ignore)
                .any(|(_, cellar)| cellar.config.name.to_lowercase() == candidate.to_lowercase())
        };

        if !taken(desired) {
            return desired.to_string();
        }
        (2..)
            .map(|n| format!("{} ({})", desired, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| desired.to_string())
    }
}
