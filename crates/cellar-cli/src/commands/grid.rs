//! Grid command handlers (act on the active cellar)

use anyhow::Result;

use cellar_core::Store;

use crate::output::Output;

/// Show the active grid
pub fn show(store: &Store, output: &Output) -> Result<()> {
    output.print_grid(store.config(), store.items(), &store.orphans());
    Ok(())
}

/// Resize the active grid
pub fn resize(store: &mut Store, rows: i32, cols: i32, output: &Output) -> Result<()> {
    let before = store.orphans().len();
    let resized = store.set_dimensions(rows, cols);
    let config = store.config();
    output.outcome(
        resized,
        &format!("Resized {} to {} x {}", config.name, config.rows, config.cols),
        "Grid unchanged",
    );
    report_orphans(store, before, output);
    Ok(())
}

/// Rename the active cellar
pub fn rename(store: &mut Store, name: String, output: &Output) -> Result<()> {
    let renamed = store.set_name(&name);
    output.outcome(
        renamed,
        &format!("Renamed to {}", store.config().name),
        "Name unchanged",
    );
    Ok(())
}

/// Enable or disable one compartment
pub fn toggle(store: &mut Store, row: i32, col: i32, enabled: bool, output: &Output) -> Result<()> {
    let before = store.orphans().len();
    let changed = store.set_cell_enabled(row, col, enabled);
    let verb = if enabled { "Enabled" } else { "Disabled" };
    output.outcome(
        changed,
        &format!("{} compartment ({}, {})", verb, row, col),
        "Compartment unchanged: outside the grid or already in that state",
    );
    report_orphans(store, before, output);
    Ok(())
}

/// Enable one more compartment, growing the grid when needed
pub fn add_compartment(store: &mut Store, output: &Output) -> Result<()> {
    let added = store.add_compartment();
    let config = store.config();
    output.outcome(
        added,
        &format!("Added compartment ({} x {})", config.rows, config.cols),
        "No compartment added: grid is at its maximum size",
    );
    Ok(())
}

/// Relocate an empty compartment to a disabled cell
pub fn move_compartment(
    store: &mut Store,
    src: (i32, i32),
    dst: (i32, i32),
    output: &Output,
) -> Result<()> {
    let moved = store.move_compartment(src, dst);
    output.outcome(
        moved,
        &format!("Moved compartment {:?} to {:?}", src, dst),
        "Compartment not moved: source must be enabled and empty, target disabled",
    );
    Ok(())
}

fn report_orphans(store: &Store, before: usize, output: &Output) {
    let after = store.orphans().len();
    if after > before {
        output.rejected(&format!(
            "{} item(s) no longer fit and are kept unplaced",
            after - before
        ));
    }
}
