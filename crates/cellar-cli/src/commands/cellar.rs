//! Cellar command handlers

use anyhow::Result;

use cellar_core::{CellarConfig, Store};

use crate::output::Output;

/// List every cellar
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_summaries(&store.summaries(), store.active_index());
    Ok(())
}

/// Add a cellar and make it active
pub fn add(
    store: &mut Store,
    name: Option<String>,
    rows: Option<i32>,
    cols: Option<i32>,
    output: &Output,
) -> Result<()> {
    let default_name = format!("Cellar {}", store.summaries().len() + 1);
    let config = (rows.is_some() || cols.is_some()).then(|| {
        let defaults = CellarConfig::default();
        CellarConfig::new(
            name.clone().unwrap_or(default_name),
            rows.unwrap_or(defaults.rows),
            cols.unwrap_or(defaults.cols),
        )
    });

    let added = store.add_cellar(name.as_deref(), config);
    output.outcome(
        added,
        &format!("Added cellar: {}", store.config().name),
        "Cellar not added: name must not be blank",
    );
    Ok(())
}

/// Delete a cellar
pub fn delete(store: &mut Store, index: usize, output: &Output) -> Result<()> {
    let name = store
        .summaries()
        .get(index)
        .map(|summary| summary.name.clone())
        .unwrap_or_default();

    let deleted = store.delete_cellar(index);
    output.outcome(
        deleted,
        &format!("Deleted cellar: {}", name),
        "Cellar not deleted: unknown index or last remaining cellar",
    );
    Ok(())
}

/// Rename a cellar
pub fn rename(store: &mut Store, index: usize, name: String, output: &Output) -> Result<()> {
    let renamed = store.rename_cellar(index, &name);
    let stored = store
        .summaries()
        .get(index)
        .map(|summary| summary.name.clone())
        .unwrap_or(name);
    output.outcome(
        renamed,
        &format!("Renamed cellar {} to {}", index, stored),
        "Cellar not renamed: unknown index or blank name",
    );
    Ok(())
}

/// Move a cellar to a new position in the list
pub fn reorder(store: &mut Store, from: usize, to: usize, output: &Output) -> Result<()> {
    let moved = store.move_cellar(from, to);
    output.outcome(
        moved,
        &format!("Moved cellar {} to {}", from, to),
        "Cellar not moved: indices must be distinct and in range",
    );
    Ok(())
}
