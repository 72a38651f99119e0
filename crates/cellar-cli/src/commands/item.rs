//! Item command handlers (act on the active cellar)

use std::io::{self, IsTerminal, Write};

use anyhow::{bail, Result};
use clap::Args;
use uuid::Uuid;

use cellar_core::{Item, ItemPatch, Store, WineKind};

use crate::output::Output;

/// Descriptive item fields shared by `item add` and `item edit`
///
/// An empty string clears an optional field.
#[derive(Args, Debug, Default, Clone)]
pub struct ItemFields {
    /// Vintage year (e.g. 2015 or NV)
    #[arg(long)]
    pub vintage: Option<String>,
    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,
    /// Rating from 0 to 5
    #[arg(long)]
    pub rating: Option<f32>,
    /// Photo file to copy into the store
    #[arg(long)]
    pub photo: Option<String>,
    /// Wine colour (red, white, rose, sparkling, sweet)
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<WineKind>,
    /// Country of origin
    #[arg(long)]
    pub country: Option<String>,
    /// Region of origin
    #[arg(long)]
    pub region: Option<String>,
}

impl ItemFields {
    /// Overwrite the fields given on the command line
    fn apply_to(self, patch: &mut ItemPatch) {
        if let Some(vintage) = self.vintage {
            patch.vintage = Some(vintage);
        }
        if let Some(note) = self.note {
            patch.note = Some(note);
        }
        if let Some(rating) = self.rating {
            patch.rating = Some(rating);
        }
        if let Some(photo) = self.photo {
            patch.photo_reference = Some(photo);
        }
        if let Some(kind) = self.kind {
            patch.kind = kind;
        }
        if let Some(country) = self.country {
            patch.country = Some(country);
        }
        if let Some(region) = self.region {
            patch.region = Some(region);
        }
    }
}

fn parse_kind(s: &str) -> Result<WineKind, String> {
    WineKind::parse(s).ok_or_else(|| {
        let valid: Vec<String> = WineKind::ALL.iter().map(|k| k.to_string()).collect();
        format!("unknown kind '{}', expected one of: {}", s, valid.join(", "))
    })
}

/// Place a new item, replacing any occupant of the cell
pub fn add(
    store: &mut Store,
    name: String,
    row: i32,
    col: i32,
    fields: ItemFields,
    output: &Output,
) -> Result<()> {
    let mut item = Item::new(name, row, col);
    let mut patch = item.patch();
    fields.apply_to(&mut patch);
    item.apply(patch);

    let occupant = store.item_at(row, col).map(|item| item.name.clone());
    if !store.add_item(item) {
        output.rejected(&format!("({}, {}) is not a usable compartment", row, col));
        return Ok(());
    }

    match occupant {
        Some(previous) => output.success(&format!("Replaced {} at ({}, {})", previous, row, col)),
        None => output.success(&format!("Added item at ({}, {})", row, col)),
    }
    if let Some(item) = store.item_at(row, col) {
        output.print_item(item);
    }
    Ok(())
}

/// List items, optionally filtered by a search query
pub fn list(store: &Store, query: Option<String>, output: &Output) -> Result<()> {
    let items: Vec<&Item> = match query {
        Some(ref q) => store.search_items(q),
        None => store.items().iter().collect(),
    };
    output.print_items(&items);
    Ok(())
}

/// Show a single item
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(&id, store)?;
    let item = store
        .item(uuid)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;
    output.print_item(item);
    Ok(())
}

/// Edit the descriptive fields of an item
pub fn edit(
    store: &mut Store,
    id: String,
    name: Option<String>,
    fields: ItemFields,
    clear_rating: bool,
    output: &Output,
) -> Result<()> {
    let uuid = parse_item_id(&id, store)?;
    let mut patch = store
        .item(uuid)
        .map(Item::patch)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    if let Some(name) = name {
        patch.name = name;
    }
    fields.apply_to(&mut patch);
    if clear_rating {
        patch.rating = None;
    }

    if store.update_item(uuid, patch) {
        output.success("Item updated");
        if let Some(item) = store.item(uuid) {
            output.print_item(item);
        }
    } else {
        output.rejected("Item not updated");
    }
    Ok(())
}

/// Delete an item
pub fn delete(store: &mut Store, id: String, force: bool, output: &Output) -> Result<()> {
    let uuid = parse_item_id(&id, store)?;
    let Some(item) = store.item(uuid) else {
        bail!("Item not found: {}", id);
    };

    if !force && output.should_prompt() {
        println!("Delete item: {} - {}", &item.id.to_string()[..8], item.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = store.delete_item(uuid);
    output.outcome(deleted, &format!("Deleted item: {}", uuid), "Item not deleted");
    Ok(())
}

/// Move an item, swapping with the occupant of the target cell
pub fn relocate(store: &mut Store, id: String, row: i32, col: i32, output: &Output) -> Result<()> {
    let uuid = parse_item_id(&id, store)?;
    let swapped = store.item_at(row, col).map(|item| item.name.clone());

    let moved = store.move_item(uuid, row, col);
    let message = match swapped {
        Some(other) => format!("Moved item to ({}, {}), swapped with {}", row, col, other),
        None => format!("Moved item to ({}, {})", row, col),
    };
    output.outcome(
        moved,
        &message,
        "Item not moved: target is not a usable compartment or is the current one",
    );
    Ok(())
}

/// Parse an item ID (supports full UUID or prefix)
fn parse_item_id(id: &str, store: &Store) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches: Vec<&Item> = store
        .items()
        .iter()
        .filter(|item| item.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No item found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple items match '{}':", id);
            for item in &matches {
                eprintln!("  {} - {}", item.id, item.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Ask for a yes/no confirmation; non-interactive stdin answers no
fn confirm(prompt: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
