//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use cellar_core::{grid, CellarConfig, CellarSummary, Item};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the cellar list, marking the active one
    pub fn print_summaries(&self, summaries: &[CellarSummary], active: usize) {
        match self.format {
            OutputFormat::Human => {
                for (index, summary) in summaries.iter().enumerate() {
                    let marker = if index == active { "*" } else { " " };
                    println!(
                        "{} {:>2} | {} | {} item(s)",
                        marker,
                        index,
                        truncate(&summary.name, 40),
                        summary.item_count
                    );
                }
                println!("\n{} cellar(s)", summaries.len());
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({
                    "active": active,
                    "cellars": summaries,
                }));
            }
            OutputFormat::Quiet => {
                for summary in summaries {
                    println!("{}", summary.name);
                }
            }
        }
    }

    /// Print the active grid with its occupancy
    pub fn print_grid(&self, config: &CellarConfig, items: &[Item], orphans: &[&Item]) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "{} ({} x {}, {} usable)",
                    config.name,
                    config.rows,
                    config.cols,
                    grid::capacity(config)
                );
                for line in render_grid(config, items) {
                    println!("{}", line);
                }
                if !orphans.is_empty() {
                    println!();
                    println!("── Unplaced ({}) ──", orphans.len());
                    for item in orphans {
                        println!("{} | {}", short_id(item.id), item.name);
                    }
                }
            }
            OutputFormat::Json => {
                let orphan_ids: Vec<Uuid> = orphans.iter().map(|item| item.id).collect();
                print_json(&serde_json::json!({
                    "config": config,
                    "capacity": grid::capacity(config),
                    "usableCells": grid::usable_cells(config),
                    "items": items,
                    "orphans": orphan_ids,
                }));
            }
            OutputFormat::Quiet => {
                println!("{}x{}", config.rows, config.cols);
            }
        }
    }

    /// Print a single item
    pub fn print_item(&self, item: &Item) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", item.id);
                println!("Name:     {}", item.name);
                println!("Kind:     {}", item.kind);
                println!("Position: row {}, col {}", item.row, item.col);
                if let Some(ref vintage) = item.vintage {
                    println!("Vintage:  {}", vintage);
                }
                if let Some(rating) = item.rating {
                    println!("Rating:   {:.1}", rating);
                }
                let origin: Vec<&str> = [item.region.as_deref(), item.country.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect();
                if !origin.is_empty() {
                    println!("Origin:   {}", origin.join(", "));
                }
                if let Some(ref photo) = item.photo_reference {
                    println!("Photo:    {}", photo);
                }
                println!("Created:  {}", item.created_at.format("%Y-%m-%d %H:%M"));
                if let Some(ref note) = item.note {
                    println!();
                    println!("{}", note);
                }
            }
            OutputFormat::Json => print_json(item),
            OutputFormat::Quiet => println!("{}", item.id),
        }
    }

    /// Print a list of items
    pub fn print_items(&self, items: &[&Item]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for item in items {
                    println!(
                        "{} | {:>2},{:<2} | {} | {}",
                        short_id(item.id),
                        item.row,
                        item.col,
                        truncate(&item.name, 35),
                        item.vintage.as_deref().unwrap_or("-")
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => print_json(&items),
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a notice for a command the engine declined
    pub fn rejected(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("✗ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "rejected", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Report the outcome of an engine command
    pub fn outcome(&self, applied: bool, success: &str, rejected: &str) {
        if applied {
            self.success(success);
        } else {
            self.rejected(rejected);
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON: {}", e),
    }
}

/// Render the grid as text, one line per row plus a column header
///
/// `[ ]` is a free compartment, `[*]` an occupied one, blanks are disabled.
fn render_grid(config: &CellarConfig, items: &[Item]) -> Vec<String> {
    let occupied: HashSet<(i32, i32)> = items.iter().map(Item::position).collect();

    let mut lines = Vec::with_capacity(config.rows.max(0) as usize + 1);
    let header: String = (0..config.cols).map(|c| format!("{:^3}", c % 100)).collect();
    lines.push(format!("    {}", header));

    for r in 0..config.rows {
        let cells: String = (0..config.cols)
            .map(|c| {
                if !grid::is_usable(config, r, c) {
                    "   "
                } else if occupied.contains(&(r, c)) {
                    "[*]"
                } else {
                    "[ ]"
                }
            })
            .collect();
        lines.push(format!("{:>3} {}", r, cells.trim_end()));
    }
    lines
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
