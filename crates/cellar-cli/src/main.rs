//! Cellar CLI
//!
//! Command-line interface for Cellar - cellar layouts and bottle placement.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cellar_core::{Config, Store};

mod commands;
mod output;

use commands::item::ItemFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "cellar")]
#[command(about = "Cellar - Grid layouts and bottle placement for wine cellars")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides default and CELLAR_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Index of the cellar to act on (defaults to the first one)
    #[arg(long, global = true)]
    cellar: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all cellars
    #[command(alias = "ls")]
    List,
    /// Manage cellars
    Cellar {
        #[command(subcommand)]
        command: CellarCommands,
    },
    /// Show or change the grid of the selected cellar
    Grid {
        #[command(subcommand)]
        command: Option<GridCommands>,
    },
    /// Manage items in the selected cellar
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum CellarCommands {
    /// Add a cellar
    Add {
        /// Cellar name (defaults to "Cellar N")
        #[arg(short, long)]
        name: Option<String>,
        /// Number of rows
        #[arg(long)]
        rows: Option<i32>,
        /// Number of columns
        #[arg(long)]
        cols: Option<i32>,
    },
    /// Delete a cellar
    #[command(alias = "delete")]
    Rm {
        /// Cellar index
        index: usize,
    },
    /// Rename a cellar
    Rename {
        /// Cellar index
        index: usize,
        /// New name
        name: String,
    },
    /// Move a cellar to another position
    Move {
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },
}

#[derive(Subcommand)]
enum GridCommands {
    /// Show the grid and its occupancy
    Show,
    /// Change the number of rows and columns
    Resize {
        /// Number of rows
        rows: i32,
        /// Number of columns
        cols: i32,
    },
    /// Rename the selected cellar
    Rename {
        /// New name
        name: String,
    },
    /// Enable a compartment
    Enable {
        /// Row
        row: i32,
        /// Column
        col: i32,
    },
    /// Disable a compartment
    Disable {
        /// Row
        row: i32,
        /// Column
        col: i32,
    },
    /// Enable one more compartment, growing the grid if needed
    AddCompartment,
    /// Move an empty compartment to a disabled cell
    MoveCompartment {
        /// Source row
        src_row: i32,
        /// Source column
        src_col: i32,
        /// Target row
        dst_row: i32,
        /// Target column
        dst_col: i32,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Place a new item
    #[command(alias = "create")]
    Add {
        /// Item name
        name: String,
        /// Row
        #[arg(long)]
        row: i32,
        /// Column
        #[arg(long)]
        col: i32,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// List items
    #[command(alias = "ls")]
    List {
        /// Only items matching this text
        #[arg(short = 'Q', long)]
        query: Option<String>,
    },
    /// Show item details
    Show {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Edit an item
    Edit {
        /// Item ID (full UUID or prefix)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ItemFields,
        /// Remove the rating
        #[arg(long, conflicts_with = "rating")]
        no_rating: bool,
    },
    /// Delete an item
    #[command(alias = "delete")]
    Rm {
        /// Item ID (full UUID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Move an item, swapping with any occupant
    Move {
        /// Item ID (full UUID or prefix)
        id: String,
        /// Target row
        row: i32,
        /// Target column
        col: i32,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = Store::open_with_config(&config);

    if let Some(index) = cli.cellar {
        let count = store.summaries().len();
        if index >= count {
            bail!("No cellar at index {} ({} cellar(s))", index, count);
        }
        store.set_active_cellar(index);
        debug!(index, "Selected cellar");
    }

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => commands::cellar::list(&store, &output),
        Commands::Cellar { command } => handle_cellar_command(command, &mut store, &output),
        Commands::Grid { command } => handle_grid_command(command, &mut store, &output),
        Commands::Item { command } => handle_item_command(command, &mut store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_cellar_command(
    command: CellarCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        CellarCommands::Add { name, rows, cols } => {
            commands::cellar::add(store, name, rows, cols, output)
        }
        CellarCommands::Rm { index } => commands::cellar::delete(store, index, output),
        CellarCommands::Rename { index, name } => {
            commands::cellar::rename(store, index, name, output)
        }
        CellarCommands::Move { from, to } => commands::cellar::reorder(store, from, to, output),
    }
}

fn handle_grid_command(
    command: Option<GridCommands>,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(GridCommands::Show) | None => commands::grid::show(store, output),
        Some(GridCommands::Resize { rows, cols }) => {
            commands::grid::resize(store, rows, cols, output)
        }
        Some(GridCommands::Rename { name }) => commands::grid::rename(store, name, output),
        Some(GridCommands::Enable { row, col }) => {
            commands::grid::toggle(store, row, col, true, output)
        }
        Some(GridCommands::Disable { row, col }) => {
            commands::grid::toggle(store, row, col, false, output)
        }
        Some(GridCommands::AddCompartment) => commands::grid::add_compartment(store, output),
        Some(GridCommands::MoveCompartment {
            src_row,
            src_col,
            dst_row,
            dst_col,
        }) => commands::grid::move_compartment(
            store,
            (src_row, src_col),
            (dst_row, dst_col),
            output,
        ),
    }
}

fn handle_item_command(command: ItemCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        ItemCommands::Add {
            name,
            row,
            col,
            fields,
        } => commands::item::add(store, name, row, col, fields, output),
        ItemCommands::List { query } => commands::item::list(store, query, output),
        ItemCommands::Show { id } => commands::item::show(store, id, output),
        ItemCommands::Edit {
            id,
            name,
            fields,
            no_rating,
        } => commands::item::edit(store, id, name, fields, no_rating, output),
        ItemCommands::Rm { id, force } => commands::item::delete(store, id, force, output),
        ItemCommands::Move { id, row, col } => {
            commands::item::relocate(store, id, row, col, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Logs go to `config.log_file` when set (appending, no ANSI), else stderr.
fn init_logging(config: &Config) {
    let level = &config.log_level;
    let env_filter = EnvFilter::new(format!("cellar_core={},cellar_cli={}", level, level));

    let Some(log_path) = &config.log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    debug!("Logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_item_add() {
        let cli = Cli::try_parse_from([
            "cellar", "--cellar", "1", "item", "add", "Barolo", "--row", "2", "--col", "3",
            "--kind", "red", "--rating", "4.5",
        ])
        .unwrap();

        assert_eq!(cli.cellar, Some(1));
        match cli.command {
            Some(Commands::Item {
                command:
                    ItemCommands::Add {
                        name,
                        row,
                        col,
                        fields,
                    },
            }) => {
                assert_eq!(name, "Barolo");
                assert_eq!((row, col), (2, 3));
                assert_eq!(fields.rating, Some(4.5));
            }
            _ => panic!("expected item add"),
        }
    }

    #[test]
    fn test_parse_move_compartment() {
        let cli = Cli::try_parse_from([
            "cellar",
            "grid",
            "move-compartment",
            "0",
            "1",
            "2",
            "3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Grid {
                command: Some(GridCommands::MoveCompartment {
                    src_row: 0,
                    src_col: 1,
                    dst_row: 2,
                    dst_col: 3
                })
            })
        ));
    }

    #[test]
    fn test_no_rating_conflicts_with_rating() {
        let result = Cli::try_parse_from([
            "cellar", "item", "edit", "abc", "--rating", "3", "--no-rating",
        ]);
        assert!(result.is_err());
    }
}
