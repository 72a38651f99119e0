//! Cellar Core Library
//!
//! This crate provides the core functionality for Cellar, a configuration
//! and placement engine for grid-shaped storage units (wine cellars, racks)
//! holding items at (row, column) positions.
//!
//! # Architecture
//!
//! - **Registry**: ordered list of cellars, one of them active
//! - **Migration**: relocates items whenever a cellar's shape changes
//! - **JSON store file**: best-effort mirror of the registry on disk
//!
//! All queries are served from the in-memory registry.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Place a bottle
//! let mut item = Item::new("Chinon", 0, 1);
//! item.set_vintage(Some("2019".to_string()));
//! store.add_item(item);
//!
//! // Shrink the rack, items move along
//! store.set_dimensions(3, 3);
//! let items = store.items();
//! ```
//!
//! # Modules
//!
//! - `store`: Command/query facade (main entry point)
//! - `models`: Data structures for cellars and items
//! - `grid`: Usable-cell geometry
//! - `migration`: Item relocation after a shape change
//! - `placement`: Item commands on one cellar
//! - `registry`: Multi-cellar registry and active-cellar commands
//! - `photos`: Managed photo copies
//! - `storage`: JSON persistence
//! - `config`: Application configuration

pub mod config;
pub mod grid;
pub mod migration;
pub mod models;
pub mod photos;
pub mod placement;
pub mod registry;
pub mod storage;
pub mod store;

pub use config::Config;
pub use migration::Migration;
pub use models::{Cell, Cellar, CellarConfig, CellarSummary, Item, ItemPatch, WineKind};
pub use photos::{ManagedPhotoDir, PhotoStore, UnmanagedPhotos};
pub use placement::Placed;
pub use registry::CellarRegistry;
pub use storage::{JsonPersistence, StorageError};
pub use store::{Snapshot, Store};
