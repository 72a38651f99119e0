//! CLI command handlers

pub mod cellar;
pub mod config;
pub mod grid;
pub mod item;
