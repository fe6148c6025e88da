//! Argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use spantry_observability::LogFormat;

use crate::storage::DEFAULT_DATA_FILE;

/// Default look-ahead for `item expiring`, in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

#[derive(Debug, Parser)]
#[command(name = "spantry")]
#[command(version)]
#[command(about = "Manages your pantry inventory.", long_about = None)]
pub struct Cli {
    /// JSON file holding the inventory
    #[arg(long, global = true, env = "SPANTRY_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Log output format (json or pretty); filter with RUST_LOG
    #[arg(long, global = true, env = "SPANTRY_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage inventory items
    #[command(subcommand)]
    Item(ItemCommand),
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Add a new item to the inventory
    Add(AddArgs),
    /// List items, optionally filtered by location or category
    List(ListArgs),
    /// Replace fields of an existing item
    Update(UpdateArgs),
    /// Remove an item by its ID
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),
    /// List items expiring within a number of days
    Expiring(ExpiringArgs),
    /// List items that are already past their expiration date
    Expired(ExpiredArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name of the item
    #[arg(short, long)]
    pub name: String,

    /// Quantity of the item
    #[arg(short, long, allow_negative_numbers = true)]
    pub quantity: f64,

    /// Unit (count, grams, kilograms, milliliters, liters, ounces, pounds)
    #[arg(short, long)]
    pub unit: Option<String>,

    /// Category (e.g. produce, dairy, grains)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Storage location (e.g. pantry, fridge, freezer)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Expiration date (YYYY-MM-DD)
    #[arg(short, long = "expires")]
    pub expires: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only items stored at this location
    #[arg(short, long)]
    pub location: Option<String>,

    /// Only items in this category
    #[arg(short, long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// ID of the item to update
    pub id: String,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New quantity
    #[arg(short, long, allow_negative_numbers = true)]
    pub quantity: Option<f64>,

    /// New unit (count, grams, kilograms, milliliters, liters, ounces, pounds)
    #[arg(short, long)]
    pub unit: Option<String>,

    /// New category (e.g. produce, dairy, grains)
    #[arg(short, long, conflicts_with = "clear_category")]
    pub category: Option<String>,

    /// Remove the category
    #[arg(long)]
    pub clear_category: bool,

    /// New storage location (e.g. pantry, fridge, freezer)
    #[arg(short, long, conflicts_with = "clear_location")]
    pub location: Option<String>,

    /// Remove the location
    #[arg(long)]
    pub clear_location: bool,

    /// New expiration date (YYYY-MM-DD)
    #[arg(short, long = "expires", conflicts_with = "clear_expires")]
    pub expires: Option<String>,

    /// Mark the item as never expiring
    #[arg(long)]
    pub clear_expires: bool,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// ID of the item to remove
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ExpiringArgs {
    /// Look-ahead window in days
    #[arg(short, long, default_value_t = DEFAULT_HORIZON_DAYS)]
    pub days: u32,

    /// Date to treat as today (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ExpiredArgs {
    /// Date to treat as today (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    pub today: Option<NaiveDate>,
}
