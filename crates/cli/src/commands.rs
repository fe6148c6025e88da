//! Command handlers: load the inventory, run one core operation, report.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use spantry_core::{DomainError, Entity, ItemId};
use spantry_inventory::{
    Category, ExpirationView, Item, Location, find_expired, find_expiring_within,
};

use crate::cli::{AddArgs, ExpiredArgs, ExpiringArgs, ItemCommand, ListArgs, RemoveArgs, UpdateArgs};
use crate::storage;

/// Run one `item` subcommand against the inventory file.
///
/// `today` is only consulted by expiration queries that were not given an
/// explicit `--today`.
pub fn run(
    command: ItemCommand,
    data_file: &Path,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ItemCommand::Add(args) => add(args, data_file, out),
        ItemCommand::List(args) => list(args, data_file, out),
        ItemCommand::Update(args) => update(args, data_file, out),
        ItemCommand::Remove(args) => remove(args, data_file, out),
        ItemCommand::Expiring(args) => expiring(args, data_file, today, out),
        ItemCommand::Expired(args) => expired(args, data_file, today, out),
    }
}

fn add(args: AddArgs, data_file: &Path, out: &mut impl Write) -> Result<()> {
    let store = storage::load(data_file)?;

    let mut draft = Item::draft(args.name, args.quantity);
    draft.unit = args.unit;
    draft.category = args.category;
    draft.location = args.location;
    draft.expiration_date = args.expires;

    let item = store.add(draft).map_err(report)?;
    storage::save(data_file, &store)?;

    tracing::info!(id = %item.id(), name = item.name(), "item added");
    writeln!(out, "Successfully added item:")?;
    write_details(out, &item)?;
    Ok(())
}

fn list(args: ListArgs, data_file: &Path, out: &mut impl Write) -> Result<()> {
    let location = args
        .location
        .as_deref()
        .map(str::parse::<Location>)
        .transpose()?;
    let category = args
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;

    let store = storage::load(data_file)?;
    let mut items = store.snapshot_where(|item| {
        location.is_none_or(|l| item.location() == Some(l))
            && category.is_none_or(|c| item.category() == Some(c))
    })?;
    items.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));

    tracing::info!(count = items.len(), ?location, ?category, "listing items");
    if items.is_empty() {
        writeln!(out, "No items found in inventory.")?;
    }
    for item in &items {
        write_row(out, item)?;
    }
    Ok(())
}

fn update(args: UpdateArgs, data_file: &Path, out: &mut impl Write) -> Result<()> {
    let id = parse_id(&args.id)?;
    let store = storage::load(data_file)?;
    let existing = store.get(id).map_err(report)?;

    let mut draft = existing.to_draft();
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(quantity) = args.quantity {
        draft.quantity = quantity;
    }
    if args.unit.is_some() {
        draft.unit = args.unit;
    }
    if args.clear_category {
        draft.category = None;
    } else if args.category.is_some() {
        draft.category = args.category;
    }
    if args.clear_location {
        draft.location = None;
    } else if args.location.is_some() {
        draft.location = args.location;
    }
    if args.clear_expires {
        draft.expiration_date = None;
    } else if args.expires.is_some() {
        draft.expiration_date = args.expires;
    }

    let item = store.update(id, draft).map_err(report)?;
    storage::save(data_file, &store)?;

    tracing::info!(id = %item.id(), revision = item.revision(), "item updated");
    writeln!(out, "Successfully updated item:")?;
    write_details(out, &item)?;
    Ok(())
}

fn remove(args: RemoveArgs, data_file: &Path, out: &mut impl Write) -> Result<()> {
    let id = parse_id(&args.id)?;
    let store = storage::load(data_file)?;
    let item = store.remove(id).map_err(report)?;
    storage::save(data_file, &store)?;

    tracing::info!(id = %item.id(), name = item.name(), "item removed");
    writeln!(out, "Successfully removed item with ID: {}", item.id())?;
    Ok(())
}

fn expiring(
    args: ExpiringArgs,
    data_file: &Path,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let now = args.today.unwrap_or(today);
    let store = storage::load(data_file)?;
    let view = find_expiring_within(&store, args.days, now)?;

    tracing::info!(%now, days = args.days, "listing expiring items");
    write_view(out, &view, &format!("No items expire within {} days.", args.days))
}

fn expired(args: ExpiredArgs, data_file: &Path, today: NaiveDate, out: &mut impl Write) -> Result<()> {
    let now = args.today.unwrap_or(today);
    let store = storage::load(data_file)?;
    let view = find_expired(&store, now)?;

    tracing::info!(%now, "listing expired items");
    write_view(out, &view, "No expired items.")
}

fn parse_id(raw: &str) -> Result<ItemId> {
    raw.parse::<ItemId>()
        .with_context(|| format!("'{raw}' is not a valid item ID"))
}

/// Log a domain failure with its structure before handing it upward.
fn report(err: DomainError) -> anyhow::Error {
    match &err {
        DomainError::Validation(violations) => {
            for v in violations {
                tracing::warn!(field = v.field, rule = v.rule, "{}", v.message);
            }
        }
        DomainError::InvariantViolation(msg) => tracing::error!(%msg, "inventory is inconsistent"),
        other => tracing::warn!(error = %other, "request rejected"),
    }
    err.into()
}

fn write_view(out: &mut impl Write, view: &ExpirationView, empty: &str) -> Result<()> {
    if view.is_empty() {
        writeln!(out, "{empty}")?;
    }
    for item in view {
        write_row(out, item)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, item: &Item) -> Result<()> {
    writeln!(
        out,
        "ID: {}, Name: {}, Qty: {} {}, Cat: {}, Loc: {}, Exp: {}",
        item.id(),
        item.name(),
        item.quantity(),
        item.unit(),
        or_na(item.category()),
        or_na(item.location()),
        or_na(item.expiration_date()),
    )?;
    Ok(())
}

fn write_details(out: &mut impl Write, item: &Item) -> Result<()> {
    writeln!(out, "  ID: {}", item.id())?;
    writeln!(out, "  Name: {}", item.name())?;
    writeln!(out, "  Quantity: {} {}", item.quantity(), item.unit())?;
    if let Some(category) = item.category() {
        writeln!(out, "  Category: {category}")?;
    }
    if let Some(location) = item.location() {
        writeln!(out, "  Location: {location}")?;
    }
    if let Some(date) = item.expiration_date() {
        writeln!(out, "  Expires: {date}")?;
    }
    Ok(())
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
