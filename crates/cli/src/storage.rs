//! JSON snapshot file backing the CLI between invocations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use spantry_core::Entity;
use spantry_inventory::{InventoryStore, Item};

pub const DEFAULT_DATA_FILE: &str = "spantry-inventory.json";

/// Snapshot layout version written by this build.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    items: Vec<Item>,
}

/// Load the store from `path`; a missing file is an empty inventory.
pub fn load(path: &Path) -> Result<InventoryStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "inventory file not found, starting empty");
        return Ok(InventoryStore::new());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read inventory file {}", path.display()))?;
    let snapshot: SnapshotFile = serde_json::from_str(&raw)
        .with_context(|| format!("inventory file {} is corrupted", path.display()))?;
    if snapshot.version != FORMAT_VERSION {
        bail!(
            "inventory file {} has unsupported version {} (expected {FORMAT_VERSION})",
            path.display(),
            snapshot.version
        );
    }

    let count = snapshot.items.len();
    let store = InventoryStore::restore(snapshot.items)
        .with_context(|| format!("inventory file {} holds invalid items", path.display()))?;
    tracing::debug!(path = %path.display(), items = count, "inventory loaded");
    Ok(store)
}

/// Write the store to `path` via a sibling temp file and rename.
pub fn save(path: &Path, store: &InventoryStore) -> Result<()> {
    let mut items = store.list()?;
    items.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
    let snapshot = SnapshotFile {
        version: FORMAT_VERSION,
        items,
    };
    let json = serde_json::to_string_pretty(&snapshot)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace inventory file {}", path.display()))?;

    tracing::debug!(path = %path.display(), items = snapshot.items.len(), "inventory saved");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
