//! Registry snapshot loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::catalog::item::{CatalogEntry, RegistryItem};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a JSON array of catalog entries.
pub fn load_snapshot(path: &Path) -> Result<Vec<CatalogEntry>, SnapshotError> {
    let content = fs::read_to_string(path)?;
    parse_snapshot(&content)
}

pub fn parse_snapshot(content: &str) -> Result<Vec<CatalogEntry>, SnapshotError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a snapshot straight into build-pass items.
pub fn parse_snapshot_items(
    content: &str,
    prefix: &str,
    exposed_by_default: bool,
) -> Result<Vec<RegistryItem>, SnapshotError> {
    Ok(parse_snapshot(content)?
        .into_iter()
        .map(|entry| RegistryItem::from_entry(entry, prefix, exposed_by_default))
        .collect())
}
