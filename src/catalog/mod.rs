//! Service catalog model.
//!
//! # Data Flow
//! ```text
//! registry snapshot (JSON)
//!     → snapshot.rs (read & deserialize CatalogEntry[])
//!     → item.rs (tags → labels, address fallback, enable directive)
//!     → RegistryItem[] (immutable input of one build pass)
//! ```
//!
//! # Design Decisions
//! - Entries are converted once per pass, never cached
//! - Only tags carrying the configured prefix become labels
//! - Labels are re-rooted under `traefik.` so the decoder sees one namespace

pub mod item;
pub mod snapshot;

pub use item::{CatalogEntry, ExtraConf, HealthStatus, RegistryItem};
pub use snapshot::{load_snapshot, parse_snapshot, parse_snapshot_items, SnapshotError};
