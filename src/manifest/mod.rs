//! Delivery manifest ingestion
//!
//! Turns the raw bytes of a courier manifest export into [`DeliveryRow`]s:
//! - `reader`: bytes → [`RawTable`] (delimiter sniffing, BOM, ragged rows)
//! - `columns`: locate the header row and map labels to column indices
//! - `row`: build one canonical row per data line
//!
//! # Example
//! ```ignore
//! use delivery_notify::manifest::{load_manifest, LoadOptions};
//!
//! let rows = load_manifest(&bytes, &LoadOptions::new(2))?;
//! ```

pub mod columns;
pub mod reader;
pub mod row;

pub use columns::{resolve, CanonicalField, HeaderMap, HeaderStrategy, ResolvedHeader};
pub use reader::{read_table, RawTable};
pub use row::{normalize, DeliveryRow};

use tracing::info;

/// Manifest loading failures
///
/// Every variant is scoped to a single load attempt; the caller shows the
/// reason and lets the user pick another file.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No row looks like the manifest header
    #[error("header row not found (expected a row with Codigo and Cliente)")]
    HeaderNotFound,
    /// Header row found but some required labels are absent
    #[error("missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// The bytes could not be split into records
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Batch-level parameters for one manifest load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Delivery window in hours, copied onto every row
    pub window_hours: u32,
    pub strategy: HeaderStrategy,
}

impl LoadOptions {
    pub fn new(window_hours: u32) -> Self {
        Self {
            window_hours,
            strategy: HeaderStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: HeaderStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Read, resolve and normalize a manifest in one step
///
/// Either every row is produced or the whole load fails; there is no partial
/// result. An empty manifest (header only) yields `Ok(vec![])`.
pub fn load_manifest(
    bytes: &[u8],
    options: &LoadOptions,
) -> Result<Vec<DeliveryRow>, ManifestError> {
    let table = read_table(bytes)?;
    let header = resolve(&table, options.strategy)?;
    let rows = normalize(&table, header.row_index, &header.map, options.window_hours);

    info!(
        header_row = header.row_index,
        rows = rows.len(),
        window_hours = options.window_hours,
        strategy = ?options.strategy,
        "Manifest loaded"
    );

    Ok(rows)
}
