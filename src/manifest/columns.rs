//! Column resolver - find the header row and map labels to column indices

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::reader::RawTable;
use super::ManifestError;

/// The ten delivery attributes every manifest row carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    Code,
    Client,
    Service,
    Recipient,
    Phone,
    Address,
    Reference,
    PackageCount,
    EstimatedVisitTime,
    Status,
}

impl CanonicalField {
    /// All fields, in the column order of a standard export
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Code,
        CanonicalField::Client,
        CanonicalField::Service,
        CanonicalField::Recipient,
        CanonicalField::Phone,
        CanonicalField::Address,
        CanonicalField::Reference,
        CanonicalField::PackageCount,
        CanonicalField::EstimatedVisitTime,
        CanonicalField::Status,
    ];

    /// Header label used by the manifest export
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::Code => "Codigo",
            CanonicalField::Client => "Cliente",
            CanonicalField::Service => "Servicio",
            CanonicalField::Recipient => "Destinatario",
            CanonicalField::Phone => "Telefono",
            CanonicalField::Address => "Direccion",
            CanonicalField::Reference => "Referencia",
            CanonicalField::PackageCount => "Bultos",
            CanonicalField::EstimatedVisitTime => "VisitaEstimada",
            CanonicalField::Status => "Estado",
        }
    }

    /// Column of this field in a standard export
    pub fn default_index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the header row is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// First row holding both `Codigo` and `Cliente`; all ten labels required
    #[default]
    Strict,
    /// First row starting with exactly `Codigo`, else row 0; never fails
    Sentinel,
}

/// Canonical field → zero-based column index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    indices: HashMap<CanonicalField, usize>,
}

impl HeaderMap {
    /// Positional map of a standard export
    pub fn positional() -> Self {
        CanonicalField::ALL
            .iter()
            .map(|f| (*f, f.default_index()))
            .collect()
    }

    pub fn insert(&mut self, field: CanonicalField, index: usize) {
        self.indices.insert(field, index);
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl FromIterator<(CanonicalField, usize)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (CanonicalField, usize)>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

/// Header row location plus its column map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    pub row_index: usize,
    pub map: HeaderMap,
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Normalized label → first column where it appears
fn label_positions(row: &[String]) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (index, cell) in row.iter().enumerate() {
        positions.entry(normalize_label(cell)).or_insert(index);
    }
    positions
}

/// Locate the header row and build the [`HeaderMap`]
pub fn resolve(
    table: &RawTable,
    strategy: HeaderStrategy,
) -> Result<ResolvedHeader, ManifestError> {
    match strategy {
        HeaderStrategy::Strict => resolve_strict(table),
        HeaderStrategy::Sentinel => Ok(resolve_sentinel(table)),
    }
}

fn resolve_strict(table: &RawTable) -> Result<ResolvedHeader, ManifestError> {
    let code = normalize_label(CanonicalField::Code.label());
    let client = normalize_label(CanonicalField::Client.label());

    let (row_index, positions) = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i, label_positions(row)))
        .find(|(_, positions)| positions.contains_key(&code) && positions.contains_key(&client))
        .ok_or(ManifestError::HeaderNotFound)?;

    let mut map = HeaderMap::default();
    let mut missing = Vec::new();
    for field in CanonicalField::ALL {
        match positions.get(&normalize_label(field.label())) {
            Some(&index) => map.insert(field, index),
            None => missing.push(field.label().to_string()),
        }
    }

    if !missing.is_empty() {
        warn!(header_row = row_index, missing = ?missing, "Manifest header is missing columns");
        return Err(ManifestError::MissingColumns(missing));
    }

    debug!(header_row = row_index, "Header resolved (strict)");
    Ok(ResolvedHeader { row_index, map })
}

fn resolve_sentinel(table: &RawTable) -> ResolvedHeader {
    let sentinel = CanonicalField::Code.label();
    let row_index = table
        .rows
        .iter()
        .position(|row| row.first().map(String::as_str) == Some(sentinel))
        .unwrap_or(0);

    let positions = table
        .rows
        .get(row_index)
        .map(|row| label_positions(row))
        .unwrap_or_default();

    let map = CanonicalField::ALL
        .iter()
        .map(|field| {
            let index = positions
                .get(&normalize_label(field.label()))
                .copied()
                .unwrap_or_else(|| field.default_index());
            (*field, index)
        })
        .collect();

    debug!(header_row = row_index, "Header resolved (sentinel)");
    ResolvedHeader { row_index, map }
}
