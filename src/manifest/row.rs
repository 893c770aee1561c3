//! Row normalizer - one canonical [`DeliveryRow`] per manifest data line

use serde::{Deserialize, Serialize};

use super::columns::{CanonicalField, HeaderMap};
use super::reader::RawTable;

/// One delivery, independent of the column layout it was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRow {
    pub code: String,
    pub client: String,
    pub service: String,
    pub recipient: String,
    pub phone: String,
    pub address: String,
    pub reference: String,
    pub package_count: String,
    /// Free-form, usually `HH:MM`
    pub estimated_visit_time: String,
    pub status: String,
    /// Batch window, repeated on every row
    pub delivery_window_hours: u32,
}

impl DeliveryRow {
    /// Value of a canonical field
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Code => &self.code,
            CanonicalField::Client => &self.client,
            CanonicalField::Service => &self.service,
            CanonicalField::Recipient => &self.recipient,
            CanonicalField::Phone => &self.phone,
            CanonicalField::Address => &self.address,
            CanonicalField::Reference => &self.reference,
            CanonicalField::PackageCount => &self.package_count,
            CanonicalField::EstimatedVisitTime => &self.estimated_visit_time,
            CanonicalField::Status => &self.status,
        }
    }
}

/// Build rows from every line after the header
///
/// Short rows never fail: a cell beyond the end of the row, or a field the
/// map does not know, reads as the empty string.
pub fn normalize(
    table: &RawTable,
    header_row_index: usize,
    header_map: &HeaderMap,
    window_hours: u32,
) -> Vec<DeliveryRow> {
    let first_data_row = header_row_index.saturating_add(1);

    (first_data_row..table.len())
        .map(|row| {
            let cell = |field: CanonicalField| {
                header_map
                    .get(field)
                    .map(|col| table.cell(row, col).to_string())
                    .unwrap_or_default()
            };

            DeliveryRow {
                code: cell(CanonicalField::Code),
                client: cell(CanonicalField::Client),
                service: cell(CanonicalField::Service),
                recipient: cell(CanonicalField::Recipient),
                phone: cell(CanonicalField::Phone),
                address: cell(CanonicalField::Address),
                reference: cell(CanonicalField::Reference),
                package_count: cell(CanonicalField::PackageCount),
                estimated_visit_time: cell(CanonicalField::EstimatedVisitTime),
                status: cell(CanonicalField::Status),
                delivery_window_hours: window_hours,
            }
        })
        .collect()
}
