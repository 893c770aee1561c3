//! Raw manifest reader - bytes to a grid of string cells

use std::borrow::Cow;

use csv::ReaderBuilder;
use tracing::debug;

/// Lines inspected when guessing the delimiter
const SNIFF_LINES: usize = 5;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rows of cells exactly as they appear in the file
///
/// Rows are not required to have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Cell at (row, col), empty when the row is shorter
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for RawTable {
    fn from_iter<I: IntoIterator<Item = Vec<S>>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// Parse manifest bytes into a [`RawTable`]
///
/// Accepts `;` or `,` as delimiter (whichever dominates the first lines),
/// strips a UTF-8 BOM and falls back to Latin-1 for exports that are not
/// valid UTF-8. Blank lines are skipped.
pub fn read_table(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = decode(bytes);
    let delimiter = sniff_delimiter(&text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) && record.len() <= 1 {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(
        rows = rows.len(),
        delimiter = %(delimiter as char),
        "Manifest table read"
    );

    Ok(RawTable::new(rows))
}

/// UTF-8 when valid, otherwise each byte is taken as a Latin-1 code point
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Pick `;` unless commas clearly dominate the first non-empty lines
fn sniff_delimiter(text: &str) -> u8 {
    let (semicolons, commas) = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .fold((0usize, 0usize), |(s, c), line| {
            (
                s + line.matches(';').count(),
                c + line.matches(',').count(),
            )
        });

    if commas > semicolons {
        b','
    } else {
        b';'
    }
}
