//! Bulk product import from CSV.
//!
//! The first record is a header and is skipped. Every other record must hold
//! exactly five fields: `name, price, description, image_file, brand`.
//! A blank line counts as a record with no fields and is rejected too.
//! The whole file is parsed before anything is written, and the rows are
//! inserted in one transaction, so a bad row anywhere leaves the table as it
//! was.

use sqlx::SqlitePool;
use thiserror::Error;

use kitshop_core::{Price, PriceError};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::NewProduct;

/// Number of positional fields per data row.
pub const FIELDS_PER_ROW: usize = 5;

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The upload is not valid UTF-8.
    #[error("file is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// The CSV reader rejected a record.
    #[error("line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// A record has the wrong number of fields.
    #[error("line {line}: expected {FIELDS_PER_ROW} fields, found {found}")]
    ColumnCount { line: u64, found: usize },

    /// The price column is not a valid price.
    #[error("line {line}: {source}")]
    Price {
        line: u64,
        #[source]
        source: PriceError,
    },

    /// Writing the batch failed.
    #[error(transparent)]
    Database(#[from] RepositoryError),
}

/// Whether an uploaded filename looks like a CSV file.
#[must_use]
pub fn is_csv_filename(filename: &str) -> bool {
    filename.ends_with(".csv")
}

/// Parse a CSV upload into products without touching the database.
///
/// # Errors
///
/// Returns the first decode, syntax, column-count or price error found.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<NewProduct>, ImportError> {
    let text = std::str::from_utf8(bytes)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut products = Vec::new();
    let mut previous_start = None;
    for (index, record) in reader.records().enumerate() {
        let fallback_line = u64::try_from(index).unwrap_or(u64::MAX).saturating_add(1);
        let record = record.map_err(|source| ImportError::Csv {
            line: source
                .position()
                .map_or(fallback_line, csv::Position::line),
            source,
        })?;
        let line = record
            .position()
            .map_or(fallback_line, csv::Position::line);
        let start = record
            .position()
            .and_then(|p| usize::try_from(p.byte()).ok())
            .unwrap_or_default();

        // The reader drops empty lines, so look for them between records.
        let blank = match previous_start {
            None => leading_blank_line(text, start),
            Some(previous) => blank_line_between(text, previous, start),
        };
        if let Some(line) = blank {
            return Err(ImportError::ColumnCount { line, found: 0 });
        }
        previous_start = Some(start);

        if index == 0 {
            continue;
        }

        if record.len() != FIELDS_PER_ROW {
            return Err(ImportError::ColumnCount {
                line,
                found: record.len(),
            });
        }

        let price = Price::parse(&record[1]).map_err(|source| ImportError::Price { line, source })?;

        products.push(NewProduct::new(
            &record[0],
            price,
            Some(record[2].to_owned()),
            Some(record[3].to_owned()),
            Some(record[4].to_owned()),
        ));
    }

    let trailing_blank = match previous_start {
        Some(previous) => blank_line_between(text, previous, text.len()),
        // Only empty lines: the first one stands in for the header.
        None => (text.trim_matches(['\r', '\n']).is_empty() && text.matches('\n').count() > 1)
            .then_some(2),
    };
    if let Some(line) = trailing_blank {
        return Err(ImportError::ColumnCount { line, found: 0 });
    }

    Ok(products)
}

/// Line number of an empty line before the first record, if any.
fn leading_blank_line(text: &str, first_start: usize) -> Option<u64> {
    let lead = text.get(..first_start)?;
    (lead.contains('\n') && lead.trim_matches(['\r', '\n']).is_empty()).then_some(1)
}

/// Line number of the first empty line after the record starting at `from`
/// and before `to`.
///
/// A record can only end in more than one line terminator when empty lines
/// follow it: newlines inside a quoted field are followed by the closing quote.
fn blank_line_between(text: &str, from: usize, to: usize) -> Option<u64> {
    let chunk = text.get(from..to)?;
    let content_len = chunk.trim_end_matches(['\r', '\n']).len();
    let mut terminators = chunk.get(content_len..)?.match_indices('\n');

    let (first, _) = terminators.next()?;
    terminators.next()?;

    let blank_start = from + content_len + first + 1;
    let line = text.get(..blank_start)?.matches('\n').count() + 1;
    u64::try_from(line).ok()
}

/// Parse `bytes` and insert every row in a single transaction.
///
/// Returns the number of imported products.
///
/// # Errors
///
/// Returns an `ImportError` if parsing fails or the insert is rolled back.
pub async fn import_csv(pool: &SqlitePool, bytes: &[u8]) -> Result<usize, ImportError> {
    let products = parse_csv(bytes)?;
    let inserted = ProductRepository::new(pool).create_many(&products).await?;
    Ok(inserted)
}
