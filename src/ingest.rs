//! CSV ingestion into the raw-table shape the normalizer consumes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::errors::IngestError;
use crate::ledger::{normalize_table, Ledger, RawTable};

/// Reads CSV into a raw table. Ragged rows are tolerated; the normalizer
/// decides what survives.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = reader.headers()?.iter().map(String::from).collect();
    let mut table = RawTable::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(String::from).collect());
    }
    Ok(table)
}

pub fn read_csv_path(path: &Path) -> Result<RawTable, IngestError> {
    read_csv(File::open(path)?)
}

/// Reads and normalizes a CSV file in one step.
pub fn load_csv_ledger(path: &Path, name: impl Into<String>) -> Result<Ledger, IngestError> {
    let table = read_csv_path(path)?;
    let ledger = normalize_table(&table, name)?;
    info!(
        rows = ledger.transaction_count(),
        dropped = ledger.dropped_rows,
        "loaded ledger from CSV"
    );
    Ok(ledger)
}
