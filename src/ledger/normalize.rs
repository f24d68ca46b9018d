//! Turns uploaded tabular data into a canonical [`Ledger`].
//!
//! Column names are matched case/diacritic-insensitively and may use either
//! the canonical English names or the Spanish names found in user files.
//! Rows whose date or amount fails to parse are dropped and counted; only a
//! table that yields zero rows is an error.

use chrono::NaiveDate;
use tracing::warn;

use crate::errors::ValidationError;
use crate::utils::fold_label;

use super::ledger::Ledger;
use super::transaction::{Transaction, TransactionKind};

const DATE_ALIASES: [&str; 2] = ["date", "fecha"];
const TYPE_ALIASES: [&str; 2] = ["type", "tipo"];
const AMOUNT_ALIASES: [&str; 2] = ["amount", "monto"];
const CATEGORY_ALIASES: [&str; 2] = ["category", "categoria"];
const DESCRIPTION_ALIASES: [&str; 3] = ["description", "descripcion", "concepto"];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A column-oriented view of uploaded data, before any validation. The CSV
/// reader produces one; hosts with other tabular sources can build their own.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Validates and coerces a raw table into a canonical ledger.
///
/// Fails with [`ValidationError::MissingColumns`] naming the absent required
/// columns, or [`ValidationError::NoValidRows`] when cleaning leaves nothing.
pub fn normalize_table(
    table: &RawTable,
    name: impl Into<String>,
) -> Result<Ledger, ValidationError> {
    let folded: Vec<String> = table.columns.iter().map(|c| fold_label(c)).collect();

    let date_col = find_column(&folded, &DATE_ALIASES);
    let type_col = find_column(&folded, &TYPE_ALIASES);
    let amount_col = find_column(&folded, &AMOUNT_ALIASES);
    let category_col = find_column(&folded, &CATEGORY_ALIASES);
    let description_col = find_column(&folded, &DESCRIPTION_ALIASES);

    let mut missing = Vec::new();
    if date_col.is_none() {
        missing.push("date".to_string());
    }
    if type_col.is_none() {
        missing.push("type".to_string());
    }
    if amount_col.is_none() {
        missing.push("amount".to_string());
    }
    let (Some(date_col), Some(type_col), Some(amount_col)) = (date_col, type_col, amount_col)
    else {
        return Err(ValidationError::MissingColumns(missing));
    };

    let mut ledger = Ledger::new(name);
    for row in &table.rows {
        let Some(date) = row.get(date_col).and_then(|cell| parse_date(cell)) else {
            continue;
        };
        let Some(amount) = row.get(amount_col).and_then(|cell| parse_amount(cell)) else {
            continue;
        };
        let kind = row
            .get(type_col)
            .map(|cell| TransactionKind::classify(cell))
            .unwrap_or(TransactionKind::Expense);

        let mut txn = Transaction::new(date, kind, amount);
        if let Some(col) = category_col {
            if let Some(cell) = row.get(col) {
                let label = fold_label(cell);
                if !label.is_empty() {
                    txn.category = Some(label);
                }
            }
        }
        if let Some(col) = description_col {
            if let Some(cell) = row.get(col) {
                txn.description = cell.trim().to_string();
            }
        }
        ledger.add_transaction(txn);
    }

    if ledger.is_empty() {
        return Err(ValidationError::NoValidRows);
    }

    ledger.dropped_rows = table.rows.len() - ledger.transaction_count();
    if ledger.dropped_rows > 0 {
        warn!(
            dropped = ledger.dropped_rows,
            kept = ledger.transaction_count(),
            "dropped rows with unparseable date or amount"
        );
    }
    Ok(ledger)
}

fn find_column(folded_columns: &[String], aliases: &[&str]) -> Option<usize> {
    folded_columns
        .iter()
        .position(|column| aliases.contains(&column.as_str()))
}

/// Parses a date cell, trying plain date formats first and datetime formats
/// (with the time part discarded) second.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(cell, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Parses an amount cell into a finite non-negative value. A single comma
/// with no dot is treated as a decimal separator.
pub fn parse_amount(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    let candidate = if cell.matches(',').count() == 1 && !cell.contains('.') {
        cell.replace(',', ".")
    } else {
        cell.to_string()
    };
    match candidate.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value.abs()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut table = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|cell| cell.to_string()).collect());
        }
        table
    }

    #[test]
    fn accepts_spanish_headers_with_diacritics() {
        let raw = table(
            &["Fecha", "Tipo", "Categoría", "Monto"],
            &[&["2024-01-15", "Ingreso", "Ventas", "1500"]],
        );
        let ledger = normalize_table(&raw, "upload").unwrap();
        assert_eq!(ledger.transaction_count(), 1);
        let txn = &ledger.transactions[0];
        assert_eq!(txn.kind, TransactionKind::Income);
        assert_eq!(txn.category.as_deref(), Some("ventas"));
        assert_eq!(txn.amount, 1500.0);
    }

    #[test]
    fn missing_required_columns_are_named() {
        let raw = table(&["fecha", "categoria"], &[&["2024-01-15", "ventas"]]);
        let err = normalize_table(&raw, "upload").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingColumns(vec!["type".into(), "amount".into()])
        );
    }

    #[test]
    fn unparseable_rows_are_dropped_and_counted() {
        let raw = table(
            &["date", "type", "amount"],
            &[
                &["2024-01-15", "income", "100"],
                &["not a date", "income", "100"],
                &["2024-02-15", "expense", "not a number"],
            ],
        );
        let ledger = normalize_table(&raw, "upload").unwrap();
        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(ledger.dropped_rows, 2);
    }

    #[test]
    fn all_rows_invalid_is_a_validation_error() {
        let raw = table(
            &["date", "type", "amount"],
            &[&["nope", "income", "100"], &["2024-01-15", "income", "x"]],
        );
        let err = normalize_table(&raw, "upload").unwrap_err();
        assert_eq!(err, ValidationError::NoValidRows);
    }

    #[test]
    fn empty_table_is_a_validation_error() {
        let raw = table(&["date", "type", "amount"], &[]);
        assert_eq!(
            normalize_table(&raw, "upload").unwrap_err(),
            ValidationError::NoValidRows
        );
    }

    #[test]
    fn negative_amounts_fold_into_magnitude() {
        let raw = table(
            &["date", "type", "amount"],
            &[&["2024-01-15", "expense", "-250.5"]],
        );
        let ledger = normalize_table(&raw, "upload").unwrap();
        assert_eq!(ledger.transactions[0].amount, 250.5);
    }

    #[test]
    fn date_formats_and_comma_decimals_parse() {
        assert!(parse_date("15/01/2024").is_some());
        assert!(parse_date("2024-01-15 10:30:00").is_some());
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("1200.75"), Some(1200.75));
        assert_eq!(parse_amount("inf"), None);
    }
}
