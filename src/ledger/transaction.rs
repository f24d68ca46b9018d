use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::fold_label;

/// Substrings that mark a free-text type label as income.
const INCOME_MARKERS: [&str; 2] = ["ingre", "income"];

/// Direction of a ledger row. Canonical amounts are non-negative; the sign
/// is carried here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Classifies a raw type label. Labels containing an income-indicating
    /// substring become `Income`; everything else is `Expense`.
    pub fn classify(label: &str) -> Self {
        let folded = fold_label(label);
        if INCOME_MARKERS.iter().any(|marker| folded.contains(marker)) {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    pub fn is_income(self) -> bool {
        matches!(self, TransactionKind::Income)
    }
}

/// One canonical ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Option<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, kind: TransactionKind, amount: f64) -> Self {
        Self {
            date,
            description: String::new(),
            amount: amount.abs(),
            kind,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(fold_label(&category.into()));
        self
    }

    /// Calendar month key, `YYYY-MM`.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.date.year(), self.date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_spanish_and_english_income_labels() {
        assert_eq!(TransactionKind::classify("ingreso"), TransactionKind::Income);
        assert_eq!(TransactionKind::classify("INGRESOS"), TransactionKind::Income);
        assert_eq!(TransactionKind::classify("Income"), TransactionKind::Income);
        assert_eq!(TransactionKind::classify("gasto"), TransactionKind::Expense);
        assert_eq!(TransactionKind::classify("expense"), TransactionKind::Expense);
    }

    #[test]
    fn amounts_are_stored_non_negative() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let txn = Transaction::new(date, TransactionKind::Expense, -42.5);
        assert_eq!(txn.amount, 42.5);
    }

    #[test]
    fn month_key_pads_to_calendar_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let txn = Transaction::new(date, TransactionKind::Income, 10.0);
        assert_eq!(txn.month_key(), "2024-03");
    }
}
