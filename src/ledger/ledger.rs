use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::{Transaction, TransactionKind};

/// Canonical table of financial transactions for one entity and time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    pub transactions: Vec<Transaction>,
    /// Rows discarded during normalization because date or amount failed to
    /// parse.
    #[serde(default)]
    pub dropped_rows: usize,
    pub created_at: DateTime<Utc>,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transactions: Vec::new(),
            dropped_rows: 0,
            created_at: Utc::now(),
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Income and expense totals per calendar month, aligned on the union of
    /// months seen on either side. Months missing one side report 0 for it.
    pub fn monthly_breakdown(&self) -> MonthlyBreakdown {
        let mut totals: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for txn in &self.transactions {
            let entry = totals.entry(txn.month_key()).or_insert((0.0, 0.0));
            match txn.kind {
                TransactionKind::Income => entry.0 += txn.amount,
                TransactionKind::Expense => entry.1 += txn.amount,
            }
        }

        let mut breakdown = MonthlyBreakdown::default();
        for (month, (income, expense)) in totals {
            breakdown.months.push(month);
            breakdown.income.push(income);
            breakdown.expense.push(expense);
        }
        breakdown
    }

    /// Monthly net-flow series, ascending by month key.
    pub fn flow_series(&self) -> FlowSeries {
        self.monthly_breakdown().flow_series()
    }

    /// The built-in example dataset: six months of a small company's
    /// activity, used by demos and tests.
    pub fn sample() -> Self {
        let rows: [(NaiveDate, &str, &str, &str, f64); 6] = [
            (date(2024, 1, 31), "ingreso", "Venta producto A", "ventas", 150_000.0),
            (date(2024, 2, 29), "gasto", "Nomina operativa", "personal", 70_000.0),
            (date(2024, 3, 31), "gasto", "Servicios", "infraestructura", 40_000.0),
            (date(2024, 4, 30), "ingreso", "Venta producto A", "ventas", 160_000.0),
            (date(2024, 5, 31), "gasto", "Renta oficina", "infraestructura", 30_000.0),
            (date(2024, 6, 30), "ingreso", "Venta producto B", "ventas", 170_000.0),
        ];

        let mut ledger = Ledger::new("sample");
        for (day, kind, description, category, amount) in rows {
            ledger.add_transaction(
                Transaction::new(day, TransactionKind::classify(kind), amount)
                    .with_description(description)
                    .with_category(category),
            );
        }
        ledger
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("static sample date is valid")
}

/// Per-month income and expense totals, aligned on the union of months.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyBreakdown {
    pub months: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl MonthlyBreakdown {
    pub fn flow(&self) -> Vec<f64> {
        self.income
            .iter()
            .zip(&self.expense)
            .map(|(income, expense)| income - expense)
            .collect()
    }

    pub fn flow_series(&self) -> FlowSeries {
        FlowSeries {
            months: self.months.clone(),
            values: self.flow(),
        }
    }
}

/// Ordered sequence of monthly net-flow values, indexed by `YYYY-MM` keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowSeries {
    pub months: Vec<String>,
    pub values: Vec<f64>,
}

impl FlowSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
