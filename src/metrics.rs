//! Spreadsheet-style aggregates over a canonical ledger. Everything here is
//! a pure function of its input; snapshots are recomputed, never mutated.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ledger::{Ledger, TransactionKind};
use crate::utils::{fold_label, stats};

/// Label under which uncategorized expenses aggregate.
pub const UNCATEGORIZED: &str = "other";

/// Derived, immutable aggregate of a ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub income: f64,
    pub expense: f64,
    /// Net cash flow, income minus expense.
    pub flow: f64,
    /// Flow divided by income; 0 when income is 0.
    pub savings_ratio: f64,
    pub expense_by_category: BTreeMap<String, f64>,
}

/// Computes the KPI snapshot for a ledger. O(n), no side effects.
pub fn compute_metrics(ledger: &Ledger) -> MetricsSnapshot {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut expense_by_category: BTreeMap<String, f64> = BTreeMap::new();

    for txn in &ledger.transactions {
        match txn.kind {
            TransactionKind::Income => income += txn.amount,
            TransactionKind::Expense => {
                expense += txn.amount;
                let label = txn
                    .category
                    .as_deref()
                    .map(fold_label)
                    .filter(|label| !label.is_empty())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                *expense_by_category.entry(label).or_insert(0.0) += txn.amount;
            }
        }
    }

    let flow = income - expense;
    MetricsSnapshot {
        income,
        expense,
        flow,
        savings_ratio: savings_ratio(flow, income),
        expense_by_category,
    }
}

/// Flow over income, defined as 0 when income is not positive.
pub fn savings_ratio(flow: f64, income: f64) -> f64 {
    if income > 0.0 {
        flow / income
    } else {
        0.0
    }
}

/// Monthly series plus headline totals, the shape the advisor prompts and
/// the health index consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub months: Vec<String>,
    pub income_by_month: Vec<f64>,
    pub expense_by_month: Vec<f64>,
    pub flow_by_month: Vec<f64>,
    pub total_income: f64,
    pub total_expense: f64,
    pub total_flow: f64,
    /// Mean of the monthly flow/income ratios (0 for income-free months).
    pub average_margin: f64,
    /// Compound monthly growth of income across the observed months; 0 when
    /// fewer than two months or the first month has no income.
    pub income_cagr: f64,
}

pub fn summarize(ledger: &Ledger) -> FinancialSummary {
    let breakdown = ledger.monthly_breakdown();
    let flow = breakdown.flow();

    let monthly_margins: Vec<f64> = flow
        .iter()
        .zip(&breakdown.income)
        .map(|(flow, income)| savings_ratio(*flow, *income))
        .collect();

    let income_cagr = match (breakdown.income.first(), breakdown.income.last()) {
        (Some(&first), Some(&last)) if breakdown.income.len() >= 2 && first > 0.0 => {
            let periods = (breakdown.income.len() - 1) as f64;
            (last / first).powf(1.0 / periods) - 1.0
        }
        _ => 0.0,
    };

    FinancialSummary {
        total_income: breakdown.income.iter().sum(),
        total_expense: breakdown.expense.iter().sum(),
        total_flow: flow.iter().sum(),
        average_margin: stats::mean(&monthly_margins),
        income_cagr,
        months: breakdown.months,
        income_by_month: breakdown.income,
        expense_by_month: breakdown.expense,
        flow_by_month: flow,
    }
}
