//! Composite financial-health scoring over monthly ledger activity.

pub mod anomaly;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::ledger::{Ledger, TransactionKind};
use crate::metrics::savings_ratio;
use crate::utils::stats;

const SAVINGS_WEIGHT: f64 = 0.40;
const STABILITY_WEIGHT: f64 = 0.35;
const DIVERSIFICATION_WEIGHT: f64 = 0.25;

/// Mean-flow magnitudes below this count as "no trend" for the stability
/// coefficient of variation.
const FLOW_MEAN_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthLevel {
    Excellent,
    Stable,
    AtRisk,
}

impl HealthLevel {
    fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthLevel::Excellent
        } else if score >= 60.0 {
            HealthLevel::Stable
        } else {
            HealthLevel::AtRisk
        }
    }

    pub fn diagnosis(self) -> &'static str {
        match self {
            HealthLevel::Excellent => {
                "Finances are solid and steady; investing or expanding is an option."
            }
            HealthLevel::Stable => {
                "Overall health is good, though some expenses could be trimmed or income diversified."
            }
            HealthLevel::AtRisk => {
                "High risk of financial imbalance; reduce expenses and improve operating flow."
            }
        }
    }
}

/// Composite 0-100 health score with its component readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthIndex {
    pub score: f64,
    pub level: HealthLevel,
    /// Mean of the monthly flow/income ratios.
    pub average_savings: f64,
    /// 1 minus the flow's coefficient of variation, clamped to [0, 1].
    pub stability: f64,
    /// Distinct income categories over distinct categories overall.
    pub diversification: f64,
}

/// Scores the ledger. Returns `None` when there are no months or no income
/// at all to score against.
pub fn health_index(ledger: &Ledger) -> Option<HealthIndex> {
    let breakdown = ledger.monthly_breakdown();
    if breakdown.months.is_empty() || breakdown.income.iter().sum::<f64>() <= 0.0 {
        debug!("ledger has no income history to score");
        return None;
    }

    let flow = breakdown.flow();
    let monthly_ratios: Vec<f64> = flow
        .iter()
        .zip(&breakdown.income)
        .map(|(flow, income)| savings_ratio(*flow, *income))
        .collect();
    let average_savings = stats::mean(&monthly_ratios);

    let mean_flow = stats::mean(&flow);
    let stability = if mean_flow.abs() < FLOW_MEAN_FLOOR {
        1.0
    } else {
        let cv = stats::population_std(&flow, mean_flow) / mean_flow.abs();
        (1.0 - cv).clamp(0.0, 1.0)
    };

    let diversification = category_diversification(ledger);

    let score = ((average_savings * SAVINGS_WEIGHT
        + stability * STABILITY_WEIGHT
        + diversification * DIVERSIFICATION_WEIGHT)
        * 100.0)
        .clamp(0.0, 100.0);

    Some(HealthIndex {
        score,
        level: HealthLevel::for_score(score),
        average_savings,
        stability,
        diversification,
    })
}

fn category_diversification(ledger: &Ledger) -> f64 {
    let mut all: BTreeSet<&str> = BTreeSet::new();
    let mut income: BTreeSet<&str> = BTreeSet::new();
    for txn in &ledger.transactions {
        if let Some(category) = txn.category.as_deref() {
            all.insert(category);
            if txn.kind == TransactionKind::Income {
                income.insert(category);
            }
        }
    }
    if all.is_empty() {
        return 0.0;
    }
    income.len() as f64 / all.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Transaction;
    use chrono::NaiveDate;

    #[test]
    fn sample_ledger_scores_in_range_with_level() {
        let index = health_index(&Ledger::sample()).unwrap();
        assert!(index.score >= 0.0 && index.score <= 100.0);
        assert!(index.average_savings > 0.0);
        assert!(index.diversification > 0.0);
        assert_eq!(index.level, HealthLevel::for_score(index.score));
    }

    #[test]
    fn ledger_without_income_has_no_index() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut ledger = Ledger::new("t");
        ledger.add_transaction(Transaction::new(date, TransactionKind::Expense, 50.0));
        assert!(health_index(&ledger).is_none());
        assert!(health_index(&Ledger::new("empty")).is_none());
    }

    #[test]
    fn perfectly_steady_saver_scores_high() {
        let mut ledger = Ledger::new("t");
        for month in 1..=6 {
            let date = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
            ledger.add_transaction(
                Transaction::new(date, TransactionKind::Income, 1000.0).with_category("salary"),
            );
            ledger.add_transaction(
                Transaction::new(date, TransactionKind::Expense, 100.0).with_category("rent"),
            );
        }
        let index = health_index(&ledger).unwrap();
        // Constant flow: full stability; savings 0.9; one of two categories
        // carries income.
        assert!((index.stability - 1.0).abs() < 1e-9);
        assert!((index.average_savings - 0.9).abs() < 1e-9);
        assert!((index.diversification - 0.5).abs() < 1e-9);
        // 0.9*0.40 + 1.0*0.35 + 0.5*0.25 = 0.835
        assert!((index.score - 83.5).abs() < 1e-9);
        assert_eq!(index.level, HealthLevel::Excellent);
    }

    #[test]
    fn levels_cut_at_sixty_and_eighty() {
        assert_eq!(HealthLevel::for_score(85.0), HealthLevel::Excellent);
        assert_eq!(HealthLevel::for_score(80.0), HealthLevel::Excellent);
        assert_eq!(HealthLevel::for_score(60.0), HealthLevel::Stable);
        assert_eq!(HealthLevel::for_score(59.9), HealthLevel::AtRisk);
    }
}
