//! What-if scenarios: fractional deltas applied to income or to expense
//! categories, then re-measured with the metrics calculator. Simulation
//! always operates on a copy; the source ledger is never touched.

use std::collections::BTreeMap;

use tracing::warn;

use crate::ledger::{Ledger, TransactionKind};
use crate::metrics::{compute_metrics, MetricsSnapshot};
use crate::utils::fold_label;

/// Reserved adjustment key that targets every income row.
pub const INCOME_KEY: &str = "income";

/// Accepted spellings of the reserved income key, after folding.
const INCOME_KEY_ALIASES: [&str; 2] = [INCOME_KEY, "ingresos"];

/// A named set of fractional deltas. A delta of `0.1` scales matching
/// amounts by 1.1; `-0.25` scales them by 0.75.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    adjustments: BTreeMap<String, f64>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a delta for a category label or the reserved income key.
    pub fn with(mut self, key: impl Into<String>, delta: f64) -> Self {
        self.set(key, delta);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, delta: f64) {
        self.adjustments.insert(key.into(), delta);
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.adjustments
            .iter()
            .map(|(key, delta)| (key.as_str(), *delta))
    }
}

/// Applies the scenario to a copy of the ledger and recomputes metrics.
///
/// Keys matching no category are ignored, not rejected; they are logged so
/// a misspelled category stays visible.
pub fn simulate(ledger: &Ledger, scenario: &Scenario) -> MetricsSnapshot {
    let mut adjusted = ledger.clone();

    for (key, delta) in &scenario.adjustments {
        let folded = fold_label(key);
        let factor = 1.0 + delta;

        let mut matched = false;
        if INCOME_KEY_ALIASES.contains(&folded.as_str()) {
            for txn in &mut adjusted.transactions {
                if txn.kind == TransactionKind::Income {
                    txn.amount *= factor;
                    matched = true;
                }
            }
        } else {
            for txn in &mut adjusted.transactions {
                if txn.kind == TransactionKind::Expense
                    && txn.category.as_deref().map(fold_label).as_deref() == Some(folded.as_str())
                {
                    txn.amount *= factor;
                    matched = true;
                }
            }
        }

        if !matched {
            warn!(key = %key, "scenario adjustment matched no rows");
        }
    }

    compute_metrics(&adjusted)
}
