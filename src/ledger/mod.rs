//! Ledger domain models and normalization helpers.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod normalize;
pub mod transaction;

pub use ledger::{FlowSeries, Ledger, MonthlyBreakdown};
pub use normalize::{normalize_table, RawTable};
pub use transaction::{Transaction, TransactionKind};
