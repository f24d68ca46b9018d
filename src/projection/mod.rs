//! Extrapolation of a monthly flow series: deterministic mean-growth
//! projection and a stochastic Monte Carlo percentile projection.

mod rng;

use serde::Serialize;

use crate::utils::stats;
use rng::{percentile, Rng};

pub const DEFAULT_HORIZON_MONTHS: usize = 12;
pub const DEFAULT_TRIALS: usize = 500;
pub const DEFAULT_SEED: u64 = 42;

/// Widening applied to the shock scale when history is constant, so the
/// trial endpoints are not all identical.
const SIGMA_EPSILON: f64 = 1e-6;

/// Month-over-month fractional returns, skipping pairs whose divisor is 0.
fn month_over_month_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Result of the deterministic projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleProjection {
    pub monthly: Vec<f64>,
    pub mean_growth: f64,
}

/// Extrapolates the series by its mean month-over-month growth.
///
/// With fewer than two history points there is no growth to measure; every
/// projected month equals the last known value (0 for an empty history).
pub fn project_simple(history: &[f64], horizon_months: usize) -> SimpleProjection {
    if history.len() < 2 {
        let last = history.last().copied().unwrap_or(0.0);
        return SimpleProjection {
            monthly: vec![last; horizon_months],
            mean_growth: 0.0,
        };
    }

    let mean_growth = stats::mean(&month_over_month_returns(history));
    let mut monthly = Vec::with_capacity(horizon_months);
    let mut current = history[history.len() - 1];
    for _ in 0..horizon_months {
        current *= 1.0 + mean_growth;
        monthly.push(current);
    }

    SimpleProjection {
        monthly,
        mean_growth,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloConfig {
    pub horizon_months: usize,
    pub trials: usize,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Percentile summary of the Monte Carlo trial endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloProjection {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub horizon_months: usize,
    pub trials: usize,
}

/// Runs independent trials of multiplicative shocks drawn from
/// Normal(mu, sigma), where mu/sigma come from the historical returns.
///
/// Trial values are clamped at zero from below; the model assumes flow does
/// not recover through negative territory. Fewer than two history points
/// yield all-zero percentiles.
pub fn project_monte_carlo(history: &[f64], config: MonteCarloConfig) -> MonteCarloProjection {
    if history.len() < 2 {
        return MonteCarloProjection {
            p10: 0.0,
            p50: 0.0,
            p90: 0.0,
            horizon_months: config.horizon_months,
            trials: config.trials,
        };
    }

    let returns = month_over_month_returns(history);
    let mu = stats::mean(&returns);
    let sigma = stats::population_std(&returns, mu);
    let sigma = if sigma > 0.0 { sigma } else { SIGMA_EPSILON };

    let last = history[history.len() - 1];
    let mut rng = Rng::new(config.seed);
    let mut endpoints = Vec::with_capacity(config.trials);
    for _ in 0..config.trials {
        let mut current = last;
        for _ in 0..config.horizon_months {
            let shock = mu + sigma * rng.standard_normal();
            current *= 1.0 + shock;
            if current < 0.0 {
                current = 0.0;
            }
        }
        endpoints.push(current);
    }

    MonteCarloProjection {
        p10: percentile(&mut endpoints, 10.0),
        p50: percentile(&mut endpoints, 50.0),
        p90: percentile(&mut endpoints, 90.0),
        horizon_months: config.horizon_months,
        trials: config.trials,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_percent_growth_projects_exactly() {
        let projection = project_simple(&[100.0, 110.0, 121.0], 2);
        assert!((projection.mean_growth - 0.10).abs() < 1e-9);
        assert!((projection.monthly[0] - 133.1).abs() < 1e-6);
        assert!((projection.monthly[1] - 146.41).abs() < 1e-6);
    }

    #[test]
    fn short_history_repeats_last_value() {
        let projection = project_simple(&[250.0], 4);
        assert_eq!(projection.mean_growth, 0.0);
        assert_eq!(projection.monthly, vec![250.0; 4]);

        let empty = project_simple(&[], 3);
        assert_eq!(empty.monthly, vec![0.0; 3]);
    }

    #[test]
    fn zero_divisor_pairs_are_skipped() {
        // Only the 100 -> 150 step contributes; the 0 -> 100 step has no
        // defined return.
        let projection = project_simple(&[0.0, 100.0, 150.0], 1);
        assert!((projection.mean_growth - 0.5).abs() < 1e-9);
    }

    #[test]
    fn monte_carlo_percentiles_are_ordered() {
        let history = [100.0, 90.0, 120.0, 115.0, 130.0];
        let result = project_monte_carlo(&history, MonteCarloConfig::default());
        assert!(result.p10 <= result.p50);
        assert!(result.p50 <= result.p90);
    }

    #[test]
    fn monte_carlo_is_deterministic_per_seed() {
        let history = [100.0, 105.0, 98.0, 112.0];
        let config = MonteCarloConfig {
            seed: 7,
            ..MonteCarloConfig::default()
        };
        let a = project_monte_carlo(&history, config);
        let b = project_monte_carlo(&history, config);
        assert_eq!(a, b);

        let other = project_monte_carlo(
            &history,
            MonteCarloConfig {
                seed: 8,
                ..config
            },
        );
        assert_ne!(a.p50, other.p50);
    }

    #[test]
    fn constant_history_still_spreads_endpoints() {
        let result = project_monte_carlo(&[100.0, 100.0, 100.0], MonteCarloConfig::default());
        assert!(result.p90 > result.p10);
        assert!((result.p50 - 100.0).abs() < 1.0);
    }

    #[test]
    fn short_history_yields_zero_percentiles() {
        let result = project_monte_carlo(&[42.0], MonteCarloConfig::default());
        assert_eq!((result.p10, result.p50, result.p90), (0.0, 0.0, 0.0));
    }

    #[test]
    fn endpoints_never_go_negative() {
        // Strongly negative drift pushes trials toward the clamp.
        let history = [100.0, 40.0, 10.0];
        let result = project_monte_carlo(&history, MonteCarloConfig::default());
        assert!(result.p10 >= 0.0);
    }
}
