//! Flags months whose net flow departs from the rest of the history.
//!
//! The heavy detector is pluggable (the dashboards historically trained an
//! isolation forest); with little history, or when the detector fails, a
//! z-score rule takes over.

use serde::Serialize;
use tracing::warn;

use crate::errors::ServiceError;
use crate::ledger::FlowSeries;
use crate::utils::stats;

/// Below this many monthly points no detection runs at all.
pub const MIN_POINTS: usize = 3;

/// Below this many points the configured detector is skipped in favor of the
/// z-score rule.
pub const DEFAULT_MIN_DETECTOR_SAMPLES: usize = 6;

/// |z| above this flags a month under the fallback rule.
pub const ZSCORE_THRESHOLD: f64 = 2.0;

/// External detector seam. Implementations return one flag per input point,
/// `true` meaning anomalous.
pub trait AnomalyDetector {
    fn detect(&self, values: &[f64]) -> Result<Vec<bool>, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointLabel {
    Normal,
    Anomalous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionMethod {
    Detector,
    ZScoreFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub months: Vec<String>,
    pub labels: Vec<PointLabel>,
    pub method: DetectionMethod,
}

impl AnomalyReport {
    pub fn anomalous_months(&self) -> Vec<&str> {
        self.months
            .iter()
            .zip(&self.labels)
            .filter(|(_, label)| **label == PointLabel::Anomalous)
            .map(|(month, _)| month.as_str())
            .collect()
    }

    pub fn anomaly_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|label| **label == PointLabel::Anomalous)
            .count()
    }
}

/// Labels each month of the flow series. Returns `None` below [`MIN_POINTS`].
///
/// The configured detector only runs with at least `min_detector_samples`
/// points; otherwise, and on any detector failure, the z-score rule is used.
pub fn detect_anomalies(
    series: &FlowSeries,
    detector: Option<&dyn AnomalyDetector>,
    min_detector_samples: usize,
) -> Option<AnomalyReport> {
    if series.len() < MIN_POINTS {
        warn!(
            points = series.len(),
            "not enough months for anomaly detection"
        );
        return None;
    }

    let (flags, method) = match detector {
        Some(detector) if series.len() >= min_detector_samples => {
            match detector.detect(&series.values) {
                Ok(flags) if flags.len() == series.len() => (flags, DetectionMethod::Detector),
                Ok(_) => {
                    warn!("anomaly detector returned a mismatched label count, using z-score");
                    (zscore_flags(&series.values), DetectionMethod::ZScoreFallback)
                }
                Err(err) => {
                    warn!(%err, "anomaly detector failed, using z-score");
                    (zscore_flags(&series.values), DetectionMethod::ZScoreFallback)
                }
            }
        }
        _ => (zscore_flags(&series.values), DetectionMethod::ZScoreFallback),
    };

    let labels = flags
        .into_iter()
        .map(|anomalous| {
            if anomalous {
                PointLabel::Anomalous
            } else {
                PointLabel::Normal
            }
        })
        .collect();

    Some(AnomalyReport {
        months: series.months.clone(),
        labels,
        method,
    })
}

fn zscore_flags(values: &[f64]) -> Vec<bool> {
    let mean = stats::mean(values);
    let std = stats::population_std(values, mean) + 1e-9;
    values
        .iter()
        .map(|value| ((value - mean) / std).abs() > ZSCORE_THRESHOLD)
        .collect()
}
