//! Narrative recommendations: the model seam, prompt construction, and the
//! canned fallback served when the collaborator fails.
//!
//! The model is called synchronously, once, with no retry; a transient
//! failure surfaces as fallback advice and the next user action tries again.

mod prompt;

pub use prompt::{
    bound_prompt, dashboard_prompt, decision_prompt, scenario_prompt, MAX_PROMPT_CHARS,
};

use serde::Serialize;
use tracing::warn;

use crate::errors::ServiceError;
use crate::ledger::Ledger;
use crate::metrics::{summarize, FinancialSummary};
use crate::projection::{
    project_monte_carlo, project_simple, MonteCarloConfig, MonteCarloProjection, SimpleProjection,
};

/// Black-box narrative service: bounded text in, free text out.
pub trait NarrativeModel {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Canned tips used whenever the narrative model is unavailable.
pub const FINANCIAL_TIPS: [&str; 6] = [
    "Cut variable expenses before fixed ones.",
    "Put at least 10% of income into monthly savings.",
    "Negotiate annual rates or subscriptions to lower costs.",
    "Avoid high-interest debt and deferred payments.",
    "Set a budget per expense category.",
    "Direct part of income to safe investments or financial education.",
];

const FALLBACK_TIP_COUNT: usize = 3;

/// The tips served on model failure.
pub fn fallback_tips() -> &'static [&'static str] {
    &FINANCIAL_TIPS[..FALLBACK_TIP_COUNT]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdviceSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

/// Asks the model once; on failure serves the canned tips instead of an
/// error, so a broken collaborator never breaks the view.
pub fn advise(model: &dyn NarrativeModel, prompt: &str) -> Advice {
    match model.generate(prompt) {
        Ok(text) => Advice {
            text,
            source: AdviceSource::Model,
        },
        Err(err) => {
            warn!(%err, "narrative model failed, serving canned tips");
            Advice {
                text: fallback_tips().join("\n"),
                source: AdviceSource::Fallback,
            }
        }
    }
}

/// User knobs echoed into the digital-CFO prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionParams {
    pub horizon_months: usize,
    /// Share of the flow assumed reinvested.
    pub reinvest_share: f64,
    pub risk_profile: String,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            horizon_months: crate::projection::DEFAULT_HORIZON_MONTHS,
            reinvest_share: 0.3,
            risk_profile: "moderate".into(),
        }
    }
}

/// Summary, projections and narrative advice in one synchronous pass.
#[derive(Debug, Clone)]
pub struct DecisionReport {
    pub summary: FinancialSummary,
    pub projection: SimpleProjection,
    pub monte_carlo: MonteCarloProjection,
    pub advice: Advice,
}

/// Runs the full digital-CFO flow: summarize, project, ask the model.
pub fn decision_report(
    ledger: &Ledger,
    model: &dyn NarrativeModel,
    params: &DecisionParams,
    monte_carlo_config: MonteCarloConfig,
) -> DecisionReport {
    let summary = summarize(ledger);
    let flow = ledger.flow_series();

    let projection = project_simple(&flow.values, params.horizon_months);
    let monte_carlo = project_monte_carlo(
        &flow.values,
        MonteCarloConfig {
            horizon_months: params.horizon_months,
            ..monte_carlo_config
        },
    );

    let prompt = decision_prompt(&summary, &projection, &monte_carlo, params);
    let advice = advise(model, &prompt);

    DecisionReport {
        summary,
        projection,
        monte_carlo,
        advice,
    }
}
