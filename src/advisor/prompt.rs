//! Prompt construction for the narrative model. Prompts carry a compact
//! JSON summary of the data plus plain KPI lines, and are hard-capped in
//! size before leaving the process.

use serde_json::json;

use crate::ledger::Ledger;
use crate::metrics::{FinancialSummary, MetricsSnapshot};
use crate::projection::{MonteCarloProjection, SimpleProjection};
use crate::simulation::Scenario;

use super::DecisionParams;

/// Prompts above this many bytes are truncated with a visible marker.
pub const MAX_PROMPT_CHARS: usize = 40_000;

const TRUNCATION_MARKER: &str = "\n\n[truncated: dataset too large]";

/// How many ledger rows the dataset summary samples.
const SAMPLE_ROWS: usize = 5;

/// Caps a prompt at [`MAX_PROMPT_CHARS`], appending a truncation marker.
pub fn bound_prompt(mut prompt: String) -> String {
    if prompt.len() <= MAX_PROMPT_CHARS {
        return prompt;
    }
    let mut cut = MAX_PROMPT_CHARS;
    while !prompt.is_char_boundary(cut) {
        cut -= 1;
    }
    prompt.truncate(cut);
    prompt.push_str(TRUNCATION_MARKER);
    prompt
}

fn dataset_summary(ledger: &Ledger, metrics: &MetricsSnapshot) -> String {
    let sample: Vec<_> = ledger
        .transactions
        .iter()
        .take(SAMPLE_ROWS)
        .map(|txn| {
            json!({
                "date": txn.date.to_string(),
                "type": txn.kind,
                "amount": txn.amount,
                "category": txn.category,
                "description": txn.description,
            })
        })
        .collect();

    let summary = json!({
        "columns": ["date", "type", "amount", "category", "description"],
        "row_count": ledger.transaction_count(),
        "sample_rows": sample,
        "aggregates": {
            "total_income": metrics.income,
            "total_expense": metrics.expense,
            "total_flow": metrics.flow,
        },
    });
    summary.to_string()
}

fn kpi_lines(metrics: &MetricsSnapshot) -> String {
    format!(
        "income: {:.2}\nexpense: {:.2}\nflow: {:.2}\nsavings_ratio: {:.4}",
        metrics.income, metrics.expense, metrics.flow, metrics.savings_ratio
    )
}

/// Prompt asking for an executive read of the current dashboard.
pub fn dashboard_prompt(ledger: &Ledger, metrics: &MetricsSnapshot) -> String {
    let prompt = format!(
        "You are a senior financial analyst. Below is a dataset summary and \
         the current KPIs. Produce: an executive summary (3 lines max), 3 \
         insights, 3 actionable recommendations with High/Medium/Low \
         priority and estimated impact, 3 metrics to watch with how to \
         compute them, and the limitations of the analysis.\n\n\
         Dataset:\n{}\n\nKPIs:\n{}\n",
        dataset_summary(ledger, metrics),
        kpi_lines(metrics)
    );
    bound_prompt(prompt)
}

/// Prompt asking for a read of a simulated scenario against the baseline.
pub fn scenario_prompt(
    ledger: &Ledger,
    simulated: &MetricsSnapshot,
    scenario: &Scenario,
) -> String {
    let mut adjustments = String::new();
    for (key, delta) in scenario.entries() {
        adjustments.push_str(&format!("- {}: {:+.2}%\n", key, delta * 100.0));
    }
    if adjustments.is_empty() {
        adjustments.push_str("- none\n");
    }

    let prompt = format!(
        "You are an expert financial assistant. Below are the dataset \
         summary, the KPIs of a simulated scenario, and the scenario \
         parameters. Explain in 3 points the immediate impact on cash flow, \
         give 3 prioritized recommendations to improve liquidity, flag 2 \
         risks with the metrics to track, and finish with a one-line \
         summary.\n\n\
         Dataset:\n{}\n\nSimulated KPIs:\n{}\n\nAdjustments:\n{}",
        dataset_summary(ledger, simulated),
        kpi_lines(simulated),
        adjustments
    );
    bound_prompt(prompt)
}

/// Prompt asking for a digital-CFO report over summary and projections.
pub fn decision_prompt(
    summary: &FinancialSummary,
    projection: &SimpleProjection,
    monte_carlo: &MonteCarloProjection,
    params: &DecisionParams,
) -> String {
    let payload = json!({
        "kpis": {
            "total_income": summary.total_income,
            "total_expense": summary.total_expense,
            "total_flow": summary.total_flow,
            "average_margin": summary.average_margin,
            "income_cagr": summary.income_cagr,
            "projected_mean_growth": projection.mean_growth,
            "mc_p10_p50_p90": [monte_carlo.p10, monte_carlo.p50, monte_carlo.p90],
        },
        "params": {
            "horizon_months": params.horizon_months,
            "reinvest_share": params.reinvest_share,
            "risk_profile": params.risk_profile,
        },
    });

    let prompt = format!(
        "You are a digital CFO and senior financial analyst. Using the \
         summary below, produce a plain-text report with these exact \
         sections, in caps, separated by ------- lines: EXECUTIVE SUMMARY \
         (2-3 lines), INSIGHTS (3 numbered), RECOMMENDATIONS (1-3 actions, \
         each with priority, suggested amount, horizon, estimated impact \
         and risks), SCENARIOS (optimistic/expected/pessimistic, brief), \
         METRICS TO WATCH (name and alarm threshold), ASSUMPTIONS (2-4 \
         bullet points). No JSON, plain readable text.\n\n\
         Data:\n{payload}\n"
    );
    bound_prompt(prompt)
}
