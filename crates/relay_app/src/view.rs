//! Plain-text rendering for the terminal session.

use std::fmt::Write as _;

use relay_ai::{Estimate, ModelCatalog, RoutingDecision};
use relay_core::AppNotification;

use crate::history::{RunHistory, RunRecord, UsageSummary};
use crate::session::RunPlan;
use crate::state::AppState;

pub fn format_cost(cost: f64) -> String {
    format!("${cost:.6}")
}

/// Ranking table, best first, with the chosen model marked `*`.
pub fn render_ranking(decision: &RoutingDecision, catalog: &ModelCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<3} {:<14} {:>7} {:>7} {:>7} {:>7}",
        "#", "model", "score", "cost", "latency", "quality"
    );
    for (i, score) in decision.ranking.iter().enumerate() {
        let marker = if score.model_id == decision.model.id { '*' } else { ' ' };
        let name = catalog
            .get(&score.model_id)
            .map_or(score.model_id.as_str(), |m| m.name.as_str());
        let _ = writeln!(
            out,
            "{marker} {:<3} {:<14} {:>7.3} {:>7.2} {:>7.2} {:>7.2}",
            i + 1,
            name,
            score.combined,
            score.norm_cost,
            score.norm_latency,
            score.norm_quality
        );
    }
    out.push_str(&decision.reasoning);
    out
}

pub fn render_estimate(estimate: &Estimate) -> String {
    format!(
        "~{} tokens, {}, ~{} ms",
        estimate.tokens,
        format_cost(estimate.cost),
        estimate.latency_ms
    )
}

pub fn render_plan(plan: &RunPlan) -> String {
    format!(
        "{} ({}): {}",
        plan.decision.model.name,
        if plan.decision.manual { "manual" } else { "auto" },
        render_estimate(&plan.estimate)
    )
}

pub fn render_record(record: &RunRecord) -> String {
    format!(
        "{}\n-- {} | {} tokens | {} (estimated {}) | {}",
        record.response,
        record.model_name,
        record.actual_tokens,
        format_cost(record.actual_cost),
        format_cost(record.estimate.cost),
        record.timestamp.format("%H:%M:%S")
    )
}

pub fn render_history(history: &RunHistory) -> String {
    if history.is_empty() {
        return "No runs yet.".into();
    }
    let mut out = String::new();
    for record in history.records() {
        let _ = writeln!(
            out,
            "{} {:<14} {:>6} tok {} {}  {}",
            record.timestamp.format("%H:%M:%S"),
            record.model_name,
            record.actual_tokens,
            format_cost(record.actual_cost),
            if record.manual { "M" } else { "A" },
            record.prompt_preview
        );
    }
    let _ = write!(out, "{} of {} slots used", history.len(), history.capacity());
    out
}

pub fn render_summary(summary: &UsageSummary) -> String {
    let mut out = format!(
        "{} runs ({} manual), {} tokens, actual {} vs estimated {}",
        summary.runs,
        summary.manual_runs,
        summary.actual_tokens,
        format_cost(summary.actual_cost),
        format_cost(summary.estimated_cost)
    );
    for (model, runs) in &summary.runs_by_model {
        let _ = write!(out, "\n  {model}: {runs}");
    }
    out
}

pub fn render_state(state: &AppState) -> String {
    let model = state.manual_model.as_deref().unwrap_or("auto");
    let input = state
        .token_budget
        .input_tokens
        .map_or_else(|| "auto".to_string(), |n| n.to_string());
    format!(
        "profile \"{}\" | {} | model {} | tokens in={} max={}",
        state.profile_name, state.weights, model, input, state.token_budget.max_tokens
    )
}

pub fn render_notification(notification: &AppNotification) -> String {
    match &notification.title {
        Some(title) => format!(
            "[{}] {title}: {}",
            notification.notification_type.label(),
            notification.message
        ),
        None => format!(
            "[{}] {}",
            notification.notification_type.label(),
            notification.message
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
