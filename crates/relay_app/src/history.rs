//! Bounded, most-recent-first run history plus aggregate usage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use relay_ai::{Estimate, PriorityWeights};
use relay_core::config::DEFAULT_HISTORY_CAPACITY;

/// One completed run, as shown in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub prompt_preview: String,
    pub model_id: String,
    pub model_name: String,
    /// Estimate at decision time.
    pub estimate: Estimate,
    pub actual_tokens: u32,
    pub actual_cost: f64,
    pub timestamp: DateTime<Utc>,
    pub weights: PriorityWeights,
    pub manual: bool,
    pub response: String,
}

/// Keep the first `max_chars` characters of a prompt, appending `...` when
/// anything was cut. Whitespace runs are collapsed to single spaces.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> String {
    let flat = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

// ---------------------------------------------------------------------------
// RunHistory
// ---------------------------------------------------------------------------

/// Session-only run history. Newest first; the oldest entry is evicted once
/// `capacity` is exceeded.
#[derive(Debug, Clone, PartialEq)]
pub struct RunHistory {
    records: Vec<RunRecord>,
    capacity: usize,
}

impl RunHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Prepend a record and evict anything beyond capacity.
    pub fn push(&mut self, record: RunRecord) {
        self.records.insert(0, record);
        self.records.truncate(self.capacity);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&RunRecord> {
        self.records.first()
    }

    pub fn get(&self, id: &str) -> Option<&RunRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Aggregate totals over the retained records.
    pub fn summary(&self) -> UsageSummary {
        let mut runs_by_model: BTreeMap<String, usize> = BTreeMap::new();
        for record in &self.records {
            *runs_by_model.entry(record.model_id.clone()).or_insert(0) += 1;
        }
        UsageSummary {
            runs: self.records.len(),
            manual_runs: self.records.iter().filter(|r| r.manual).count(),
            estimated_cost: self.records.iter().map(|r| r.estimate.cost).sum(),
            actual_cost: self.records.iter().map(|r| r.actual_cost).sum(),
            actual_tokens: self.records.iter().map(|r| u64::from(r.actual_tokens)).sum(),
            runs_by_model,
        }
    }

    /// Export records as CSV, newest first.
    pub fn export_csv(&self) -> String {
        let mut csv = String::from(
            "timestamp,model_id,manual,estimated_tokens,estimated_cost,latency_ms,actual_tokens,actual_cost\n",
        );
        for r in &self.records {
            csv.push_str(&format!(
                "{},{},{},{},{:.6},{},{},{:.6}\n",
                r.timestamp.to_rfc3339(),
                r.model_id,
                r.manual,
                r.estimate.tokens,
                r.estimate.cost,
                r.estimate.latency_ms,
                r.actual_tokens,
                r.actual_cost
            ));
        }
        csv
    }
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Totals over the current history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub runs: usize,
    pub manual_runs: usize,
    pub estimated_cost: f64,
    pub actual_cost: f64,
    pub actual_tokens: u64,
    pub runs_by_model: BTreeMap<String, usize>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, model: &str, manual: bool, cost: f64) -> RunRecord {
        RunRecord {
            id: id.into(),
            prompt_preview: "hello".into(),
            model_id: model.into(),
            model_name: model.into(),
            estimate: Estimate {
                tokens: 100,
                cost,
                latency_ms: 300,
            },
            actual_tokens: 90,
            actual_cost: cost * 0.9,
            timestamp: Utc::now(),
            weights: PriorityWeights::default(),
            manual,
            response: "ok".into(),
        }
    }

    #[test]
    fn push_is_newest_first() {
        let mut history = RunHistory::default();
        history.push(record("1", "a", false, 0.001));
        history.push(record("2", "a", false, 0.001));
        assert_eq!(history.latest().unwrap().id, "2");
        assert_eq!(history.records()[1].id, "1");
    }

    #[test]
    fn sixty_runs_keep_fifty_most_recent() {
        let mut history = RunHistory::default();
        for i in 0..60 {
            history.push(record(&i.to_string(), "a", false, 0.001));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.records()[0].id, "59");
        assert_eq!(history.records()[49].id, "10");
        assert!(history.get("9").is_none());
    }

    #[test]
    fn zero_capacity_clamped_to_one() {
        let mut history = RunHistory::new(0);
        history.push(record("1", "a", false, 0.0));
        history.push(record("2", "a", false, 0.0));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().id, "2");
    }

    #[test]
    fn summary_totals() {
        let mut history = RunHistory::default();
        history.push(record("1", "swift-mini", false, 0.001));
        history.push(record("2", "titan-ultra", true, 0.01));
        history.push(record("3", "swift-mini", false, 0.002));

        let summary = history.summary();
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.manual_runs, 1);
        assert_eq!(summary.actual_tokens, 270);
        assert!((summary.estimated_cost - 0.013).abs() < 1e-12);
        assert_eq!(summary.runs_by_model["swift-mini"], 2);
        assert_eq!(summary.runs_by_model["titan-ultra"], 1);
    }

    #[test]
    fn empty_summary() {
        let summary = RunHistory::default().summary();
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.actual_cost, 0.0);
        assert!(summary.runs_by_model.is_empty());
    }

    #[test]
    fn export_csv_has_header_and_rows() {
        let mut history = RunHistory::default();
        history.push(record("1", "swift-mini", true, 0.0016));
        let csv = history.export_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("timestamp,model_id,"));
        assert!(lines[1].contains(",swift-mini,true,100,0.001600,300,90,"));
    }

    #[test]
    fn clear_empties_history() {
        let mut history = RunHistory::default();
        history.push(record("1", "a", false, 0.0));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn truncate_prompt_short_unchanged() {
        assert_eq!(truncate_prompt("hello world", 80), "hello world");
    }

    #[test]
    fn truncate_prompt_long_gets_ellipsis() {
        let prompt = "a".repeat(100);
        let preview = truncate_prompt(&prompt, 80);
        assert_eq!(preview.chars().count(), 83);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn truncate_prompt_collapses_whitespace_and_respects_chars() {
        assert_eq!(truncate_prompt("  one\n\ttwo  ", 80), "one two");
        assert_eq!(truncate_prompt("ééééé", 3), "ééé...");
    }
}
