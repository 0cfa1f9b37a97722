use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// A candidate model as shown in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProfile {
    pub id: String,
    pub name: String,
    /// Quality score, roughly 1–10.
    pub quality: f64,
    /// Median expected latency in milliseconds.
    pub base_latency_ms: u64,
    /// USD per 1000 tokens.
    pub cost_per_thousand_tokens: f64,
}

impl ModelProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cost_per_thousand_tokens: f64,
        base_latency_ms: u64,
        quality: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quality,
            base_latency_ms,
            cost_per_thousand_tokens,
        }
    }
}

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

/// User priorities for model selection.
///
/// The weights are used as-is: they need not sum to one, so a combined score
/// is only comparable with other scores computed under the same weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub cost: f64,
    pub latency: f64,
    pub quality: f64,
}

impl PriorityWeights {
    pub const fn new(cost: f64, latency: f64, quality: f64) -> Self {
        Self {
            cost,
            latency,
            quality,
        }
    }

    pub const fn cost_only() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub const fn latency_only() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub const fn quality_only() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn is_finite(&self) -> bool {
        self.cost.is_finite() && self.latency.is_finite() && self.quality.is_finite()
    }

    pub fn sum(&self) -> f64 {
        self.cost + self.latency + self.quality
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self::new(0.4, 0.3, 0.3)
    }
}

impl std::fmt::Display for PriorityWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cost={:.2} latency={:.2} quality={:.2}",
            self.cost, self.latency, self.quality
        )
    }
}

// ---------------------------------------------------------------------------
// Scores and estimates
// ---------------------------------------------------------------------------

/// Per-model scoring result. Every normalized metric is in `[0, 1]` with
/// higher meaning better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model_id: String,
    pub combined: f64,
    pub norm_cost: f64,
    pub norm_latency: f64,
    pub norm_quality: f64,
}

/// Predicted size, price and latency of one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub tokens: u32,
    /// USD, rounded to 6 decimal places.
    pub cost: f64,
    pub latency_ms: u64,
}
