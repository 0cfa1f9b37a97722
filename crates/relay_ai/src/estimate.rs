//! Token, cost and latency estimation for a hypothetical request.
//!
//! Provides a character-based token heuristic, the capped token budget, cost
//! from per-1k pricing (rounded to micro-dollars) and latency with up to 15%
//! uniform jitter drawn from an injected [`RandomSource`].

use crate::capability::RandomSource;
use crate::types::{Estimate, ModelProfile};

/// Largest generated-length contribution assumed for a request, whatever the
/// requested maximum.
pub const MAX_GENERATED_TOKENS: u32 = 2000;

/// Upper bound of the latency jitter as a fraction of the base latency.
pub const LATENCY_JITTER: f64 = 0.15;

// ---------------------------------------------------------------------------
// Token estimation
// ---------------------------------------------------------------------------

/// Estimate token count from text using a character-based heuristic.
///
/// Uses ~4 characters per token for English text, rounding up.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    u32::try_from(chars.div_ceil(4)).unwrap_or(u32::MAX)
}

/// Total tokens assumed for a request: input plus the requested maximum
/// capped at [`MAX_GENERATED_TOKENS`], never less than 1.
pub fn total_tokens(input_tokens: u32, max_tokens: u32) -> u32 {
    input_tokens
        .saturating_add(max_tokens.min(MAX_GENERATED_TOKENS))
        .max(1)
}

// ---------------------------------------------------------------------------
// Cost and latency
// ---------------------------------------------------------------------------

/// Round a USD amount to 6 decimal places.
pub fn round_cost(cost: f64) -> f64 {
    (cost * 1_000_000.0).round() / 1_000_000.0
}

/// Price of `tokens` on `model`, rounded to 6 decimal places.
pub fn cost_for_tokens(model: &ModelProfile, tokens: u32) -> f64 {
    round_cost(tokens as f64 / 1000.0 * model.cost_per_thousand_tokens)
}

/// Base latency plus `jitter * base * 15%`, rounded to whole milliseconds.
/// `jitter` is a `U(0, 1)` sample.
pub fn jittered_latency(model: &ModelProfile, jitter: f64) -> u64 {
    let base = model.base_latency_ms as f64;
    (base + jitter * base * LATENCY_JITTER).round() as u64
}

/// Estimate tokens, cost and latency for one request against `model`.
///
/// Consumes exactly one sample from `rng`.
pub fn estimate(
    model: &ModelProfile,
    input_tokens: u32,
    max_tokens: u32,
    rng: &mut dyn RandomSource,
) -> Estimate {
    let tokens = total_tokens(input_tokens, max_tokens);
    Estimate {
        tokens,
        cost: cost_for_tokens(model, tokens),
        latency_ms: jittered_latency(model, rng.next_unit()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
