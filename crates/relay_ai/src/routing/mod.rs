//! Relay Routing System
//!
//! Priority-weighted model selection: every candidate is normalized against
//! the whole catalog, combined with the user's weights, and ranked.

mod model_router;
pub mod priority_scorer;

pub use model_router::*;
pub use priority_scorer::{MetricBounds, RankedModel, rank, score, select_best};
