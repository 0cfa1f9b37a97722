//! Model Router
//!
//! Wraps the priority scorer with the catalog and the user's optional manual
//! pick to produce a final routing decision. Explicit selection always wins;
//! otherwise the best-ranked model is chosen.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::ModelCatalog;
use crate::error::RoutingError;
use crate::types::{ModelProfile, ModelScore, PriorityWeights};

use super::priority_scorer::rank;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The final routing decision produced by the [`ModelRouter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// The chosen model.
    pub model: ModelProfile,
    /// Score of the chosen model under the weights in effect.
    pub score: ModelScore,
    /// Every model's score, best first.
    pub ranking: Vec<ModelScore>,
    /// Whether the model was picked by the user rather than by score.
    pub manual: bool,
    /// Human-readable explanation of why this route was chosen.
    pub reasoning: String,
}

impl RoutingDecision {
    /// 1-based rank of the chosen model in the ranking.
    pub fn rank_position(&self) -> usize {
        self.ranking
            .iter()
            .position(|s| s.model_id == self.model.id)
            .map_or(0, |i| i + 1)
    }
}

// ---------------------------------------------------------------------------
// ModelRouter
// ---------------------------------------------------------------------------

/// Routes requests over a fixed catalog.
#[derive(Debug, Clone, Default)]
pub struct ModelRouter {
    catalog: ModelCatalog,
}

impl ModelRouter {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Route under `weights`.
    ///
    /// If `manual_model` is given it must name a model in the catalog; the
    /// ranking is still computed so callers can show where the pick landed.
    pub fn route(
        &self,
        weights: &PriorityWeights,
        manual_model: Option<&str>,
    ) -> Result<RoutingDecision, RoutingError> {
        let ranked = rank(self.catalog.models(), weights)?;
        let ranking: Vec<ModelScore> = ranked.iter().map(|r| r.score.clone()).collect();

        if let Some(id) = manual_model {
            let chosen = ranked
                .iter()
                .find(|r| r.model.id == id)
                .ok_or_else(|| RoutingError::UnknownModel(id.to_string()))?;

            debug!(model = id, "Manual model routed directly");
            let position = ranking.iter().position(|s| s.model_id == id).unwrap_or(0) + 1;
            return Ok(RoutingDecision {
                model: chosen.model.clone(),
                score: chosen.score.clone(),
                reasoning: format!(
                    "Manual selection: {} (ranked #{} of {} under {})",
                    chosen.model.name,
                    position,
                    ranking.len(),
                    weights
                ),
                ranking,
                manual: true,
            });
        }

        let best = ranked.first().ok_or(RoutingError::EmptyCatalog)?;

        info!(
            model = %best.model.id,
            score = best.score.combined,
            %weights,
            "Auto-routed by priority"
        );

        Ok(RoutingDecision {
            model: best.model.clone(),
            score: best.score.clone(),
            reasoning: format!(
                "Auto-routed: {} scored {:.3} (cost {:.2}, latency {:.2}, quality {:.2}) under {}",
                best.model.name,
                best.score.combined,
                best.score.norm_cost,
                best.score.norm_latency,
                best.score.norm_quality,
                weights
            ),
            ranking,
            manual: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> ModelRouter {
        ModelRouter::new(ModelCatalog::builtin())
    }

    #[test]
    fn auto_route_cost_only_picks_cheapest() {
        let decision = router().route(&PriorityWeights::cost_only(), None).unwrap();
        assert_eq!(decision.model.id, "swift-mini");
        assert!(!decision.manual);
        assert_eq!(decision.rank_position(), 1);
        assert!(decision.reasoning.starts_with("Auto-routed"));
    }

    #[test]
    fn auto_route_quality_only_picks_titan() {
        let decision = router()
            .route(&PriorityWeights::quality_only(), None)
            .unwrap();
        assert_eq!(decision.model.id, "titan-ultra");
    }

    #[test]
    fn manual_route_overrides_score() {
        let decision = router()
            .route(&PriorityWeights::cost_only(), Some("titan-ultra"))
            .unwrap();
        assert_eq!(decision.model.id, "titan-ultra");
        assert!(decision.manual);
        // Most expensive model ranks last when only cost matters.
        assert_eq!(decision.rank_position(), 4);
        assert!(decision.reasoning.contains("#4 of 4"));
    }

    #[test]
    fn manual_route_unknown_model_errors() {
        let err = router()
            .route(&PriorityWeights::default(), Some("gpt-9"))
            .unwrap_err();
        assert_eq!(err, RoutingError::UnknownModel("gpt-9".into()));
    }

    #[test]
    fn ranking_contains_every_model() {
        let decision = router().route(&PriorityWeights::default(), None).unwrap();
        assert_eq!(decision.ranking.len(), 4);
        assert_eq!(decision.ranking[0].model_id, decision.model.id);
    }

    #[test]
    fn decision_serializes() {
        let decision = router().route(&PriorityWeights::default(), None).unwrap();
        let json = serde_json::to_string(&decision).unwrap();
        let back: RoutingDecision = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model.id, decision.model.id);
        assert_eq!(back.ranking.len(), 4);
    }
}
