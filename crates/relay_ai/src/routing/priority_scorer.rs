//! Priority Scorer
//!
//! Normalizes cost, latency and quality across the whole candidate set and
//! combines them with the user's priority weights.
//!
//! | Metric  | Normalized as                        |
//! |---------|--------------------------------------|
//! | cost    | `1 - (v - min) / (max - min)`        |
//! | latency | `1 - (v - min) / (max - min)`        |
//! | quality | `(v - min) / (max - min)`            |
//!
//! When every candidate has the same value for a metric (`max == min`) the
//! normalized value is `1` for all of them: no signal, no penalty.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoutingError;
use crate::types::{ModelProfile, ModelScore, PriorityWeights};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Inclusive range of one metric across a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    /// Position of `value` in the range as `0..=1`, or `1` when the range is
    /// degenerate.
    fn position(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        (value - self.min) / span
    }

    /// Normalize a metric where larger raw values are better.
    pub fn higher_is_better(&self, value: f64) -> f64 {
        self.position(value)
    }

    /// Normalize a metric where smaller raw values are better.
    pub fn lower_is_better(&self, value: f64) -> f64 {
        if self.max - self.min <= 0.0 {
            return 1.0;
        }
        1.0 - self.position(value)
    }
}

/// Min/max of every scored metric across a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBounds {
    pub cost: Range,
    pub latency: Range,
    pub quality: Range,
}

impl MetricBounds {
    /// Compute bounds across all `models`. Fails on an empty slice since no
    /// minimum or maximum exists.
    pub fn from_models(models: &[ModelProfile]) -> Result<Self, RoutingError> {
        let cost = Range::of(models.iter().map(|m| m.cost_per_thousand_tokens));
        let latency = Range::of(models.iter().map(|m| m.base_latency_ms as f64));
        let quality = Range::of(models.iter().map(|m| m.quality));

        match (cost, latency, quality) {
            (Some(cost), Some(latency), Some(quality)) => Ok(Self {
                cost,
                latency,
                quality,
            }),
            _ => Err(RoutingError::EmptyCatalog),
        }
    }

    /// Score one model against precomputed bounds.
    pub fn score(&self, model: &ModelProfile, weights: &PriorityWeights) -> ModelScore {
        let norm_cost = self.cost.lower_is_better(model.cost_per_thousand_tokens);
        let norm_latency = self.latency.lower_is_better(model.base_latency_ms as f64);
        let norm_quality = self.quality.higher_is_better(model.quality);

        let combined = norm_cost * weights.cost
            + norm_latency * weights.latency
            + norm_quality * weights.quality;

        ModelScore {
            model_id: model.id.clone(),
            combined,
            norm_cost,
            norm_latency,
            norm_quality,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring API
// ---------------------------------------------------------------------------

/// A model paired with its score, as produced by [`rank`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedModel<'a> {
    pub model: &'a ModelProfile,
    pub score: ModelScore,
}

/// Score `model` relative to every model in `catalog`.
///
/// The bounds always come from the full catalog, so the same model scores
/// differently against different candidate sets.
pub fn score(
    model: &ModelProfile,
    weights: &PriorityWeights,
    catalog: &[ModelProfile],
) -> Result<ModelScore, RoutingError> {
    let bounds = MetricBounds::from_models(catalog)?;
    Ok(bounds.score(model, weights))
}

/// Score every model and sort by combined score, best first.
///
/// The sort is stable: on an exact tie the model listed first in `catalog`
/// stays ahead.
pub fn rank<'a>(
    catalog: &'a [ModelProfile],
    weights: &PriorityWeights,
) -> Result<Vec<RankedModel<'a>>, RoutingError> {
    let bounds = MetricBounds::from_models(catalog)?;

    let mut ranked: Vec<RankedModel<'a>> = catalog
        .iter()
        .map(|model| RankedModel {
            model,
            score: bounds.score(model, weights),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .combined
            .partial_cmp(&a.score.combined)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        %weights,
        best = ranked.first().map(|r| r.model.id.as_str()).unwrap_or(""),
        "Ranked {} models",
        ranked.len()
    );

    Ok(ranked)
}

/// Pick the single best model for `weights`.
pub fn select_best<'a>(
    catalog: &'a [ModelProfile],
    weights: &PriorityWeights,
) -> Result<RankedModel<'a>, RoutingError> {
    rank(catalog, weights)?
        .into_iter()
        .next()
        .ok_or(RoutingError::EmptyCatalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelCatalog;

    fn scenario_models() -> Vec<ModelProfile> {
        vec![
            ModelProfile::new("a", "A", 0.002, 150, 6.0),
            ModelProfile::new("b", "B", 0.01, 300, 8.0),
            ModelProfile::new("c", "C", 0.06, 600, 9.5),
            ModelProfile::new("d", "D", 0.03, 450, 9.0),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // -- bounds -----------------------------------------------------------

    #[test]
    fn bounds_cover_whole_catalog() {
        let bounds = MetricBounds::from_models(&scenario_models()).unwrap();
        assert!(approx(bounds.cost.min, 0.002));
        assert!(approx(bounds.cost.max, 0.06));
        assert!(approx(bounds.latency.min, 150.0));
        assert!(approx(bounds.latency.max, 600.0));
        assert!(approx(bounds.quality.min, 6.0));
        assert!(approx(bounds.quality.max, 9.5));
    }

    #[test]
    fn empty_catalog_fails_fast() {
        let model = ModelProfile::new("a", "A", 0.01, 100, 5.0);
        assert_eq!(
            score(&model, &PriorityWeights::default(), &[]),
            Err(RoutingError::EmptyCatalog)
        );
        assert_eq!(
            rank(&[], &PriorityWeights::default()).unwrap_err(),
            RoutingError::EmptyCatalog
        );
        assert!(select_best(&[], &PriorityWeights::default()).is_err());
    }

    // -- normalization ----------------------------------------------------

    #[test]
    fn cheapest_gets_full_cost_score_and_most_expensive_zero() {
        let models = scenario_models();
        let w = PriorityWeights::default();
        let cheap = score(&models[0], &w, &models).unwrap();
        let pricey = score(&models[2], &w, &models).unwrap();
        assert!(approx(cheap.norm_cost, 1.0));
        assert!(approx(pricey.norm_cost, 0.0));
        assert!(approx(cheap.norm_latency, 1.0));
        assert!(approx(pricey.norm_latency, 0.0));
    }

    #[test]
    fn quality_is_not_inverted() {
        let models = scenario_models();
        let w = PriorityWeights::default();
        assert!(approx(score(&models[0], &w, &models).unwrap().norm_quality, 0.0));
        assert!(approx(score(&models[2], &w, &models).unwrap().norm_quality, 1.0));
        // (8 - 6) / 3.5
        assert!(approx(
            score(&models[1], &w, &models).unwrap().norm_quality,
            2.0 / 3.5
        ));
    }

    #[test]
    fn normalized_values_within_unit_interval() {
        let models = scenario_models();
        for m in &models {
            let s = score(m, &PriorityWeights::default(), &models).unwrap();
            for v in [s.norm_cost, s.norm_latency, s.norm_quality] {
                assert!((0.0..=1.0).contains(&v), "{v} out of range for {}", m.id);
            }
        }
    }

    #[test]
    fn tied_cost_normalizes_to_one_for_every_model() {
        let models = vec![
            ModelProfile::new("a", "A", 0.01, 100, 5.0),
            ModelProfile::new("b", "B", 0.01, 200, 7.0),
            ModelProfile::new("c", "C", 0.01, 300, 9.0),
        ];
        for m in &models {
            let s = score(m, &PriorityWeights::default(), &models).unwrap();
            assert_eq!(s.norm_cost, 1.0);
        }
    }

    #[test]
    fn single_model_scores_one_on_every_metric() {
        let models = vec![ModelProfile::new("solo", "Solo", 0.5, 999, 3.0)];
        let s = score(&models[0], &PriorityWeights::new(1.0, 1.0, 1.0), &models).unwrap();
        assert_eq!(s.norm_cost, 1.0);
        assert_eq!(s.norm_latency, 1.0);
        assert_eq!(s.norm_quality, 1.0);
        assert!(approx(s.combined, 3.0));
    }

    #[test]
    fn score_uses_full_catalog_not_just_candidate() {
        let models = scenario_models();
        let w = PriorityWeights::cost_only();
        let against_all = score(&models[1], &w, &models).unwrap();
        let against_self = score(&models[1], &w, &models[1..2]).unwrap();
        assert!(against_all.norm_cost < 1.0);
        assert_eq!(against_self.norm_cost, 1.0);
    }

    // -- combination ------------------------------------------------------

    #[test]
    fn combined_is_plain_weighted_sum() {
        let models = scenario_models();
        let w = PriorityWeights::new(2.0, -1.0, 0.5);
        let s = score(&models[3], &w, &models).unwrap();
        let expected = s.norm_cost * 2.0 - s.norm_latency + s.norm_quality * 0.5;
        assert!(approx(s.combined, expected));
    }

    #[test]
    fn zero_weights_give_zero_scores() {
        let models = scenario_models();
        let ranked = rank(&models, &PriorityWeights::new(0.0, 0.0, 0.0)).unwrap();
        assert!(ranked.iter().all(|r| r.score.combined == 0.0));
        // All tied: catalog order preserved.
        let ids: Vec<_> = ranked.iter().map(|r| r.model.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    // -- selection --------------------------------------------------------

    #[test]
    fn cost_only_selects_cheapest() {
        let models = scenario_models();
        let best = select_best(&models, &PriorityWeights::cost_only()).unwrap();
        assert!(approx(best.model.cost_per_thousand_tokens, 0.002));
    }

    #[test]
    fn latency_only_selects_fastest() {
        let models = scenario_models();
        let best = select_best(&models, &PriorityWeights::latency_only()).unwrap();
        assert_eq!(best.model.base_latency_ms, 150);
    }

    #[test]
    fn quality_only_selects_best_quality() {
        let models = scenario_models();
        let best = select_best(&models, &PriorityWeights::quality_only()).unwrap();
        assert_eq!(best.model.id, "c");
    }

    #[test]
    fn one_hot_weights_break_ties_by_list_order() {
        let models = vec![
            ModelProfile::new("first", "First", 0.05, 500, 9.0),
            ModelProfile::new("second", "Second", 0.01, 100, 9.0),
            ModelProfile::new("third", "Third", 0.01, 100, 5.0),
        ];
        // second and third tie on cost and latency; second is listed first.
        let best = select_best(&models, &PriorityWeights::cost_only()).unwrap();
        assert_eq!(best.model.id, "second");
        let best = select_best(&models, &PriorityWeights::latency_only()).unwrap();
        assert_eq!(best.model.id, "second");
        // first and second tie on quality; first is listed first.
        let best = select_best(&models, &PriorityWeights::quality_only()).unwrap();
        assert_eq!(best.model.id, "first");
    }

    #[test]
    fn ranking_is_descending() {
        let models = scenario_models();
        let ranked = rank(&models, &PriorityWeights::default()).unwrap();
        assert_eq!(ranked.len(), models.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score.combined >= pair[1].score.combined);
        }
    }

    #[test]
    fn ranking_is_deterministic() {
        let models = scenario_models();
        let w = PriorityWeights::new(0.2, 0.5, 0.3);
        let first: Vec<_> = rank(&models, &w)
            .unwrap()
            .into_iter()
            .map(|r| r.model.id.clone())
            .collect();
        for _ in 0..10 {
            let again: Vec<_> = rank(&models, &w)
                .unwrap()
                .into_iter()
                .map(|r| r.model.id.clone())
                .collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn builtin_catalog_cost_only_picks_swift_mini() {
        let catalog = ModelCatalog::builtin();
        let best = select_best(catalog.models(), &PriorityWeights::cost_only()).unwrap();
        assert_eq!(best.model.id, "swift-mini");
        assert!(approx(best.model.cost_per_thousand_tokens, 0.002));
    }
}
