//! Model catalog: the fixed, ordered set of candidates the scorer ranks.
//!
//! A catalog is immutable once built and never empty. Order matters: it is
//! the tie-breaker when two models score exactly the same.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::RoutingError;
use crate::types::ModelProfile;

// ---------------------------------------------------------------------------
// Built-in data
// ---------------------------------------------------------------------------

/// The four built-in demo models.
pub static BUILTIN_MODELS: Lazy<Vec<ModelProfile>> = Lazy::new(|| {
    vec![
        ModelProfile::new("swift-mini", "Swift Mini", 0.002, 150, 6.0),
        ModelProfile::new("balanced-pro", "Balanced Pro", 0.01, 300, 8.0),
        ModelProfile::new("titan-ultra", "Titan Ultra", 0.06, 600, 9.5),
        ModelProfile::new("sage-large", "Sage Large", 0.03, 450, 9.0),
    ]
});

// ---------------------------------------------------------------------------
// ModelCatalog
// ---------------------------------------------------------------------------

/// Immutable, non-empty, ordered list of candidate models. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCatalog {
    models: Arc<[ModelProfile]>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and metrics that
    /// are negative or not finite.
    pub fn new(models: Vec<ModelProfile>) -> Result<Self, RoutingError> {
        if models.is_empty() {
            return Err(RoutingError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(RoutingError::DuplicateModel(model.id.clone()));
            }
            validate_model(model)?;
        }

        Ok(Self {
            models: models.into(),
        })
    }

    /// The built-in four-model demo catalog.
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN_MODELS.clone().into(),
        }
    }

    pub fn models(&self) -> &[ModelProfile] {
        &self.models
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelProfile> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Always `false` for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Look up a model by exact id.
    pub fn get(&self, id: &str) -> Option<&ModelProfile> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Resolve user input to a model: exact id first, then case-insensitive
    /// id or display name.
    pub fn resolve(&self, input: &str) -> Option<&ModelProfile> {
        let trimmed = input.trim();
        if let Some(m) = self.get(trimmed) {
            return Some(m);
        }
        let needle = trimmed.to_lowercase();
        self.models
            .iter()
            .find(|m| m.id.to_lowercase() == needle || m.name.to_lowercase() == needle)
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_model(model: &ModelProfile) -> Result<(), RoutingError> {
    let invalid = |reason: &str| RoutingError::InvalidModel {
        id: model.id.clone(),
        reason: reason.to_string(),
    };

    if model.id.trim().is_empty() {
        return Err(invalid("id must not be blank"));
    }
    if !model.quality.is_finite() {
        return Err(invalid("quality must be finite"));
    }
    if !model.cost_per_thousand_tokens.is_finite() || model.cost_per_thousand_tokens < 0.0 {
        return Err(invalid("cost must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_four_models_in_order() {
        let catalog = ModelCatalog::builtin();
        let ids: Vec<_> = catalog.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["swift-mini", "balanced-pro", "titan-ultra", "sage-large"]
        );
        assert!(!catalog.is_empty());
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(ModelCatalog::new(vec![]), Err(RoutingError::EmptyCatalog));
    }

    #[test]
    fn duplicate_id_rejected() {
        let models = vec![
            ModelProfile::new("a", "A", 0.01, 100, 5.0),
            ModelProfile::new("a", "A again", 0.02, 200, 6.0),
        ];
        assert_eq!(
            ModelCatalog::new(models),
            Err(RoutingError::DuplicateModel("a".into()))
        );
    }

    #[test]
    fn negative_cost_rejected() {
        let models = vec![ModelProfile::new("a", "A", -0.01, 100, 5.0)];
        assert!(matches!(
            ModelCatalog::new(models),
            Err(RoutingError::InvalidModel { .. })
        ));
    }

    #[test]
    fn nan_quality_rejected() {
        let models = vec![ModelProfile::new("a", "A", 0.01, 100, f64::NAN)];
        assert!(matches!(
            ModelCatalog::new(models),
            Err(RoutingError::InvalidModel { .. })
        ));
    }

    #[test]
    fn single_model_catalog_is_valid() {
        let catalog = ModelCatalog::new(vec![ModelProfile::new("a", "A", 0.0, 0, 1.0)]).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn get_by_exact_id() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.get("titan-ultra").unwrap().name, "Titan Ultra");
        assert!(catalog.get("Titan-Ultra").is_none());
    }

    #[test]
    fn resolve_by_name_case_insensitive() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.resolve("sage large").unwrap().id, "sage-large");
        assert_eq!(catalog.resolve("  SWIFT-MINI ").unwrap().id, "swift-mini");
        assert!(catalog.resolve("gpt").is_none());
    }

    #[test]
    fn clones_share_storage() {
        let a = ModelCatalog::builtin();
        let b = a.clone();
        assert!(std::ptr::eq(a.models().as_ptr(), b.models().as_ptr()));
    }
}
