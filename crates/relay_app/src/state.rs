//! Explicit application state and the commands that transform it.
//!
//! `AppState::apply` is pure: it returns a new state or an error, and never
//! touches the state it was called on.

use relay_ai::{ModelCatalog, PriorityWeights};
use relay_core::{RelayConfig, RelayError};

use crate::history::{RunHistory, RunRecord};
use crate::settings::{RoutingSettings, parse_settings};

/// Token counts supplied by the user for estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    /// Explicit input tokens; `None` estimates them from the prompt text.
    pub input_tokens: Option<u32>,
    /// Requested maximum generated tokens.
    pub max_tokens: u32,
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            input_tokens: None,
            max_tokens: 512,
        }
    }
}

/// A discrete state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetWeights(PriorityWeights),
    SetProfileName(String),
    /// `None` returns to automatic selection.
    SelectModel(Option<String>),
    SetTokenBudget(TokenBudget),
    /// Raw contents of a settings file.
    ImportSettings(String),
    RecordRun(RunRecord),
    ClearHistory,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetWeights(_) => "set_weights",
            Self::SetProfileName(_) => "set_profile_name",
            Self::SelectModel(_) => "select_model",
            Self::SetTokenBudget(_) => "set_token_budget",
            Self::ImportSettings(_) => "import_settings",
            Self::RecordRun(_) => "record_run",
            Self::ClearHistory => "clear_history",
        }
    }
}

/// Everything the session shows and edits.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub profile_name: String,
    pub weights: PriorityWeights,
    /// Model id pinned by the user, if any.
    pub manual_model: Option<String>,
    pub token_budget: TokenBudget,
    pub history: RunHistory,
    catalog: ModelCatalog,
}

impl AppState {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self {
            profile_name: crate::settings::DEFAULT_SETTINGS_STEM.into(),
            weights: PriorityWeights::default(),
            manual_model: None,
            token_budget: TokenBudget::default(),
            history: RunHistory::default(),
            catalog,
        }
    }

    /// Initial state seeded from configuration defaults.
    pub fn from_config(catalog: ModelCatalog, config: &RelayConfig) -> Self {
        Self {
            profile_name: config.default_profile_name.clone(),
            weights: PriorityWeights::new(
                config.default_cost_weight,
                config.default_latency_weight,
                config.default_quality_weight,
            ),
            manual_model: None,
            token_budget: TokenBudget {
                input_tokens: None,
                max_tokens: config.default_max_tokens,
            },
            history: RunHistory::new(config.history_capacity),
            catalog,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Current settings as they would be exported.
    pub fn settings(&self) -> RoutingSettings {
        RoutingSettings::new(self.profile_name.clone(), self.weights)
    }

    /// Apply `command`, returning the resulting state.
    pub fn apply(&self, command: Command) -> Result<AppState, RelayError> {
        let mut next = self.clone();
        match command {
            Command::SetWeights(weights) => {
                if !weights.is_finite() {
                    return Err(RelayError::InvalidInput(
                        "weights must be finite numbers".into(),
                    ));
                }
                next.weights = weights;
            }
            Command::SetProfileName(name) => {
                next.profile_name = name;
            }
            Command::SelectModel(None) => {
                next.manual_model = None;
            }
            Command::SelectModel(Some(input)) => {
                let model = self.catalog.resolve(&input).ok_or_else(|| {
                    RelayError::InvalidInput(format!("unknown model: {input}"))
                })?;
                next.manual_model = Some(model.id.clone());
            }
            Command::SetTokenBudget(budget) => {
                next.token_budget = budget;
            }
            Command::ImportSettings(raw) => {
                let patch = parse_settings(&raw)?;
                if let Some(priority) = patch.priority {
                    next.weights = priority;
                }
                if let Some(name) = patch.name {
                    next.profile_name = name;
                }
            }
            Command::RecordRun(record) => {
                next.history.push(record);
            }
            Command::ClearHistory => {
                next.history.clear();
            }
        }
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
