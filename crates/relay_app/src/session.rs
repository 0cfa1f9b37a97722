//! Session: the command-driven owner of [`AppState`].
//!
//! All state changes go through [`Session::dispatch`], which applies a
//! [`Command`] under the write lock. Prompt runs take a snapshot, release
//! the lock for the simulated wait, and record the result as one more
//! dispatched command, so concurrent runs never lose a history entry.

use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use relay_ai::{
    CancelToken, Clock, Estimate, ModelCatalog, ModelRouter, PriorityWeights, PromptRunner,
    RandomSource, RoutingDecision, RunRequest, SeededRandom, SimulatedRunner, SystemClock,
    ThreadRandom, estimate, estimate_tokens,
};
use relay_core::{AppNotification, NotificationStore, RelayConfig, RelayError};

use crate::history::{RunRecord, truncate_prompt};
use crate::state::{AppState, Command};

/// A routed, estimated prompt that has not run yet.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub decision: RoutingDecision,
    pub estimate: Estimate,
    pub input_tokens: u32,
    pub weights: PriorityWeights,
}

impl RunPlan {
    fn into_request(self, prompt: &str) -> RunRequest {
        RunRequest {
            prompt: prompt.to_string(),
            model: self.decision.model,
            estimate: self.estimate,
        }
    }
}

pub struct Session {
    router: ModelRouter,
    runner: Arc<dyn PromptRunner>,
    clock: Arc<dyn Clock>,
    /// Drives latency jitter in estimates.
    rng: Mutex<Box<dyn RandomSource>>,
    config: RelayConfig,
    state: RwLock<AppState>,
    notifications: Mutex<NotificationStore>,
}

impl Session {
    pub fn new(
        config: RelayConfig,
        catalog: ModelCatalog,
        runner: Arc<dyn PromptRunner>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let state = AppState::from_config(catalog.clone(), &config);
        Self {
            router: ModelRouter::new(catalog),
            runner,
            clock,
            rng: Mutex::new(rng),
            config,
            state: RwLock::new(state),
            notifications: Mutex::new(NotificationStore::new()),
        }
    }

    /// Session over the built-in catalog with a [`SimulatedRunner`].
    ///
    /// With a seed, estimate jitter and simulated token counts are
    /// reproducible.
    pub fn simulated(config: RelayConfig, seed: Option<u64>) -> Self {
        let (estimate_rng, runner_rng): (Box<dyn RandomSource>, Box<dyn RandomSource>) =
            match seed {
                Some(seed) => (
                    Box::new(SeededRandom::new(seed)),
                    Box::new(SeededRandom::new(seed.wrapping_add(1))),
                ),
                None => (Box::new(ThreadRandom), Box::new(ThreadRandom)),
            };

        let mut runner = SimulatedRunner::new(runner_rng);
        if !config.simulate_delay {
            runner = runner.without_delay();
        }

        Self::new(
            config,
            ModelCatalog::builtin(),
            Arc::new(runner),
            Arc::new(SystemClock),
            estimate_rng,
        )
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        self.router.catalog()
    }

    /// Clone of the current state.
    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    /// Apply `command` atomically. On error the state is left as it was.
    pub fn dispatch(&self, command: Command) -> Result<AppState, RelayError> {
        let name = command.name();
        let mut state = self.state.write();
        let next = state.apply(command)?;
        *state = next.clone();
        debug!(command = name, "State updated");
        Ok(next)
    }

    /// Pin `model` (or return to automatic routing with `None`). An unknown
    /// model raises a warning notification and leaves the state as it was.
    pub fn select_model(&self, model: Option<String>) -> Result<AppState, RelayError> {
        self.dispatch(Command::SelectModel(model)).inspect_err(|e| {
            warn!("Model selection rejected: {e}");
            self.notify(AppNotification::warning(e.user_message()).with_title("Model"));
        })
    }

    // -- Routing and estimation ---------------------------------------------

    /// Route under the current weights and manual pick.
    pub fn route(&self) -> Result<RoutingDecision, RelayError> {
        let state = self.state.read();
        let decision = self
            .router
            .route(&state.weights, state.manual_model.as_deref())?;
        Ok(decision)
    }

    /// Route and estimate `prompt` without running it. Input tokens come
    /// from the token budget when set, otherwise from the prompt text.
    pub fn plan(&self, prompt: &str) -> Result<RunPlan, RelayError> {
        let (weights, manual, budget) = {
            let state = self.state.read();
            (state.weights, state.manual_model.clone(), state.token_budget)
        };

        let decision = self.router.route(&weights, manual.as_deref())?;
        let input_tokens = budget
            .input_tokens
            .unwrap_or_else(|| estimate_tokens(prompt));

        let estimate = {
            let mut rng = self.rng.lock();
            estimate(&decision.model, input_tokens, budget.max_tokens, &mut **rng)
        };

        Ok(RunPlan {
            decision,
            estimate,
            input_tokens,
            weights,
        })
    }

    /// Route, wait for the runner and record the run.
    ///
    /// Nothing is recorded when the run is cancelled.
    pub async fn run_prompt(
        &self,
        prompt: &str,
        cancel: CancelToken,
    ) -> Result<RunRecord, RelayError> {
        if prompt.trim().is_empty() {
            return Err(RelayError::InvalidInput("Prompt is empty.".into()));
        }

        let plan = self.plan(prompt)?;
        let weights = plan.weights;
        let manual = plan.decision.manual;
        let request = plan.into_request(prompt);

        info!(
            model = %request.model.id,
            manual,
            tokens = request.estimate.tokens,
            "Running prompt"
        );

        let output = match self.runner.run(&request, cancel).await {
            Ok(output) => output,
            Err(e) => {
                info!(model = %request.model.id, "Run did not complete: {e}");
                return Err(e.into());
            }
        };

        let record = RunRecord {
            id: uuid::Uuid::new_v4().to_string(),
            prompt_preview: truncate_prompt(prompt, self.config.prompt_preview_chars),
            model_id: request.model.id.clone(),
            model_name: request.model.name.clone(),
            estimate: request.estimate,
            actual_tokens: output.actual_tokens,
            actual_cost: output.actual_cost,
            timestamp: self.clock.now(),
            weights,
            manual,
            response: output.response,
        };

        self.dispatch(Command::RecordRun(record.clone()))?;
        Ok(record)
    }

    // -- Settings -----------------------------------------------------------

    /// Write the current settings into `dir`, or the configured export
    /// directory when `None`.
    pub fn export_settings(&self, dir: Option<&Path>) -> Result<PathBuf, RelayError> {
        let settings = self.state.read().settings();
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export_dir_or_cwd());

        match settings.write_to_dir(&dir) {
            Ok(path) => {
                self.notify(AppNotification::success(format!(
                    "Exported settings to {}",
                    path.display()
                )));
                Ok(path)
            }
            Err(e) => {
                warn!("Settings export failed: {e}");
                self.notify(AppNotification::error(e.user_message()).with_title("Export"));
                Err(e)
            }
        }
    }

    /// Import settings from raw JSON text. Failures are surfaced as an
    /// error notification and leave the state untouched.
    pub fn import_settings_str(&self, raw: &str) -> Result<AppState, RelayError> {
        match self.dispatch(Command::ImportSettings(raw.to_string())) {
            Ok(state) => {
                info!(name = %state.profile_name, "Imported settings");
                self.notify(AppNotification::success(format!(
                    "Imported settings \"{}\" ({})",
                    state.profile_name, state.weights
                )));
                Ok(state)
            }
            Err(e) => {
                warn!("Settings import rejected: {e}");
                self.notify(AppNotification::error(e.user_message()).with_title("Import"));
                Err(e)
            }
        }
    }

    /// Read `path` and import it.
    pub fn import_settings_file(&self, path: &Path) -> Result<AppState, RelayError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), "Cannot read settings file: {e}");
                let err = RelayError::from(e);
                self.notify(AppNotification::error(err.user_message()).with_title("Import"));
                return Err(err);
            }
        };
        self.import_settings_str(&raw)
    }

    // -- Notifications ------------------------------------------------------

    pub fn notify(&self, notification: AppNotification) {
        self.notifications.lock().push(notification);
    }

    /// Unread notifications, oldest first. Marks them read.
    pub fn drain_notifications(&self) -> Vec<AppNotification> {
        self.notifications.lock().drain_unread()
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.lock().unread_count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
