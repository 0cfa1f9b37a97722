//! Simulated prompt execution.
//!
//! No provider is contacted. A run waits for the estimated latency, then
//! fabricates a token count, a cost and a canned response. The wait races a
//! [`CancelToken`] so callers can abandon a run cleanly.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::capability::RandomSource;
use crate::error::SimulationError;
use crate::estimate::cost_for_tokens;
use crate::types::{Estimate, ModelProfile};

/// Spread of the simulated actual token count around the estimate
/// (`0.85..1.15` of the estimated tokens).
const ACTUAL_TOKENS_MIN_FACTOR: f64 = 0.85;
const ACTUAL_TOKENS_SPREAD: f64 = 0.3;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Sender half: cancels every token cloned from the same pair.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiver half, handed to a runner.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Keep the value readable after the sender is gone.
        drop(tx);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the paired handle cancels. Pends forever if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let sender_gone = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if sender_gone {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a linked cancel handle and token.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything a runner needs to execute one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub prompt: String,
    pub model: ModelProfile,
    pub estimate: Estimate,
}

/// Result of one simulated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub actual_tokens: u32,
    pub actual_cost: f64,
    pub response: String,
    /// How long the runner waited before answering.
    pub waited_ms: u64,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Executes a prompt against a model.
#[async_trait]
pub trait PromptRunner: Send + Sync {
    async fn run(
        &self,
        request: &RunRequest,
        cancel: CancelToken,
    ) -> Result<RunOutput, SimulationError>;
}

// ---------------------------------------------------------------------------
// SimulatedRunner
// ---------------------------------------------------------------------------

/// Sleeps for the estimated latency and fabricates a response.
pub struct SimulatedRunner {
    rng: Mutex<Box<dyn RandomSource>>,
    simulate_delay: bool,
}

impl SimulatedRunner {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self {
            rng: Mutex::new(rng),
            simulate_delay: true,
        }
    }

    /// Skip the artificial wait (tests, scripted sessions).
    pub fn without_delay(mut self) -> Self {
        self.simulate_delay = false;
        self
    }

    pub fn simulates_delay(&self) -> bool {
        self.simulate_delay
    }

    fn fabricate(&self, request: &RunRequest, waited_ms: u64) -> RunOutput {
        let sample = self.rng.lock().next_unit();
        let factor = ACTUAL_TOKENS_MIN_FACTOR + ACTUAL_TOKENS_SPREAD * sample;
        let actual_tokens = ((request.estimate.tokens as f64 * factor).round() as u32).max(1);

        RunOutput {
            actual_tokens,
            actual_cost: cost_for_tokens(&request.model, actual_tokens),
            response: canned_response(&request.model, &request.prompt),
            waited_ms,
        }
    }
}

#[async_trait]
impl PromptRunner for SimulatedRunner {
    async fn run(
        &self,
        request: &RunRequest,
        mut cancel: CancelToken,
    ) -> Result<RunOutput, SimulationError> {
        if cancel.is_cancelled() {
            return Err(SimulationError::Cancelled);
        }

        let waited_ms = if self.simulate_delay {
            request.estimate.latency_ms
        } else {
            0
        };

        if waited_ms > 0 {
            debug!(model = %request.model.id, waited_ms, "Simulating model latency");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(waited_ms)) => {}
                _ = cancel.cancelled() => {
                    info!(model = %request.model.id, "Simulated run cancelled");
                    return Err(SimulationError::Cancelled);
                }
            }
        }

        Ok(self.fabricate(request, waited_ms))
    }
}

fn canned_response(model: &ModelProfile, prompt: &str) -> String {
    let topic: String = prompt.split_whitespace().take(8).collect::<Vec<_>>().join(" ");
    format!(
        "[{}] Simulated answer about \"{}\". No provider was contacted; this text stands in \
         for a real completion so routing and cost estimates can be compared.",
        model.name, topic
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
