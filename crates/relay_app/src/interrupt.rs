//! Ctrl-C routing for the interactive session.
//!
//! One process-wide listener feeds [`Interrupts::interrupt`]. While a run is
//! in flight the interrupt cancels it; otherwise it asks the session to quit.

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::info;

use relay_ai::{CancelHandle, CancelToken, cancel_pair};

/// What an interrupt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    CancelledRun,
    Quit,
}

#[derive(Default)]
pub struct Interrupts {
    active_run: Mutex<Option<CancelHandle>>,
    quit: Notify,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a run. The returned guard unregisters it when dropped.
    pub fn begin_run(&self) -> (RunGuard<'_>, CancelToken) {
        let (handle, token) = cancel_pair();
        *self.active_run.lock() = Some(handle);
        (RunGuard { owner: self }, token)
    }

    pub fn run_active(&self) -> bool {
        self.active_run.lock().is_some()
    }

    /// Handle one Ctrl-C.
    pub fn interrupt(&self) -> Interrupt {
        match self.active_run.lock().take() {
            Some(handle) => {
                handle.cancel();
                info!("Interrupt cancelled the active run");
                Interrupt::CancelledRun
            }
            None => {
                info!("Interrupt at prompt, quitting");
                self.quit.notify_one();
                Interrupt::Quit
            }
        }
    }

    /// Resolves once an interrupt arrives with no run in flight. An
    /// interrupt that arrived earlier is not lost.
    pub async fn quit_requested(&self) {
        self.quit.notified().await;
    }

    /// Forward process Ctrl-C signals here for the life of the process.
    pub fn listen(self: &std::sync::Arc<Self>) {
        let interrupts = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                interrupts.interrupt();
            }
        });
    }
}

/// Keeps a run registered with [`Interrupts`] while alive.
pub struct RunGuard<'a> {
    owner: &'a Interrupts,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.owner.active_run.lock().take();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
