pub mod capability;
pub mod catalog;
pub mod error;
pub mod estimate;
pub mod routing;
pub mod simulator;
pub mod types;

// Re-export core types at crate root for convenience.
pub use capability::{
    Clock, FixedClock, FixedRandom, RandomSource, SeededRandom, SequenceRandom, SystemClock,
    ThreadRandom,
};
pub use catalog::ModelCatalog;
pub use error::{RoutingError, SimulationError};
pub use estimate::{estimate, estimate_tokens};
pub use routing::{ModelRouter, RoutingDecision};
pub use simulator::{
    CancelHandle, CancelToken, PromptRunner, RunOutput, RunRequest, SimulatedRunner, cancel_pair,
};
pub use types::*;
