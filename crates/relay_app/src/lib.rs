pub mod history;
pub mod interrupt;
pub mod repl;
pub mod session;
pub mod settings;
pub mod state;
pub mod view;

pub use history::{RunHistory, RunRecord, UsageSummary};
pub use interrupt::{Interrupt, Interrupts};
pub use session::{RunPlan, Session};
pub use settings::{RoutingSettings, SettingsPatch};
pub use state::{AppState, Command, TokenBudget};
