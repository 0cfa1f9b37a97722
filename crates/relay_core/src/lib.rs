pub mod config;
pub mod error;
pub mod logging;
pub mod notifications;

pub use config::{ConfigOrigin, RelayConfig};
pub use error::{ErrorCategory, RelayError};
pub use notifications::{AppNotification, NotificationStore, NotificationType};
