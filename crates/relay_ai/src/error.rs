use relay_core::RelayError;

/// Errors raised while building a catalog or routing against it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    #[error("model catalog is empty")]
    EmptyCatalog,

    #[error("duplicate model id: {0}")]
    DuplicateModel(String),

    #[error("invalid model {id}: {reason}")]
    InvalidModel { id: String, reason: String },

    #[error("unknown model: {0}")]
    UnknownModel(String),
}

/// Errors raised by a prompt runner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("run cancelled")]
    Cancelled,
}

impl From<RoutingError> for RelayError {
    fn from(err: RoutingError) -> Self {
        RelayError::Routing(err.to_string())
    }
}

impl From<SimulationError> for RelayError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Cancelled => RelayError::Cancelled,
        }
    }
}
