use crate::agent::AgentId;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while setting up a generation.
///
/// Ticking never fails; these only surface from construction.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A configuration value is out of range or inconsistent with another.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An agent's id does not refer to any supplied policy.
    #[error("{0} has no policy bound")]
    UnboundAgent(AgentId),

    /// Two agents share an id and would drive the same policy.
    #[error("{0} is bound to more than one agent")]
    DuplicateBinding(AgentId),
}
