use std::io;

use tokio::task::JoinError;

/// Invalid or unreadable [crate::scenario::DispatchParams].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("delay range `{name}` has min {min_ms} ms greater than max {max_ms} ms")]
    InvalidRange {
        name: &'static str,
        min_ms: u64,
        max_ms: u64,
    },

    #[error("solicitation timeout must be greater than zero")]
    ZeroTimeout,

    #[error("vehicle idle back-off must allow a non-zero delay")]
    ZeroIdleBackoff,

    #[error("failed to parse dispatch params: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read dispatch params: {0}")]
    Io(#[from] io::Error),
}

/// Failures of the harness around the protocol; the protocol itself has none.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build tokio runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("{actor} task failed: {source}")]
    Join {
        actor: &'static str,
        #[source]
        source: JoinError,
    },
}
