//! Error types for robot-sf

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// robot-sf error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration (rejected at construction, nothing partially built)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML settings could not be parsed
    #[error("Settings parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// YAML map definition could not be parsed
    #[error("Map parse error: {0}")]
    MapParse(#[from] serde_yaml::Error),

    /// Rejection sampling ran out of attempts
    #[error("Failed to sample {what} after {attempts} attempts")]
    SpawnFailed {
        /// What was being sampled (robot spawn, goal, ...)
        what: &'static str,
        /// Number of attempts made
        attempts: usize,
    },

    /// `step` called before the first `reset`
    #[error("Environment not initialized: call reset() first")]
    NotInitialized,

    /// `step` called on a terminated episode
    #[error("Episode terminated: call reset() before stepping again")]
    EpisodeTerminated,

    /// Invalid runtime parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
