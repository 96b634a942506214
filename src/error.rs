//! Error types for the configuration system.

use thiserror::Error;

/// Errors surfaced to embedding application code.
///
/// Malformed override values are never errors; they degrade to the documented
/// coercion fallbacks. Only programmer errors (reading configuration before
/// initializing it) are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration was accessed before `setup_environment` completed.
    #[error("configuration not initialized; call setup_environment() before get_config()")]
    NotInitialized,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
