use thiserror::Error;

/// Startup configuration errors.
///
/// Raised while building the authentication components; a process that hits
/// one of these should refuse to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("JWT signing secret must not be empty")]
    EmptySigningSecret,

    #[error("Invalid password hash parameters: {0}")]
    InvalidHashParameters(String),

    #[error("Failed to compute placeholder password hash: {0}")]
    PlaceholderHashFailed(String),
}
