use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error (a malformed stored hash simply does
/// not match), so the only runtime failure is hashing itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
