use thiserror::Error;
use uuid::Uuid;

use crate::jwt::TokenError;
use crate::jwt::TokenVerifier;

/// Authorization scheme accepted in the `Authorization` header (case-sensitive).
pub const BEARER_SCHEME: &str = "Bearer";

/// Why a request was refused before reaching its handler.
///
/// The `Display` output is the only text that may be sent back to the
/// client. Token failures share one message; the underlying [`TokenError`] is
/// kept for server-side logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("invalid authorization format")]
    InvalidFormat,

    #[error("missing token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken(TokenError),
}

impl AuthRejection {
    /// Internal verification failure, if the token itself was rejected.
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            AuthRejection::InvalidToken(e) => Some(e),
            _ => None,
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: two parts separated by a single
/// space, with the scheme spelled exactly as [`BEARER_SCHEME`].
///
/// # Errors
/// * `MissingHeader` - No header value
/// * `InvalidFormat` - Wrong scheme or not exactly two parts
/// * `MissingToken` - Scheme present but token part empty
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingHeader)?;

    let mut parts = header.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthRejection::InvalidFormat);
    };

    if scheme != BEARER_SCHEME {
        return Err(AuthRejection::InvalidFormat);
    }

    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }

    Ok(token)
}

/// Authenticate a request from its `Authorization` header value.
///
/// Performs no I/O and knows nothing about account status; it only answers
/// whether the presented token is valid and whose it is.
///
/// # Returns
/// Subject of the verified token
pub fn authenticate(header: Option<&str>, verifier: &TokenVerifier) -> Result<Uuid, AuthRejection> {
    let token = extract_bearer_token(header)?;

    verifier.verify(token).map_err(AuthRejection::InvalidToken)
}
