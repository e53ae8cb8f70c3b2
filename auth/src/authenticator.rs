use chrono::Duration;
use uuid::Uuid;

use crate::bearer;
use crate::bearer::AuthRejection;
use crate::errors::ConfigurationError;
use crate::jwt::IssuedToken;
use crate::jwt::SigningSecret;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::password::EncodedHash;
use crate::password::HashParameters;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Plaintext behind the placeholder hash checked for unknown identifiers.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-identifiers";

/// Authentication coordinator combining password verification and token handling.
///
/// Built once at startup from configuration and shared through `Arc`; every
/// component it owns is immutable.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_verifier: TokenVerifier,
    dummy_hash: EncodedHash,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    /// * `parameters` - Argon2id parameters for new password hashes
    ///
    /// The placeholder hash for unknown identifiers is computed here, with the
    /// same parameters as real credentials.
    ///
    /// # Errors
    /// * `InvalidHashParameters` - Parameters rejected
    /// * `PlaceholderHashFailed` - Placeholder hash could not be computed
    pub fn new(
        secret: &SigningSecret,
        parameters: HashParameters,
    ) -> Result<Self, ConfigurationError> {
        let password_hasher = PasswordHasher::new(parameters)?;
        let dummy_hash = password_hasher
            .hash(DUMMY_PASSWORD)
            .map_err(|e| ConfigurationError::PlaceholderHashFailed(e.to_string()))?;

        Ok(Self {
            password_hasher,
            token_issuer: TokenIssuer::new(secret),
            token_verifier: TokenVerifier::new(secret),
            dummy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<EncodedHash, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Whether a stored hash should be upgraded to the current parameters.
    pub fn needs_rehash(&self, stored_hash: &EncodedHash) -> bool {
        self.password_hasher.needs_rehash(stored_hash.as_str())
    }

    /// Check a password against the stored credential of an account.
    ///
    /// `None` means no account matched the identifier. The password is then
    /// checked against a placeholder hash anyway, so that an unknown account
    /// costs the same time as a wrong password and both fail identically.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown account or wrong password
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: Option<&EncodedHash>,
    ) -> Result<(), AuthenticationError> {
        let matches = match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash.as_str()),
            None => {
                let _ = self
                    .password_hasher
                    .verify(password, self.dummy_hash.as_str());
                false
            }
        };

        if matches {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue an access token for an authenticated subject.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: Uuid, ttl: Duration) -> Result<IssuedToken, AuthenticationError> {
        Ok(self.token_issuer.issue(subject, ttl)?)
    }

    /// Validate a token and return its subject.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, TokenError> {
        self.token_verifier.verify(token)
    }

    /// Authenticate a request from its raw `Authorization` header value.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<Uuid, AuthRejection> {
        bearer::authenticate(authorization, &self.token_verifier)
    }
}
