use std::fmt;

use secrecy::ExposeSecret;
use secrecy::SecretSlice;

use crate::errors::ConfigurationError;

/// HMAC key shared by the token issuer and verifier.
///
/// Loaded once at startup and never rotated while the process runs. The bytes
/// are zeroized on drop and never appear in `Debug` output.
pub struct SigningSecret(SecretSlice<u8>);

impl SigningSecret {
    /// Wrap the signing secret.
    ///
    /// # Errors
    /// * `EmptySigningSecret` - Secret has no bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigurationError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigurationError::EmptySigningSecret);
        }

        Ok(Self(SecretSlice::from(secret)))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}
