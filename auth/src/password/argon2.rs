use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use argon2::ARGON2ID_IDENT;

use super::errors::PasswordError;
use super::params::HashParameters;
use crate::errors::ConfigurationError;

/// A stored password credential in PHC string format.
///
/// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`
///
/// The value is opaque to callers and deliberately has no `Display`
/// implementation; its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash(String);

impl EncodedHash {
    /// Wrap a hash previously produced by [`PasswordHasher::hash`] and loaded
    /// back from storage.
    pub fn from_stored(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodedHash([REDACTED])")
    }
}

/// Password hashing implementation.
///
/// Argon2id (v0x13) with fixed, process-wide cost parameters. Build one at
/// startup and share it; it holds no mutable state.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    parameters: HashParameters,
}

impl PasswordHasher {
    /// Create a new password hasher.
    ///
    /// # Arguments
    /// * `parameters` - Cost parameters applied to every new hash
    ///
    /// # Errors
    /// * `InvalidHashParameters` - Parameters rejected by Argon2 or salt length out of range
    pub fn new(parameters: HashParameters) -> Result<Self, ConfigurationError> {
        let params = parameters.to_argon2_params()?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            parameters,
        })
    }

    /// Parameters used for new hashes.
    pub fn parameters(&self) -> &HashParameters {
        &self.parameters
    }

    /// Hash a plaintext password securely.
    ///
    /// Every call draws a fresh salt from the OS random number generator, so
    /// hashing the same password twice yields two different encodings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Randomness or key derivation failed
    pub fn hash(&self, password: &str) -> Result<EncodedHash, PasswordError> {
        let mut salt = vec![0u8; self.parameters.salt_length];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::HashingFailed(format!("Salt generation failed: {}", e)))?;

        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| PasswordError::HashingFailed(format!("Salt encoding failed: {}", e)))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| EncodedHash(hash.to_string()))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The key is re-derived with the parameters and salt embedded in
    /// `encoded` (not the current defaults) and compared in constant time.
    /// Anything that is not a well-formed Argon2id PHC string never matches.
    ///
    /// # Arguments
    /// * `password` - Plaintext candidate
    /// * `encoded` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return false;
        };

        if parsed.algorithm != ARGON2ID_IDENT {
            return false;
        }

        // `Output` equality inside verify_password is constant-time.
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Whether a stored hash was produced with other parameters than the
    /// current ones and should be replaced after the next successful login.
    ///
    /// Malformed hashes always need rehashing.
    pub fn needs_rehash(&self, encoded: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return true;
        };

        if parsed.algorithm != ARGON2ID_IDENT || parsed.version != Some(Version::V0x13 as u32) {
            return true;
        }

        let Ok(stored) = Params::try_from(&parsed) else {
            return true;
        };

        let salt_length = parsed.salt.map(|salt| salt.as_str().len());

        stored.m_cost() != self.parameters.memory_kib
            || stored.t_cost() != self.parameters.iterations
            || stored.p_cost() != self.parameters.parallelism
            || stored.output_len() != Some(self.parameters.output_length)
            || salt_length != Some(self.parameters.encoded_salt_length())
    }
}
