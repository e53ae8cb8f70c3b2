use argon2::Params;
use serde::Deserialize;

use crate::errors::ConfigurationError;

/// Argon2id cost parameters used for every newly hashed password.
///
/// The parameters are also written into each encoded hash, so changing the
/// defaults never invalidates hashes that already sit in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashParameters {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes over memory
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,

    /// Derived key length in bytes
    pub output_length: usize,

    /// Random salt length in bytes
    pub salt_length: usize,
}

impl HashParameters {
    /// 64 MiB
    pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    pub const DEFAULT_ITERATIONS: u32 = 3;
    pub const DEFAULT_PARALLELISM: u32 = 4;
    pub const DEFAULT_OUTPUT_LENGTH: usize = 32;
    pub const DEFAULT_SALT_LENGTH: usize = 16;

    pub const MIN_SALT_LENGTH: usize = 16;
    /// Largest salt that still fits a 64 character B64 salt string.
    pub const MAX_SALT_LENGTH: usize = 48;

    /// Check the parameters and convert them to Argon2 parameters.
    ///
    /// # Errors
    /// * `InvalidHashParameters` - Salt length out of range or Argon2 rejected the costs
    pub fn to_argon2_params(&self) -> Result<Params, ConfigurationError> {
        if !(Self::MIN_SALT_LENGTH..=Self::MAX_SALT_LENGTH).contains(&self.salt_length) {
            return Err(ConfigurationError::InvalidHashParameters(format!(
                "salt length must be between {} and {} bytes, got {}",
                Self::MIN_SALT_LENGTH,
                Self::MAX_SALT_LENGTH,
                self.salt_length
            )));
        }

        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.output_length),
        )
        .map_err(|e| ConfigurationError::InvalidHashParameters(e.to_string()))
    }

    /// Length of the salt once B64 encoded (unpadded) inside a PHC string.
    pub(crate) fn encoded_salt_length(&self) -> usize {
        (self.salt_length * 4 + 2) / 3
    }
}

impl Default for HashParameters {
    fn default() -> Self {
        Self {
            memory_kib: Self::DEFAULT_MEMORY_KIB,
            iterations: Self::DEFAULT_ITERATIONS,
            parallelism: Self::DEFAULT_PARALLELISM,
            output_length: Self::DEFAULT_OUTPUT_LENGTH,
            salt_length: Self::DEFAULT_SALT_LENGTH,
        }
    }
}
