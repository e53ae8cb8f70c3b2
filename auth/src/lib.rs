//! Authentication utilities library
//!
//! Provides the credential and token lifecycle shared by the services:
//! - Password hashing (Argon2id, PHC string encoding)
//! - Access token issuance and verification (HS256)
//! - Bearer `Authorization` header contract
//! - Authentication coordination
//!
//! Nothing here performs I/O. Looking up and persisting credentials is the
//! job of each service's own storage port.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashParameters, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashParameters::default()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", hash.as_str()));
//! assert!(!hasher.verify("other_password", hash.as_str()));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{SigningSecret, TokenIssuer, TokenVerifier};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(&secret);
//! let verifier = TokenVerifier::new(&secret);
//!
//! let subject = Uuid::new_v4();
//! let token = issuer.issue(subject, Duration::minutes(30)).unwrap();
//! assert_eq!(verifier.verify(&token.access_token).unwrap(), subject);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashParameters, SigningSecret};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, HashParameters::default()).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let user_id = Uuid::new_v4();
//! auth.verify_credentials("password123", Some(&hash)).unwrap();
//! let token = auth.issue_token(user_id, Duration::hours(1)).unwrap();
//!
//! // Every later request: check the Authorization header
//! let header = format!("Bearer {}", token.access_token);
//! assert_eq!(auth.authorize(Some(&header)).unwrap(), user_id);
//! ```

pub mod authenticator;
pub mod bearer;
pub mod errors;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use bearer::AuthRejection;
pub use errors::ConfigurationError;
pub use jwt::IssuedToken;
pub use jwt::SigningSecret;
pub use jwt::TokenClaims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use password::EncodedHash;
pub use password::HashParameters;
pub use password::PasswordError;
pub use password::PasswordHasher;
