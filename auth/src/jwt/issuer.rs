use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use uuid::Uuid;

use super::claims::TokenClaims;
use super::errors::TokenError;
use super::secret::SigningSecret;

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact `header.payload.signature` token
    pub access_token: String,

    /// Moment after which the token is rejected
    pub expires_at: DateTime<Utc>,
}

/// Issues HS256-signed access tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    header: Header,
}

impl TokenIssuer {
    /// Create a token issuer bound to the signing secret.
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            header: Header::new(Algorithm::HS256),
        }
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    ///
    /// A zero or negative `ttl` produces a token that is already expired.
    ///
    /// # Errors
    /// * `EncodingFailed` - Lifetime overflows the calendar or signing failed
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: Uuid,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        // Claims only carry millisecond resolution.
        let issued_at = now.trunc_subsecs(3);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::EncodingFailed("token lifetime out of range".to_string()))?;

        let claims = TokenClaims::new(subject, issued_at, expires_at);

        let access_token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SigningSecret::new("my_secret_key_at_least_32_bytes_long!").unwrap())
    }

    fn decode_segment(segment: &str) -> serde_json::Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
    }

    #[test]
    fn test_token_shape() {
        let token = issuer()
            .issue(Uuid::new_v4(), Duration::minutes(15))
            .expect("Failed to issue token");

        let segments: Vec<&str> = token.access_token.split('.').collect();
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|segment| !segment.is_empty()));
        assert!(token
            .access_token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));

        let header = decode_segment(segments[0]);
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_claims_content() {
        let subject = Uuid::new_v4();
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();

        let token = issuer()
            .issue_at(subject, Duration::hours(2), now)
            .expect("Failed to issue token");

        let payload = decode_segment(token.access_token.split('.').nth(1).unwrap());
        assert_eq!(payload["sub"], subject.to_string());
        assert_eq!(payload["iat"], 1_700_000_000);
        assert_eq!(payload["nbf"], 1_700_000_000);
        assert_eq!(payload["exp"], 1_700_007_200);
        assert_eq!(token.expires_at, now + Duration::hours(2));
    }

    #[test]
    fn test_negative_ttl_is_not_an_error() {
        let now = Utc::now();
        let token = issuer()
            .issue_at(Uuid::new_v4(), Duration::seconds(-30), now)
            .expect("Negative ttl must still issue");

        assert!(token.expires_at < now);
    }

    #[test]
    fn test_lifetime_overflow() {
        let result = issuer().issue(Uuid::new_v4(), Duration::MAX);
        assert!(matches!(result, Err(TokenError::EncodingFailed(_))));
    }
}
