use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::crypto;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use super::claims::TokenClaims;
use super::errors::TokenError;
use super::secret::SigningSecret;

/// The only accepted `alg` header value.
const EXPECTED_ALGORITHM: &str = "HS256";

#[derive(Deserialize)]
struct TokenHeader {
    alg: String,
}

/// The three parts of a compact token plus the signed prefix.
struct TokenParts<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
    signing_input: &'a str,
}

impl<'a> TokenParts<'a> {
    fn split(token: &'a str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        };

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenError::Malformed("empty token segment".to_string()));
        }

        Ok(Self {
            header,
            payload,
            signature,
            signing_input: &token[..header.len() + 1 + payload.len()],
        })
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("{} is not base64url: {}", name, e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("{} is not valid JSON: {}", name, e)))
}

/// Verifies HS256 access tokens issued by [`TokenIssuer`](super::TokenIssuer).
///
/// Verification is a pure function of the token, the signing secret and the
/// current time; one instance can be shared by any number of request tasks.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    /// Create a verifier bound to the signing secret.
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose()),
        }
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Wrong shape, undecodable segments, or subject is not a UUID
    /// * `SignatureInvalid` - Algorithm is not HS256 or signature does not match
    /// * `Expired` - Current time is past `exp`
    /// * `NotYetValid` - Current time is before `nbf`
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let claims = self.decode_at(token, now)?;

        if claims.sub.is_empty() {
            return Err(TokenError::Malformed("empty subject".to_string()));
        }

        Uuid::parse_str(&claims.sub)
            .map_err(|e| TokenError::Malformed(format!("subject is not a valid id: {}", e)))
    }

    /// Validate a token and return all of its claims.
    ///
    /// Every segment is decoded first, then the algorithm and signature are
    /// checked, and only then the timestamps. Claims are never acted on before
    /// the signature over them has been verified.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let parts = TokenParts::split(token)?;

        let header: TokenHeader = decode_segment(parts.header, "header")?;
        let claims: TokenClaims = decode_segment(parts.payload, "payload")?;
        URL_SAFE_NO_PAD
            .decode(parts.signature)
            .map_err(|e| TokenError::Malformed(format!("signature is not base64url: {}", e)))?;

        if header.alg != EXPECTED_ALGORITHM {
            return Err(TokenError::SignatureInvalid);
        }

        // HMAC verification re-signs the input and compares in constant time.
        let signature_matches = crypto::verify(
            parts.signature,
            parts.signing_input.as_bytes(),
            &self.decoding_key,
            Algorithm::HS256,
        )
        .map_err(|_| TokenError::SignatureInvalid)?;

        if !signature_matches {
            return Err(TokenError::SignatureInvalid);
        }

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        if claims.is_not_yet_valid(now) {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}
