use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// Tokens are stateless: validity depends only on the signature and these
/// timestamps. Timestamps are RFC 7519 NumericDates with millisecond
/// resolution, so `exp` may carry a fractional part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at
    #[serde(with = "numeric_date")]
    pub iat: DateTime<Utc>,

    /// Not before
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "numeric_date::option"
    )]
    pub nbf: Option<DateTime<Utc>>,

    /// Expiration time
    #[serde(with = "numeric_date")]
    pub exp: DateTime<Utc>,
}

impl TokenClaims {
    /// Create claims valid from `issued_at` until `expires_at`.
    pub fn new(sub: impl ToString, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: sub.to_string(),
            iat: issued_at,
            nbf: Some(issued_at),
            exp: expires_at,
        }
    }

    /// Check if token is expired. A token is still valid at exactly `exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.exp
    }

    /// Check if token is used before its `nbf` time.
    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        self.nbf.is_some_and(|nbf| now < nbf)
    }
}

/// Serde adapter for NumericDate values with millisecond resolution.
pub(crate) mod numeric_date {
    use chrono::DateTime;
    use chrono::Utc;
    use serde::de::Error;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = value.timestamp_millis();
        if millis % 1000 == 0 {
            serializer.serialize_i64(millis / 1000)
        } else {
            serializer.serialize_f64(millis as f64 / 1000.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        from_seconds(seconds).ok_or_else(|| D::Error::custom("NumericDate out of range"))
    }

    fn from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
        if !seconds.is_finite() {
            return None;
        }

        let millis = (seconds * 1000.0).round();
        if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
            return None;
        }

        DateTime::from_timestamp_millis(millis as i64)
    }

    pub mod option {
        use chrono::DateTime;
        use chrono::Utc;
        use serde::Deserialize;
        use serde::Deserializer;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] DateTime<Utc>);

            Option::<Wrapper>::deserialize(deserializer).map(|value| value.map(|Wrapper(date)| date))
        }
    }
}
