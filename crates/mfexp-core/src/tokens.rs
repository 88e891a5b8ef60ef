//! OAuth2 token types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An access token for authenticated API requests.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// An OAuth2 token as issued by the provider.
///
/// Only `access_token` is required. Every other field the provider sends is
/// kept, including unknown ones, so a token written to disk reads back
/// unchanged. Expiry fields are read from integers, floats or numeric
/// strings; a value that is none of these stays in `extra` and the token
/// counts as having no expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawToken")]
pub struct Token {
    pub access_token: AccessToken,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Granted scopes. Providers send either a space separated string or a
    /// list, so the raw value is kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Unix time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token as it arrives on the wire, before expiry fields are interpreted.
#[derive(Deserialize)]
struct RawToken {
    access_token: AccessToken,
    #[serde(default)]
    refresh_token: Option<RefreshToken>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<Value>,
    #[serde(default)]
    expires_in: Option<Value>,
    #[serde(default)]
    expires_at: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        let mut extra = raw.extra;

        let mut numeric = |key: &str, value: Option<Value>| -> Option<f64> {
            let value = value?;
            let number = match &value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|n| n.is_finite());

            if number.is_none() {
                extra.insert(key.to_string(), value);
            }
            number
        };

        let expires_in = numeric("expires_in", raw.expires_in).map(|n| n.trunc() as i64);
        let expires_at = numeric("expires_at", raw.expires_at);

        Self {
            access_token: raw.access_token,
            refresh_token: raw.refresh_token,
            token_type: raw.token_type,
            scope: raw.scope,
            expires_in,
            expires_at,
            extra,
        }
    }
}

impl Token {
    /// Create a bearer token with no expiry information.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            refresh_token: refresh_token.map(RefreshToken::new),
            token_type: Some("Bearer".to_string()),
            scope: None,
            expires_in: None,
            expires_at: None,
            extra: Map::new(),
        }
    }

    /// Fill in `expires_at` from `expires_in` relative to `now`, unless the
    /// provider already supplied it.
    pub fn stamp_expiry(&mut self, now: DateTime<Utc>) {
        if self.expires_at.is_none()
            && let Some(expires_in) = self.expires_in
        {
            self.expires_at = Some((now.timestamp() + expires_in) as f64);
        }
    }

    /// The authorization scheme, defaulting to `Bearer`.
    pub fn scheme(&self) -> &str {
        match self.token_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("bearer") => "Bearer",
            Some(t) if !t.is_empty() => t,
            _ => "Bearer",
        }
    }

    /// Expiry as a UTC timestamp, if known.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        let secs = self.expires_at?;
        DateTime::from_timestamp(secs.trunc() as i64, 0)
    }

    /// True if the token carries an expiry that lies before `now`.
    ///
    /// Tokens without expiry information never count as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|secs| secs < now.timestamp() as f64)
    }

    /// Scopes rendered as a space separated string.
    pub fn scope_string(&self) -> Option<String> {
        match self.scope.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn access_token_hides_value_in_debug() {
        let token = AccessToken::new("a1b2c3d4e5f6");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("a1b2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn token_debug_hides_both_secrets() {
        let token = Token::new("access-value", Some("refresh-value".to_string()));
        let debug = format!("{:?}", token);
        assert!(!debug.contains("access-value"));
        assert!(!debug.contains("refresh-value"));
    }

    #[test]
    fn provider_fields_survive_round_trip() {
        let raw = json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "token_type": "bearer",
            "scope": ["transaction:write", "report:write"],
            "expires_in": 3600,
            "expires_at": 1734000000.5,
            "created_at": 1733996400
        });

        let token: Token = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(token.access_token.as_str(), "A1");
        assert_eq!(token.extra["created_at"], json!(1733996400));
        assert_eq!(serde_json::to_value(&token).unwrap(), raw);
    }

    #[test]
    fn expiry_accepts_strings_and_floats() {
        let token: Token = serde_json::from_value(json!({
            "access_token": "A1",
            "expires_in": "7200",
            "expires_at": " 1734000000.5 "
        }))
        .unwrap();
        assert_eq!(token.expires_in, Some(7200));
        assert_eq!(token.expires_at, Some(1734000000.5));

        let token: Token = serde_json::from_value(json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "expires_in": 7199.5
        }))
        .unwrap();
        assert_eq!(token.expires_in, Some(7199));
        assert!(token.extra.is_empty());
    }

    #[test]
    fn unreadable_expiry_is_kept_but_ignored() {
        let token: Token = serde_json::from_value(json!({
            "access_token": "A1",
            "expires_in": "two hours",
            "expires_at": {"seconds": 5}
        }))
        .unwrap();

        assert!(token.expires_in.is_none());
        assert!(token.expires_at.is_none());
        assert_eq!(token.extra["expires_in"], json!("two hours"));
        assert_eq!(token.extra["expires_at"], json!({"seconds": 5}));
        assert!(!token.is_expired_at(Utc::now()));

        // Written back, the raw values are preserved.
        let written = serde_json::to_value(&token).unwrap();
        assert_eq!(written["expires_in"], json!("two hours"));
        let reread: Token = serde_json::from_value(written).unwrap();
        assert_eq!(reread, token);
    }

    #[test]
    fn null_expiry_means_none() {
        let token: Token = serde_json::from_value(json!({
            "access_token": "A1",
            "expires_in": null
        }))
        .unwrap();
        assert!(token.expires_in.is_none());
        assert!(token.extra.is_empty());
    }

    #[test]
    fn missing_refresh_token_is_accepted() {
        let token: Token = serde_json::from_value(json!({"access_token": "A1"})).unwrap();
        assert!(token.refresh_token.is_none());
        assert_eq!(token.scheme(), "Bearer");
    }

    #[test]
    fn stamp_expiry_uses_expires_in() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();
        let mut token = Token::new("A1", None);
        token.expires_in = Some(60);
        token.stamp_expiry(now);
        assert_eq!(token.expires_at, Some(1_060.0));

        // Provider-supplied expiry wins.
        token.expires_in = Some(5);
        token.stamp_expiry(now);
        assert_eq!(token.expires_at, Some(1_060.0));
    }

    #[test]
    fn expiry_check() {
        let mut token = Token::new("A1", None);
        let now = DateTime::from_timestamp(2_000, 0).unwrap();
        assert!(!token.is_expired_at(now));

        token.expires_at = Some(1_999.0);
        assert!(token.is_expired_at(now));

        token.expires_at = Some(2_001.0);
        assert!(!token.is_expired_at(now));
    }

    #[test]
    fn scope_string_joins_lists() {
        let mut token = Token::new("A1", None);
        token.scope = Some(json!(["a:read", "b:write"]));
        assert_eq!(token.scope_string().as_deref(), Some("a:read b:write"));

        token.scope = Some(json!("a:read b:write"));
        assert_eq!(token.scope_string().as_deref(), Some("a:read b:write"));
    }
}
