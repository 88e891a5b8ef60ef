//! OAuth2 client credentials.

use std::fmt;

/// The redirect URI for the out-of-band flow, where the provider shows the
/// authorization code on a page instead of redirecting.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// The provider's documented OAuth redirect page.
pub const DEFAULT_REDIRECT_URI: &str =
    "https://expense.moneyforward.com/api/oauth2-redirect.html";

/// OAuth2 client registration for the expense API.
///
/// # Security
///
/// The client secret is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use mfexp_core::Credentials;
///
/// let creds = Credentials::new("client-id", "client-secret");
/// assert_eq!(creds.client_id(), "client-id");
/// assert!(!creds.is_out_of_band());
/// ```
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl Credentials {
    /// Create credentials using the provider's default redirect page.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }

    /// Use a different redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    ///
    /// Use this only when constructing token requests.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// True when the out-of-band redirect URI is configured and the user
    /// pastes a bare code instead of a callback URL.
    pub fn is_out_of_band(&self) -> bool {
        self.redirect_uri == OOB_REDIRECT_URI
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hide_secret_in_debug() {
        let creds = Credentials::new("my-client", "s3cr3t");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("my-client"));
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn out_of_band_detection() {
        let creds = Credentials::new("id", "secret");
        assert_eq!(creds.redirect_uri(), DEFAULT_REDIRECT_URI);
        assert!(!creds.is_out_of_band());

        let creds = creds.with_redirect_uri(OOB_REDIRECT_URI);
        assert!(creds.is_out_of_band());
    }
}
