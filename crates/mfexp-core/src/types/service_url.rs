//! Service URL type.

use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the expense API or its OAuth provider.
///
/// Must use HTTPS. Plain HTTP is accepted only for localhost so tests can
/// point the client at a mock server.
///
/// # Example
///
/// ```
/// use mfexp_core::ServiceUrl;
///
/// let api = ServiceUrl::new("https://expense.moneyforward.com/api/external/v1").unwrap();
/// assert_eq!(
///     api.join_path("/offices"),
///     "https://expense.moneyforward.com/api/external/v1/offices"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceUrl(Url);

impl ServiceUrl {
    /// Create a new service URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::Url {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Append an absolute endpoint path (starting with `/`) to the base.
    pub fn join_path(&self, path: &str) -> String {
        // Url keeps a trailing slash on root paths, so trim before joining.
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let reject = |reason: &str| -> Result<(), Error> {
            Err(InvalidInputError::Url {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into())
        };

        let Some(host) = url.host_str().filter(|_| !url.cannot_be_a_base()) else {
            return reject("must be an absolute URL with a host");
        };

        let loopback = matches!(host, "localhost" | "127.0.0.1" | "[::1]");
        match url.scheme() {
            "https" => {}
            "http" if loopback => {}
            _ => return reject("must use HTTPS (HTTP allowed only for localhost)"),
        }

        if url.query().is_some() || url.fragment().is_some() {
            return reject("must not carry a query or fragment");
        }

        Ok(())
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let url: ServiceUrl = "https://expense.moneyforward.com".parse().unwrap();
        assert_eq!(url.as_str(), "https://expense.moneyforward.com/");
    }

    #[test]
    fn valid_localhost_http() {
        let url = ServiceUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.to_string(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn join_path_handles_slashes() {
        let url = ServiceUrl::new("https://example.com/api/v1/").unwrap();
        assert_eq!(url.join_path("/offices"), "https://example.com/api/v1/offices");

        let root = ServiceUrl::new("https://example.com").unwrap();
        assert_eq!(root.join_path("/oauth/token"), "https://example.com/oauth/token");
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ServiceUrl::new("http://expense.moneyforward.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ServiceUrl::new("/api/external/v1").is_err());
    }

    #[test]
    fn rejects_query() {
        assert!(ServiceUrl::new("https://example.com/api?x=1").is_err());
    }
}
