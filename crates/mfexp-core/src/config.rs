//! Client configuration.

use crate::credentials::Credentials;
use crate::error::InvalidInputError;
use crate::types::ServiceUrl;
use crate::Result;

/// Default base URL of the external expense API.
pub const DEFAULT_API_BASE_URL: &str = "https://expense.moneyforward.com/api/external/v1";

/// Default base URL of the OAuth2 provider.
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://expense.moneyforward.com";

/// Authorization endpoint path on the OAuth2 provider.
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

/// Token endpoint path on the OAuth2 provider.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Scopes requested by every authorization.
pub const SCOPES: &[&str] = &[
    "office_setting:write",
    "user_setting:write",
    "transaction:write",
    "report:write",
    "account:write",
    "public_resource:read",
];

/// Everything the authenticator and executor need, read once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    credentials: Credentials,
    api_base: ServiceUrl,
    oauth_base: ServiceUrl,
    office_id: Option<String>,
}

impl ClientConfig {
    /// Configuration against the production provider.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in URLs are invalid, which they are not.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self {
            credentials,
            api_base: ServiceUrl::new(DEFAULT_API_BASE_URL)?,
            oauth_base: ServiceUrl::new(DEFAULT_OAUTH_BASE_URL)?,
            office_id: None,
        })
    }

    /// Set the default office used when a call omits one.
    pub fn with_office_id(mut self, office_id: Option<String>) -> Self {
        self.office_id = office_id.filter(|id| !id.is_empty());
        self
    }

    /// Point the API at a different base URL.
    pub fn with_api_base(mut self, api_base: ServiceUrl) -> Self {
        self.api_base = api_base;
        self
    }

    /// Point the OAuth grants at a different provider host.
    pub fn with_oauth_base(mut self, oauth_base: ServiceUrl) -> Self {
        self.oauth_base = oauth_base;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_base(&self) -> &ServiceUrl {
        &self.api_base
    }

    pub fn office_id(&self) -> Option<&str> {
        self.office_id.as_deref()
    }

    /// Resolve the office for a call: the explicit one, else the default.
    pub fn resolve_office<'a>(&'a self, office_id: Option<&'a str>) -> Result<&'a str> {
        office_id
            .filter(|id| !id.is_empty())
            .or(self.office_id())
            .ok_or_else(|| InvalidInputError::MissingOffice.into())
    }

    pub fn authorize_url(&self) -> String {
        self.oauth_base.join_path(AUTHORIZE_PATH)
    }

    pub fn token_url(&self) -> String {
        self.oauth_base.join_path(TOKEN_PATH)
    }

    /// The fixed scope set, space separated.
    pub fn scope(&self) -> String {
        SCOPES.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new(Credentials::new("id", "secret")).unwrap()
    }

    #[test]
    fn production_endpoints() {
        let config = config();
        assert_eq!(
            config.authorize_url(),
            "https://expense.moneyforward.com/oauth/authorize"
        );
        assert_eq!(
            config.token_url(),
            "https://expense.moneyforward.com/oauth/token"
        );
        assert_eq!(
            config.api_base().join_path("/offices"),
            "https://expense.moneyforward.com/api/external/v1/offices"
        );
    }

    #[test]
    fn office_resolution() {
        let config = config();
        assert!(config.resolve_office(None).is_err());
        assert_eq!(config.resolve_office(Some("OFF2")).unwrap(), "OFF2");

        let config = config.with_office_id(Some("OFF1".to_string()));
        assert_eq!(config.resolve_office(None).unwrap(), "OFF1");
        assert_eq!(config.resolve_office(Some("")).unwrap(), "OFF1");
        assert_eq!(config.resolve_office(Some("OFF2")).unwrap(), "OFF2");
    }

    #[test]
    fn empty_office_is_unset() {
        let config = config().with_office_id(Some(String::new()));
        assert_eq!(config.office_id(), None);
    }

    #[test]
    fn scope_is_space_separated() {
        let scope = config().scope();
        assert!(scope.starts_with("office_setting:write user_setting:write"));
        assert!(scope.ends_with("public_resource:read"));
    }
}
