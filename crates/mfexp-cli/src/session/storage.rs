//! Token file location and client construction.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use mfexp_core::error::InvalidInputError;
use mfexp_core::{ClientConfig, Credentials, ServiceUrl};
use mfexp_file::FileTokenStore;

use crate::cli::Settings;

/// Get the token file path.
pub fn token_path(settings: &Settings) -> Result<PathBuf> {
    if let Some(path) = &settings.token_file {
        return Ok(path.clone());
    }

    let dirs =
        ProjectDirs::from("", "", "mfexp").context("Could not determine data directory")?;

    Ok(dirs.data_dir().join("token.json"))
}

/// Open the token store at the configured path.
pub fn token_store(settings: &Settings) -> Result<FileTokenStore> {
    Ok(FileTokenStore::new(token_path(settings)?))
}

/// Build the client configuration from the settings.
pub fn client_config(settings: &Settings) -> Result<ClientConfig> {
    let client_id = required(settings.client_id.as_deref(), "MF_CLIENT_ID")?;
    let client_secret = required(settings.client_secret.as_deref(), "MF_CLIENT_SECRET")?;

    let credentials =
        Credentials::new(client_id, client_secret).with_redirect_uri(&settings.redirect_uri);

    let api_base = ServiceUrl::new(&settings.api_base_url).context("Invalid API base URL")?;
    let oauth_base =
        ServiceUrl::new(&settings.oauth_base_url).context("Invalid OAuth base URL")?;

    Ok(ClientConfig::new(credentials)?
        .with_api_base(api_base)
        .with_oauth_base(oauth_base)
        .with_office_id(settings.office_id.clone()))
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| InvalidInputError::MissingConfig { name }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    fn settings(args: &[&str]) -> Settings {
        let mut argv = vec!["mfexp"];
        argv.extend_from_slice(args);
        argv.push("offices");
        Cli::try_parse_from(argv).unwrap().settings
    }

    #[test]
    fn explicit_token_file_wins() {
        let settings = settings(&["--token-file", "/tmp/mfexp-test/token.json"]);
        assert_eq!(
            token_path(&settings).unwrap(),
            PathBuf::from("/tmp/mfexp-test/token.json")
        );
    }

    #[test]
    fn missing_credentials_are_reported_by_name() {
        let mut settings = settings(&["--client-secret", "s"]);
        settings.client_id = None;
        let err = client_config(&settings).unwrap_err();
        assert!(err.to_string().contains("MF_CLIENT_ID"));
    }

    #[test]
    fn config_carries_office_and_endpoints() {
        let mut settings = settings(&[
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--api-base-url",
            "http://127.0.0.1:9000/api/external/v1",
            "--oauth-base-url",
            "http://127.0.0.1:9000",
        ]);
        settings.office_id = Some("OFF1".to_string());

        let config = client_config(&settings).unwrap();
        assert_eq!(config.office_id(), Some("OFF1"));
        assert_eq!(config.token_url(), "http://127.0.0.1:9000/oauth/token");
        assert_eq!(
            config.api_base().as_str(),
            "http://127.0.0.1:9000/api/external/v1"
        );
    }

    #[test]
    fn plain_http_api_base_is_rejected() {
        let mut settings = settings(&["--client-id", "id", "--client-secret", "secret"]);
        settings.api_base_url = "http://expense.example.com/api".to_string();
        assert!(client_config(&settings).is_err());
    }
}
