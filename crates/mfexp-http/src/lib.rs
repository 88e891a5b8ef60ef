//! mfexp-http - OAuth2-authenticated client for the MoneyForward expense API.
//!
//! The [`Authenticator`] owns the token and the session derived from it.
//! The [`RequestExecutor`] sends every call through that session and
//! recovers from one expired or rejected token by refreshing and replaying.
//! [`ExpenseClient`] adds the endpoint-specific operations on top.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mfexp_core::{ClientConfig, Credentials, ListQuery, TokenStore};
//! use mfexp_http::{AuthState, ExpenseClient};
//!
//! # async fn example(store: Arc<dyn TokenStore>) -> Result<(), mfexp_core::Error> {
//! let config = ClientConfig::new(Credentials::new("client-id", "client-secret"))?
//!     .with_office_id(Some("OFFICE".to_string()));
//! let client = ExpenseClient::new(config, store)?;
//!
//! if let AuthState::InteractionRequired(request) = client.authenticator().authenticate().await? {
//!     println!("Visit {}", request.url);
//!     return Ok(());
//! }
//!
//! let transactions = client.list_ex_transactions(None, &ListQuery::default()).await?;
//! println!("{transactions}");
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
mod executor;
mod expense;
mod oauth;
mod session;

pub use client::HttpClient;
pub use executor::{MAX_AUTH_RETRIES, RequestExecutor};
pub use expense::ExpenseClient;
pub use oauth::{AuthState, Authenticator, AuthorizationRequest};
pub use session::AuthenticatedSession;
