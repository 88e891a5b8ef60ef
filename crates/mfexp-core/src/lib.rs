//! mfexp-core - Core types and traits for the MoneyForward expense API.

pub mod config;
pub mod credentials;
pub mod error;
pub mod request;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::Error;
pub use request::{ApiRequest, ListQuery, Method, RequestBody};
pub use tokens::{AccessToken, RefreshToken, Token};
pub use traits::TokenStore;
pub use types::ServiceUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
