//! Token persistence trait.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{Result, Token};

/// Durable storage for the single OAuth2 token of a process.
///
/// Every save replaces the whole stored record.
#[async_trait]
pub trait TokenStore: Debug + Send + Sync {
    /// Load the stored token.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet, and a
    /// `StorageError::MalformedToken` if a record exists but cannot be read
    /// as a token.
    async fn load(&self) -> Result<Option<Token>>;

    /// Replace the stored token.
    async fn save(&self, token: &Token) -> Result<()>;

    /// Human-readable location of the store, for status output.
    fn location(&self) -> String;
}
