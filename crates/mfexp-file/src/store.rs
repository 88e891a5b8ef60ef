//! Token file storage.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, instrument};

use mfexp_core::error::{Error, StorageError};
use mfexp_core::traits::TokenStore;
use mfexp_core::{Result, Token};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stores the token as a single JSON object in one file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a reader never sees a half-written token. An exclusive lock on a
/// sibling `.lock` file serializes writers across processes.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn io_error(&self, err: std::io::Error) -> Error {
        Error::Storage(StorageError::Io {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn write_locked(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;

        lock_file.lock_exclusive().map_err(|e| self.io_error(e))?;

        let temp_path = self.temp_path();
        let written = fs::write(&temp_path, content)
            .and_then(|_| restrict_permissions(&temp_path))
            .and_then(|_| fs::rename(&temp_path, &self.path));

        let unlocked = lock_file.unlock();

        written.map_err(|e| self.io_error(e))?;
        unlocked.map_err(|e| self.io_error(e))?;

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Token>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored token");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let token: Token = serde_json::from_str(&content).map_err(|e| {
            Error::Storage(StorageError::MalformedToken {
                path: self.path.clone(),
                message: e.to_string(),
            })
        })?;

        debug!("Loaded stored token");
        Ok(Some(token))
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    async fn save(&self, token: &Token) -> Result<()> {
        let content = serde_json::to_string_pretty(token).map_err(|e| {
            Error::Storage(StorageError::Io {
                path: self.path.clone(),
                message: e.to_string(),
            })
        })?;

        self.write_locked(&content)?;

        debug!("Saved token");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_token() -> Token {
        serde_json::from_value(json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "token_type": "Bearer",
            "scope": "transaction:write report:write",
            "expires_in": 3600,
            "expires_at": 1734003600.0,
            "created_at": 1734000000
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_is_identity() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));
        let token = sample_token();

        store.save(&token).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, token);
    }

    #[tokio::test]
    async fn save_replaces_whole_record() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));

        store.save(&sample_token()).await.unwrap();
        store.save(&Token::new("A2", None)).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw, json!({"access_token": "A2", "token_type": "Bearer"}));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/deeper/token.json"));
        store.save(&sample_token()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileTokenStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::MalformedToken { .. })
        ));
    }

    #[tokio::test]
    async fn file_without_access_token_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, r#"{"refresh_token": "R1"}"#).unwrap();

        let err = FileTokenStore::new(&path).load().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::MalformedToken { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn token_file_is_private() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));
        store.save(&sample_token()).await.unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
