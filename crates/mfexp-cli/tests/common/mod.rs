use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

/// Isolated environment for one CLI run: its own token file and working
/// directory, pointed at a mock server.
pub struct CliEnv {
    pub dir: tempfile::TempDir,
    pub server_uri: Option<String>,
}

impl CliEnv {
    pub fn new(server_uri: Option<String>) -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
            server_uri,
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.path().join("state").join("token.json")
    }

    /// Write a token file as a previous `mfexp auth` would have.
    pub fn write_token(&self, token: &Value) {
        let path = self.token_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(token).unwrap()).unwrap();
    }

    pub fn read_token(&self) -> Value {
        let text = std::fs::read_to_string(self.token_path()).expect("Token file missing");
        serde_json::from_str(&text).expect("Token file is not JSON")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, args: &[String], with_credentials: bool) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mfexp"));
        cmd.args(args);
        cmd.current_dir(self.dir.path());
        cmd.env("HOME", self.dir.path());
        cmd.env("XDG_DATA_HOME", self.dir.path().join("data"));
        cmd.env("MF_TOKEN_FILE", self.token_path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("MF_OFFICE_ID");
        cmd.env_remove("MF_REDIRECT_URI");
        cmd.env_remove("RUST_LOG");

        if with_credentials {
            cmd.env("MF_CLIENT_ID", "test-client");
            cmd.env("MF_CLIENT_SECRET", "test-secret");
        } else {
            cmd.env_remove("MF_CLIENT_ID");
            cmd.env_remove("MF_CLIENT_SECRET");
        }

        if let Some(uri) = &self.server_uri {
            cmd.env("MF_API_BASE_URL", format!("{uri}/api/external/v1"));
            cmd.env("MF_OAUTH_BASE_URL", uri);
        }

        cmd
    }

    /// Run the CLI off the async runtime so the mock server keeps serving.
    pub async fn run(&self, args: &[&str]) -> Output {
        self.run_with(args, true).await
    }

    pub async fn run_without_credentials(&self, args: &[&str]) -> Output {
        self.run_with(args, false).await
    }

    async fn run_with(&self, args: &[&str], with_credentials: bool) -> Output {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut cmd = self.command(&args, with_credentials);
        tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
            .await
            .expect("CLI task panicked")
    }
}

/// Parse stdout as one JSON document, panicking with stderr on failure.
pub fn stdout_json(output: &Output) -> Value {
    if !output.status.success() {
        panic!(
            "CLI command failed\nstderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn server_uri(port: u16) -> String {
    format!("http://127.0.0.1:{port}")
}
