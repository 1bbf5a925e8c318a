//! TestForge: full-stack integration test harness.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use thiserror::Error;

/// Errors from TestForge operations.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("forgeron failed to start: {0}")]
    StartupFailed(String),

    #[error("forgeron binary not found at {0}")]
    BinaryNotFound(String),
}

/// Full-stack test harness.
///
/// Writes a makefile into a temp directory, boots the service on an
/// OS-assigned port, and provides HTTP request helpers.
pub struct TestForge {
    /// The child process running the service.
    child: Child,
    /// The port the service is listening on.
    port: u16,
    /// HTTP client for making requests.
    client: reqwest::Client,
    /// Temp directory holding the makefile (kept alive for the test duration).
    _temp_dir: TempDir,
}

impl TestForge {
    /// Boot the service with the given makefile content and explicit output
    /// patterns.
    pub async fn start(makefile: &str, outputs: &[&str]) -> Result<Self, TestError> {
        let temp_dir = TempDir::new()?;
        let makefile_path = temp_dir.path().join("Makefile");
        std::fs::write(&makefile_path, makefile)?;

        let binary_path = find_forgeron_binary()?;
        let port = find_available_port()?;

        let mut command = Command::new(&binary_path);
        command
            .arg(&makefile_path)
            .arg("--port")
            .arg(port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for pattern in outputs {
            command.arg("--output").arg(pattern);
        }

        let child = command.spawn()?;
        let client = reqwest::Client::new();

        let mut forge = TestForge {
            child,
            port,
            client,
            _temp_dir: temp_dir,
        };

        forge.wait_for_ready().await?;

        Ok(forge)
    }

    /// Wait for the service to accept requests. There is no health route;
    /// any successfully answered request (a 404 counts) means it is up.
    async fn wait_for_ready(&mut self) -> Result<(), TestError> {
        let probe_url = format!("http://127.0.0.1:{}/", self.port);
        let max_attempts = 50;
        let delay = Duration::from_millis(100);

        for _ in 0..max_attempts {
            if self.client.get(&probe_url).send().await.is_ok() {
                return Ok(());
            }

            if let Ok(Some(status)) = self.child.try_wait() {
                return Err(TestError::StartupFailed(format!(
                    "forgeron exited with status: {}",
                    status
                )));
            }

            tokio::time::sleep(delay).await;
        }

        Err(TestError::StartupFailed(
            "forgeron did not become ready in time".to_string(),
        ))
    }

    /// Get the base URL of the service.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// PUT raw bytes to the given path.
    pub async fn put(&self, path: &str, body: Vec<u8>) -> Result<reqwest::Response, TestError> {
        let url = format!("{}{}", self.base_url(), path);
        // reqwest omits Content-Length for an empty body; a real client
        // uploading a zero-length file still sends `Content-Length: 0`, so set
        // it explicitly to match that wire behavior.
        let len = body.len();
        Ok(self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_LENGTH, len)
            .body(body)
            .send()
            .await?)
    }

    /// PUT raw bytes with an Accept header.
    pub async fn put_with_accept(
        &self,
        path: &str,
        body: Vec<u8>,
        accept: &str,
    ) -> Result<reqwest::Response, TestError> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .put(&url)
            .header("accept", accept)
            .body(body)
            .send()
            .await?)
    }

    /// PUT using a chunked stream body, so no Content-Length is sent.
    pub async fn put_chunked(
        &self,
        path: &str,
        body: &[u8],
    ) -> Result<reqwest::Response, TestError> {
        let url = format!("{}{}", self.base_url(), path);
        let stream = futures_util::stream::iter(vec![Ok::<Vec<u8>, std::io::Error>(body.to_vec())]);
        Ok(self
            .client
            .put(&url)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?)
    }

    /// Make a request with any method and no body.
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::Response, TestError> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.request(method, &url).send().await?)
    }
}

impl Drop for TestForge {
    fn drop(&mut self) {
        // Kill the child process
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Find the forgeron binary in the target directory.
fn find_forgeron_binary() -> Result<String, TestError> {
    // Try debug build first, then release
    let candidates = [
        "target/debug/forgeron",
        "target/release/forgeron",
        "../target/debug/forgeron",
        "../target/release/forgeron",
        "../../target/debug/forgeron",
        "../../target/release/forgeron",
    ];

    for path in candidates {
        if Path::new(path).exists() {
            return Ok(path.to_string());
        }
    }

    // Try using cargo to find the binary
    if let Ok(output) = Command::new("cargo")
        .args(["metadata", "--format-version=1", "--no-deps"])
        .output()
    {
        if output.status.success() {
            if let Ok(meta) = String::from_utf8(output.stdout) {
                if let Some(target_dir) = meta.split("\"target_directory\":\"").nth(1) {
                    if let Some(dir) = target_dir.split('"').next() {
                        let debug_path = format!("{}/debug/forgeron", dir);
                        if Path::new(&debug_path).exists() {
                            return Ok(debug_path);
                        }
                        let release_path = format!("{}/release/forgeron", dir);
                        if Path::new(&release_path).exists() {
                            return Ok(release_path);
                        }
                    }
                }
            }
        }
    }

    Err(TestError::BinaryNotFound(
        "target/debug/forgeron or target/release/forgeron".to_string(),
    ))
}

/// Find an available TCP port.
fn find_available_port() -> Result<u16, TestError> {
    // Bind to port 0 to get an OS-assigned port
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}
