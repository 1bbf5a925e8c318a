//! Per-request workspace lifecycle.

use std::path::Path;

use tempfile::TempDir;

/// Private directory scoped to one request.
///
/// Created empty and uniquely named; removed together with everything
/// written into it when the guard goes away, on the success path, on early
/// error returns, and on panics unwinding through the handler alike.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace directory.
    pub fn create() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        tracing::debug!(path = %dir.path().display(), "workspace created");
        Ok(Self { dir })
    }

    /// The workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace now, logging removal failure instead of
    /// propagating it. The response for the request is already decided by
    /// the time this runs; a leftover directory must not change it.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove workspace");
        }
    }
}
