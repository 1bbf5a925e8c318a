use thiserror::Error;

/// Errors produced while writing or reading a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A collected file disappeared between collection and packaging.
    #[error("collected file vanished before packaging: {0}")]
    MissingEntry(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
