//! Crate-level error types.

use std::fmt;

/// Errors produced by the ligview crate.
#[derive(Debug)]
pub enum LigviewError {
    /// Transport-level failure while fetching a resource.
    Transport(Box<ureq::Error>),
    /// Non-success HTTP status for a resource.
    Status {
        /// Status code returned by the server.
        status: u16,
        /// Resource URL that produced the status.
        url: String,
    },
    /// Manifest JSON parse failure.
    ManifestParse(String),
    /// Selection referred to a ligand index not present in the manifest.
    UnknownLigand(usize),
    /// No chemical file has been fetched for the current selection.
    DownloadUnavailable,
    /// Render view creation failure reported by the backend.
    View(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn the background fetch thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for LigviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "network error: {e}"),
            Self::Status { status, url } => {
                write!(f, "HTTP status {status} for {url}")
            }
            Self::ManifestParse(msg) => {
                write!(f, "manifest parse error: {msg}")
            }
            Self::UnknownLigand(index) => {
                write!(f, "no ligand at index {index}")
            }
            Self::DownloadUnavailable => {
                write!(f, "no chemical file loaded to download")
            }
            Self::View(msg) => write!(f, "view error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for LigviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e.as_ref()),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LigviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
