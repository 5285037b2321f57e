//! Resource fetching.
//!
//! Every resource the viewer consumes (the manifest, the structure file,
//! the chemical files) is a single GET for a static text document. The
//! [`Fetcher`] trait is the seam; [`HttpFetcher`] is the ureq-backed
//! implementation used in production.

use crate::error::LigviewError;

/// Capability to fetch a text resource by manifest reference.
///
/// Implementations must be callable from the background fetch thread.
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `path` and return its text content.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::Transport`] on a network failure and
    /// [`LigviewError::Status`] on a non-success HTTP status.
    fn fetch_text(&self, path: &str) -> Result<String, LigviewError>;
}

/// HTTP fetcher resolving manifest references against a base URL.
pub struct HttpFetcher {
    base: String,
}

impl HttpFetcher {
    /// Create a fetcher for the given base URL (scheme and host; a
    /// trailing slash is tolerated).
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    /// Resolve a manifest reference to an absolute URL.
    ///
    /// Absolute `http(s)` references pass through unchanged; anything else
    /// is joined to the base URL.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let sep = if path.starts_with('/') { "" } else { "/" };
        format!("{}{sep}{path}", self.base)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, path: &str) -> Result<String, LigviewError> {
        let url = self.resolve(path);
        log::debug!("GET {url}");
        ureq::get(&url)
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => LigviewError::Status {
                    status,
                    url: url.clone(),
                },
                other => LigviewError::Transport(Box::new(other)),
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| LigviewError::Transport(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_rooted_paths() {
        let fetcher = HttpFetcher::new("http://localhost:8080");
        assert_eq!(
            fetcher.resolve("/ligand_data.json"),
            "http://localhost:8080/ligand_data.json"
        );
    }

    #[test]
    fn resolve_inserts_separator_for_bare_paths() {
        let fetcher = HttpFetcher::new("http://localhost:8080");
        assert_eq!(fetcher.resolve("a.sdf"), "http://localhost:8080/a.sdf");
    }

    #[test]
    fn resolve_strips_trailing_base_slash() {
        let fetcher = HttpFetcher::new("http://localhost:8080/");
        assert_eq!(fetcher.resolve("/s.pdb"), "http://localhost:8080/s.pdb");
    }

    #[test]
    fn resolve_passes_absolute_urls_through() {
        let fetcher = HttpFetcher::new("http://localhost:8080");
        assert_eq!(
            fetcher.resolve("https://files.example.org/s.pdb"),
            "https://files.example.org/s.pdb"
        );
    }
}
