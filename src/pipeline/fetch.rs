//! Fetch: download a source PDF into the cache directory.
//!
//! ## Why write through a temp file?
//!
//! The cached PDF is trusted on every later run: if `{slug}.pdf` exists it
//! is never downloaded again. A half-written file left behind by a dropped
//! connection or Ctrl-C would therefore poison the cache until someone
//! deletes it by hand. Writing into a sibling temp file and renaming it into
//! place means the cache path either holds a complete body or nothing.

use crate::error::BookError;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Downloads a URL to a local path.
///
/// Implementations must be `Send + Sync` so they can be stored in
/// [`crate::config::ExtractionConfig`] behind an `Arc`.
pub trait Fetcher: Send + Sync {
    /// Write the body at `url` to `dest`, overwriting any existing file.
    /// The parent directory of `dest` may not exist yet.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), BookError>;
}

/// Blocking HTTP(S) fetcher backed by `reqwest`.
///
/// No retries; redirects follow the client default.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout = None` means requests never time out.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("book-covers/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), BookError> {
        info!("Downloading PDF from: {}", url);

        let failed = |reason: String| BookError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
        check_pdf_magic(&bytes).map_err(failed)?;

        write_atomically(dest, &bytes).map_err(|e| failed(format!("writing {}: {e}", dest.display())))?;

        info!("Downloaded {} bytes to: {}", bytes.len(), dest.display());
        Ok(())
    }
}

/// Reject bodies that are clearly not PDFs (HTML error pages, captive portals).
fn check_pdf_magic(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 4 {
        return Err(format!("response too short to be a PDF ({} bytes)", bytes.len()));
    }
    if &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(format!("response is not a PDF, first bytes: {magic:?}"));
    }
    Ok(())
}

/// Write `bytes` to `dest` via a temp file in the same directory + rename.
pub(crate) fn write_atomically(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    debug!("Wrote {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}
