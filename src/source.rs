//! Export sources
//!
//! The pipeline only needs the raw export text. Sources deliver it in one
//! blocking call bounded by a caller-supplied timeout, and report timeouts
//! separately from other failures. Nothing here retries.

use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors raised while fetching the export
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Sheet request timed out after {}s", .after.as_secs_f64().round())]
    Timeout { after: Duration },

    #[error("CSV fetch failed: {0}")]
    Status(u16),

    #[error("CSV fetch failed: {0}")]
    Transport(String),

    #[error("Failed to read export: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

/// Trait for anything that can deliver raw export text
pub trait LogSource {
    /// Fetch the full export text
    fn fetch(&self, timeout: Duration) -> Result<String, FetchError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Export stored on the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSource for FileSource {
    fn fetch(&self, _timeout: Duration) -> Result<String, FetchError> {
        debug!(path = %self.path.display(), "reading export file");
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Export piped through standard input
pub struct StdinSource;

impl LogSource for StdinSource {
    fn fetch(&self, _timeout: Duration) -> Result<String, FetchError> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }

    fn describe(&self) -> String {
        "stdin".to_string()
    }
}

/// Export published at an http(s) URL, e.g. a sheet's CSV endpoint
#[cfg(feature = "remote")]
pub struct HttpSource {
    url: String,
}

#[cfg(feature = "remote")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn map_error(err: reqwest::Error, timeout: Duration) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout { after: timeout }
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[cfg(feature = "remote")]
impl LogSource for HttpSource {
    fn fetch(&self, timeout: Duration) -> Result<String, FetchError> {
        debug!(url = %self.url, timeout_secs = timeout.as_secs(), "fetching export");

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let response = client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .map_err(|e| Self::map_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().map_err(|e| Self::map_error(e, timeout))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a location string: `-` is stdin, `http(s)://` is remote,
/// anything else is a file path
pub fn source_for(location: &str) -> Result<Box<dyn LogSource>, FetchError> {
    let location = location.trim();
    if location == "-" {
        return Ok(Box::new(StdinSource));
    }

    if location.starts_with("http://") || location.starts_with("https://") {
        #[cfg(feature = "remote")]
        return Ok(Box::new(HttpSource::new(location)));

        #[cfg(not(feature = "remote"))]
        return Err(FetchError::Unsupported(format!(
            "{location} (built without the `remote` feature)"
        )));
    }

    Ok(Box::new(FileSource::new(location)))
}
