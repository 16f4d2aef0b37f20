// src/error.rs

use thiserror::Error;

/// Result alias for scraping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single GET did not produce a body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl FetchError {
    /// Worth another attempt: transport hiccups and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => status.is_server_error(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A required element is missing from the page.
    #[error("tag not found: {query}")]
    TagNotFound { query: String },

    #[error("<{tag}> has no `{attr}` attribute")]
    AttributeMissing { tag: String, attr: String },

    #[error("no value follows the label {label:?}")]
    LabelNotFound { label: String },

    /// A link on the page that cannot be resolved against its base.
    #[error("cannot resolve link {href:?}: {source}")]
    BadLink {
        href: String,
        #[source]
        source: url::ParseError,
    },

    /// The page no longer has the structure the extractor relies on.
    #[error("no list contains the marker {marker:?}")]
    MarkerNotFound { marker: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Missing-element failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::TagNotFound { .. } | Error::AttributeMissing { .. } | Error::LabelNotFound { .. }
        )
    }

    /// Failures confined to one item of a batch: missing markup or a broken link.
    pub fn is_item_local(&self) -> bool {
        self.is_not_found() || matches!(self, Error::BadLink { .. })
    }
}
