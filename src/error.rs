//! Error types for the harvester.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Required environment variable is not set.
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A single page request failed (transport error or non-2xx status).
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Batch step size must be at least one day.
    #[error("Invalid step size: {0} (must be at least 1)")]
    InvalidStepSize(u32),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export error.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
