//! Configuration and URL construction for the 25Live API.

use std::env;

use crate::error::{HarvestError, Result};

/// Number of reservations requested per page.
pub const PAGE_SIZE: u32 = 500;

/// HTTP timeout in seconds.
///
/// The 25Live API can be slow to assemble large result pages; 30 seconds
/// keeps a hung request from blocking a batch run indefinitely.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Placeholder used when a reservation has no space attached.
pub const LOCATION_SENTINEL: &str = "Not Specified";

/// API credentials and endpoint, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the 25Live web services instance.
    pub base_url: String,

    /// Username for HTTP basic auth.
    pub username: String,

    /// Password for HTTP basic auth.
    pub password: String,

    /// Page size for paginated queries.
    pub page_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads `API_BASE_URL`, `API_USERNAME`, and `API_PASSWORD`; all three
    /// are required. A `.env` file in the working directory is honored if
    /// present.
    ///
    /// # Errors
    /// `HarvestError::MissingEnv` naming the first absent variable.
    pub fn from_env() -> Result<Self> {
        // Best-effort: a missing .env file is not an error
        dotenv::dotenv().ok();

        Ok(Self {
            base_url: require_env("API_BASE_URL")?,
            username: require_env("API_USERNAME")?,
            password: require_env("API_PASSWORD")?,
            page_size: PAGE_SIZE,
        })
    }

    /// Build the reservations query URL for one page of a date-range query.
    ///
    /// Date bounds are relative day offsets (e.g. `"+0"`, `"+6"`) which the
    /// API accepts directly. Page 1 omits the continuation token; pages 2
    /// and up must echo the `paginate_key` returned by page 1.
    pub fn reservations_url(
        &self,
        lookback: &str,
        lookahead: &str,
        page: u32,
        paginate_key: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}/reservations.xml?start_dt={lookback}&end_dt={lookahead}&paginate&page_size={}",
            self.base_url, self.page_size
        );

        if page > 1 {
            if let Some(key) = paginate_key {
                url.push_str(&format!("&paginate={key}&page={page}"));
            }
        }

        url
    }
}

/// Read a required environment variable, treating empty values as absent.
fn require_env(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HarvestError::MissingEnv(name)),
    }
}
