//! 25Live Harvester - Download reservation data from the CollegeNET 25Live API.
//!
//! This crate fetches event/reservation records from a 25Live web services
//! instance, normalizes the irregular XML payloads into flat records, and
//! schedules fetches in resilient batches across a date horizon.
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Environment configuration and URL construction
//! - [`error`]: Error types and Result alias
//! - [`http`]: Blocking HTTP client with basic auth
//! - [`xml`]: XML navigation helpers
//! - [`envelope`]: Page fetching and envelope parsing
//! - [`record`]: Normalized record types
//! - [`normalize`]: Record normalization and event-type filtering
//! - [`scrape`]: Pagination driver for one date range
//! - [`batch`]: Batch scheduling across the full horizon
//! - [`export`]: CSV export
//! - [`cli`]: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use r25_harvester::{batch, Config, EventTypeFilter};
//!
//! let config = Config::from_env()?;
//! let client = r25_harvester::http::create_client()?;
//! let report = batch::run(&client, &config, 14, 7, &EventTypeFilter::default())?;
//! println!("{} reservations", report.total_records());
//! # Ok::<(), r25_harvester::HarvestError>(())
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod export;
pub mod http;
pub mod normalize;
pub mod record;
pub mod scrape;
pub mod xml;

// Re-export commonly used items
pub use batch::{BatchReport, Window};
pub use config::Config;
pub use envelope::{Envelope, RawReservation};
pub use error::{HarvestError, Result};
pub use normalize::{normalize, EventTypeFilter};
pub use record::Reservation;
pub use scrape::scrape_range;
