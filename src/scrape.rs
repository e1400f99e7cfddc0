//! Pagination driver: walk every page of one date-range query.

use reqwest::blocking::Client;

use crate::config::Config;
use crate::envelope::fetch_envelope;
use crate::error::{HarvestError, Result};
use crate::normalize::{normalize, EventTypeFilter};
use crate::record::Reservation;

/// Pagination state captured once from the first page.
///
/// The server requires the page-1 continuation token on every subsequent
/// request of the same query, so the token and page count are read exactly
/// once and threaded through the walk unchanged.
#[derive(Debug, Clone)]
struct PageState {
    page_count: u32,
    paginate_key: Option<String>,
}

/// Fetch, normalize, and filter all reservations in one date range.
///
/// Pages are fetched strictly in numeric order, one blocking request at a
/// time; each page is normalized before the next request goes out. Any
/// failed fetch, or a continuation page without records, aborts the whole
/// range call.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `config` - API credentials and page size
/// * `lookback` - Range start as a relative day offset (e.g. "+0")
/// * `lookahead` - Range end as a relative day offset (e.g. "+6")
/// * `filter` - Event-type filter applied after the walk
pub fn scrape_range(
    client: &Client,
    config: &Config,
    lookback: &str,
    lookahead: &str,
    filter: &EventTypeFilter,
) -> Result<Vec<Reservation>> {
    let url = config.reservations_url(lookback, lookahead, 1, None);
    let first = fetch_envelope(client, config, &url)?;

    if first.records.is_empty() {
        tracing::info!(lookback, lookahead, "No reservations found for date range");
        return Ok(Vec::new());
    }

    let state = PageState {
        page_count: first.page_count,
        paginate_key: first.paginate_key,
    };

    let mut reservations: Vec<Reservation> = first.records.iter().map(normalize).collect();

    if state.page_count > 1 {
        if state.paginate_key.is_none() {
            // The server cannot identify continuation pages without the token
            return Err(HarvestError::MissingElement {
                element: "paginate_key".to_string(),
                context: "page 1 envelope".to_string(),
            });
        }
        tracing::info!(
            pages = state.page_count,
            lookback,
            lookahead,
            "Fetching remaining result pages"
        );
    }

    for page in 2..=state.page_count {
        let url = config.reservations_url(lookback, lookahead, page, state.paginate_key.as_deref());
        let envelope = fetch_envelope(client, config, &url)?;

        if envelope.records.is_empty() {
            return Err(HarvestError::MissingElement {
                element: "reservation".to_string(),
                context: format!("page {page} of {}", state.page_count),
            });
        }

        reservations.extend(envelope.records.iter().map(normalize));
    }

    let total = reservations.len();
    let filtered: Vec<Reservation> = reservations
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();

    tracing::debug!(
        fetched = total,
        kept = filtered.len(),
        "Applied event-type filter"
    );

    Ok(filtered)
}
