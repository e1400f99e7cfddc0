//! Record normalization: one raw wire record in, one flat record out.
//!
//! Pure and infallible by contract. Malformed sub-fields degrade to omitted
//! derived-field groups (with a warning) rather than failing the record.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::config::LOCATION_SENTINEL;
use crate::envelope::{IdValue, RawReservation, Space, SpaceAssignment};
use crate::record::{LastUpdated, Reservation, TimeFields};

/// Friendly datetime format: `09/01/2025 09:00 AM`.
const FRIENDLY_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Normalize one raw reservation into a flat record.
pub fn normalize(raw: &RawReservation) -> Reservation {
    let (location_full, location_abbr) = location_fields(&raw.spaces);

    Reservation {
        reservation_id: raw.reservation_id.clone(),
        event_id: raw.event_id.as_ref().and_then(unwrap_id),
        reservation_id_friendly: raw.event_locator.clone(),
        event_type: raw.event_type_name.clone(),
        reservation_state: raw.reservation_state_name.clone(),
        name: display_name(raw.event_name.as_deref(), raw.event_title.as_deref()),
        start: raw.reservation_start_dt.clone(),
        end: raw.reservation_end_dt.clone(),
        times: time_fields(raw),
        last_updated: last_updated(raw),
        location_full,
        location_abbr,
        organization: raw.organization_name.clone(),
        expected_attendance: raw.expected_count.clone(),
    }
}

/// Unwrap an id from its wire encoding.
///
/// The attributed form carries the value in its text content; the scalar
/// form is taken verbatim.
fn unwrap_id(id: &IdValue) -> Option<String> {
    match id {
        IdValue::Scalar(value) => Some(value.clone()),
        IdValue::Attributed { text } => text.clone(),
    }
}

/// Combine event name and title into a single display name.
fn display_name(name: Option<&str>, title: Option<&str>) -> Option<String> {
    match (name, title) {
        (Some(name), Some(title)) => Some(format!("{name} - {title}")),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(title)) => Some(title.to_string()),
        (None, None) => None,
    }
}

/// Derive the start/end timing group.
///
/// Both instants must parse or the whole group is omitted; the record
/// itself is always retained.
fn time_fields(raw: &RawReservation) -> Option<TimeFields> {
    let start = raw.reservation_start_dt.as_deref();
    let end = raw.reservation_end_dt.as_deref();

    match (start.and_then(parse_instant), end.and_then(parse_instant)) {
        (Some((start_timestamp, start_friendly)), Some((end_timestamp, end_friendly))) => {
            Some(TimeFields {
                start_timestamp,
                end_timestamp,
                start_friendly,
                end_friendly,
            })
        }
        _ => {
            tracing::warn!(
                reservation_id = raw.reservation_id.as_deref().unwrap_or("unknown"),
                start,
                end,
                "Could not parse reservation datetime fields; omitting derived fields"
            );
            None
        }
    }
}

/// Derive the modification-time group, when the source supplied one.
fn last_updated(raw: &RawReservation) -> Option<LastUpdated> {
    let text = raw.last_mod_dt.as_deref()?;
    match parse_instant(text) {
        Some((timestamp, friendly)) => Some(LastUpdated { timestamp, friendly }),
        None => {
            tracing::warn!(
                reservation_id = raw.reservation_id.as_deref().unwrap_or("unknown"),
                last_mod_dt = text,
                "Could not parse modification datetime; omitting last_updated fields"
            );
            None
        }
    }
}

/// Parse one ISO-8601 instant into epoch seconds and a friendly string.
///
/// Offset-qualified instants are taken as-is; the API sometimes omits the
/// offset, in which case the instant is interpreted in local time.
fn parse_instant(text: &str) -> Option<(i64, String)> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some((instant.timestamp(), instant.format(FRIENDLY_FORMAT).to_string()));
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").ok()?;
    let instant = Local.from_local_datetime(&naive).single()?;
    Some((instant.timestamp(), instant.format(FRIENDLY_FORMAT).to_string()))
}

/// Derive both location outputs from the space assignment.
fn location_fields(spaces: &SpaceAssignment) -> (String, String) {
    match spaces {
        SpaceAssignment::Absent => {
            (LOCATION_SENTINEL.to_string(), LOCATION_SENTINEL.to_string())
        }
        SpaceAssignment::Single(space) => (
            single_name(space.formal_name.as_deref()),
            single_name(space.space_name.as_deref()),
        ),
        SpaceAssignment::Many(spaces) => (
            joined_names(spaces, |space| space.formal_name.as_deref()),
            joined_names(spaces, |space| space.space_name.as_deref()),
        ),
    }
}

/// Single-space rule: comma-stripped name, sentinel fallback per field.
fn single_name(name: Option<&str>) -> String {
    match name {
        Some(name) => strip_commas(name),
        None => LOCATION_SENTINEL.to_string(),
    }
}

/// Multi-space rule: comma-stripped names joined with ", " in input order.
fn joined_names<'a>(
    spaces: &'a [Space],
    pick: impl Fn(&'a Space) -> Option<&'a str>,
) -> String {
    spaces
        .iter()
        .filter_map(&pick)
        .map(strip_commas)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Commas are the join separator, so they are stripped from names.
fn strip_commas(name: &str) -> String {
    name.replace(',', "")
}

/// Business filter on event type.
///
/// Keeps records whose event type contains any of the configured patterns
/// (case-sensitive substring match). The default patterns mirror the
/// operational rule this harvester was built for; they are plain data so
/// operators can adjust them without code changes.
#[derive(Debug, Clone)]
pub struct EventTypeFilter {
    /// Substrings to match against the event type.
    pub patterns: Vec<String>,
}

impl Default for EventTypeFilter {
    fn default() -> Self {
        Self {
            patterns: vec!["BL".to_string(), "IN".to_string()],
        }
    }
}

impl EventTypeFilter {
    /// Build a filter from explicit patterns.
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// Whether a record passes the filter.
    pub fn matches(&self, record: &Reservation) -> bool {
        let Some(event_type) = record.event_type.as_deref() else {
            return false;
        };
        self.patterns
            .iter()
            .any(|pattern| event_type.contains(pattern.as_str()))
    }
}
