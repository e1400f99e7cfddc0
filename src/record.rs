//! Normalized reservation records.
//!
//! These are the flat, typed records downstream consumers (export, report
//! examples) read by field name. A record is built once by the normalizer
//! and never mutated afterwards.

use serde::Serialize;

/// Derived start/end timing fields.
///
/// Produced as a unit: either both wire datetimes parsed and all four
/// fields are present, or the whole group is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeFields {
    /// Start instant as epoch seconds.
    pub start_timestamp: i64,

    /// End instant as epoch seconds.
    pub end_timestamp: i64,

    /// Start in `MM/DD/YYYY HH:MM AM/PM` form.
    pub start_friendly: String,

    /// End in `MM/DD/YYYY HH:MM AM/PM` form.
    pub end_friendly: String,
}

/// Derived modification-time fields, present only when the source supplied
/// a parseable `last_mod_dt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastUpdated {
    /// Modification instant as epoch seconds.
    pub timestamp: i64,

    /// Modification time in `MM/DD/YYYY HH:MM AM/PM` form.
    pub friendly: String,
}

/// One normalized reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    /// Reservation identifier.
    pub reservation_id: Option<String>,

    /// Event identifier, unwrapped from the wire's scalar-or-attributed form.
    pub event_id: Option<String>,

    /// Human-readable event locator (e.g. "2025-ABCDEF").
    pub reservation_id_friendly: Option<String>,

    /// Event type name, used by the business filter.
    pub event_type: Option<String>,

    /// Reservation state name.
    pub reservation_state: Option<String>,

    /// Display name: event name, "name - title" when both exist, or title.
    pub name: Option<String>,

    /// Start instant, verbatim ISO-8601 text from the wire.
    pub start: Option<String>,

    /// End instant, verbatim ISO-8601 text from the wire.
    pub end: Option<String>,

    /// Derived timing fields; absent when `start`/`end` failed to parse.
    #[serde(flatten)]
    pub times: Option<TimeFields>,

    /// Derived modification-time fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<LastUpdated>,

    /// Formal location names, comma-stripped, joined with ", ".
    /// Always set; "Not Specified" when no space is attached.
    pub location_full: String,

    /// Short location names, same join and sentinel rules.
    pub location_abbr: String,

    /// Sponsoring organization.
    pub organization: Option<String>,

    /// Expected attendance, numeric-as-text as the wire supplies it.
    pub expected_attendance: Option<String>,
}
