//! Page fetching and envelope parsing.
//!
//! One API response wraps zero or more `reservation` elements in a
//! `reservations` envelope whose attributes carry the pagination metadata.
//! The wire shape is irregular: ids may be bare text or attributed elements,
//! and space assignments appear as zero, one, or many child elements. Those
//! ambiguities are resolved here, once, into owned tagged values so the
//! normalizer downstream never touches the DOM.

use reqwest::blocking::Client;
use roxmltree::{Document, Node};

use crate::config::Config;
use crate::error::Result;
use crate::http::get_xml;
use crate::xml::{child_text, find_child, find_children, tag_name};

/// An id value as encoded on the wire.
///
/// The API emits `<event_id>42</event_id>` for plain records but
/// `<event_id crc="...">42</event_id>` in some instances; the attributed
/// form must be unwrapped to its text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValue {
    /// Bare text node.
    Scalar(String),

    /// Element carrying attributes; the value lives in its text content.
    Attributed { text: Option<String> },
}

/// One space (room) attached to a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Space {
    /// Formal display name (e.g. "Main Hall, East Wing").
    pub formal_name: Option<String>,

    /// Short name / room code.
    pub space_name: Option<String>,
}

/// Space assignment of a reservation, as found on the wire.
///
/// Occupancy count determines the shape: none, a single element, or a
/// sequence of elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpaceAssignment {
    #[default]
    Absent,
    Single(Space),
    Many(Vec<Space>),
}

/// One raw reservation record, extracted verbatim from the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawReservation {
    pub reservation_id: Option<String>,
    pub event_id: Option<IdValue>,
    pub event_type_name: Option<String>,
    pub reservation_state_name: Option<String>,
    pub event_locator: Option<String>,
    pub expected_count: Option<String>,
    pub reservation_start_dt: Option<String>,
    pub reservation_end_dt: Option<String>,
    pub last_mod_dt: Option<String>,
    pub organization_name: Option<String>,
    pub event_name: Option<String>,
    pub event_title: Option<String>,
    pub spaces: SpaceAssignment,
}

/// Parsed top-level response envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Raw records on this page, in document order.
    pub records: Vec<RawReservation>,

    /// Total page count for the query, as reported by page 1.
    pub page_count: u32,

    /// Continuation token, present only for multi-page result sets.
    pub paginate_key: Option<String>,
}

/// Fetch one page and parse its envelope.
///
/// # Errors
/// `HarvestError::Request` for transport/HTTP failures,
/// `HarvestError::XmlParse` when the body is not well-formed XML.
pub fn fetch_envelope(client: &Client, config: &Config, url: &str) -> Result<Envelope> {
    let body = get_xml(client, config, url)?;
    parse_envelope(&body)
}

/// Parse a response body into an `Envelope`.
///
/// A well-formed document whose root is not a `reservations` element parses
/// as an empty envelope, matching what the API returns for out-of-range
/// queries.
pub fn parse_envelope(xml: &str) -> Result<Envelope> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if tag_name(root) != "reservations" {
        return Ok(Envelope {
            records: Vec::new(),
            page_count: 1,
            paginate_key: None,
        });
    }

    let page_count = root
        .attribute("page_count")
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(1);

    let paginate_key = root.attribute("paginate_key").map(str::to_string);

    let records = find_children(root, "reservation")
        .map(parse_reservation)
        .collect();

    Ok(Envelope {
        records,
        page_count,
        paginate_key,
    })
}

/// Extract one `reservation` element into an owned raw record.
fn parse_reservation(node: Node<'_, '_>) -> RawReservation {
    RawReservation {
        reservation_id: child_text(node, "reservation_id"),
        event_id: parse_id(node, "event_id"),
        event_type_name: child_text(node, "event_type_name"),
        reservation_state_name: child_text(node, "reservation_state_name"),
        event_locator: child_text(node, "event_locator"),
        expected_count: child_text(node, "expected_count"),
        reservation_start_dt: child_text(node, "reservation_start_dt"),
        reservation_end_dt: child_text(node, "reservation_end_dt"),
        last_mod_dt: child_text(node, "last_mod_dt"),
        organization_name: child_text(node, "organization_name"),
        event_name: child_text(node, "event_name"),
        event_title: child_text(node, "event_title"),
        spaces: parse_spaces(node),
    }
}

/// Parse an id element into its scalar-or-attributed wire form.
fn parse_id(node: Node<'_, '_>, tag: &str) -> Option<IdValue> {
    let element = find_child(node, tag)?;
    let text = element
        .text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if element.attributes().next().is_some() {
        Some(IdValue::Attributed { text })
    } else {
        text.map(IdValue::Scalar)
    }
}

/// Collect `space_reservation` children into the tagged assignment shape.
fn parse_spaces(node: Node<'_, '_>) -> SpaceAssignment {
    let mut spaces: Vec<Space> = find_children(node, "space_reservation")
        .map(|space| Space {
            formal_name: child_text(space, "formal_name"),
            space_name: child_text(space, "space_name"),
        })
        .collect();

    match spaces.len() {
        0 => SpaceAssignment::Absent,
        1 => SpaceAssignment::Single(spaces.remove(0)),
        _ => SpaceAssignment::Many(spaces),
    }
}
