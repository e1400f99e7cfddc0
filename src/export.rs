//! CSV export for normalized reservations.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::record::Reservation;

/// One CSV row; absent fields export as empty strings.
#[derive(Debug, Serialize)]
struct Row<'a> {
    name: &'a str,
    organization: &'a str,
    location_full: &'a str,
    location_abbr: &'a str,
    start_date_friendly: &'a str,
    end_date_friendly: &'a str,
    expected_attendance: &'a str,
    event_type: &'a str,
    reservation_state: &'a str,
}

impl<'a> Row<'a> {
    fn from_record(record: &'a Reservation) -> Self {
        let times = record.times.as_ref();
        Self {
            name: record.name.as_deref().unwrap_or(""),
            organization: record.organization.as_deref().unwrap_or(""),
            location_full: &record.location_full,
            location_abbr: &record.location_abbr,
            start_date_friendly: times.map(|t| t.start_friendly.as_str()).unwrap_or(""),
            end_date_friendly: times.map(|t| t.end_friendly.as_str()).unwrap_or(""),
            expected_attendance: record.expected_attendance.as_deref().unwrap_or(""),
            event_type: record.event_type.as_deref().unwrap_or(""),
            reservation_state: record.reservation_state.as_deref().unwrap_or(""),
        }
    }
}

/// Write reservations to a CSV file with a header row.
pub fn write_csv(records: &[Reservation], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(Row::from_record(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{RawReservation, Space, SpaceAssignment};
    use crate::normalize::normalize;
    use std::fs;

    fn sample() -> Reservation {
        normalize(&RawReservation {
            event_name: Some("Orientation".to_string()),
            event_type_name: Some("BL-Lecture".to_string()),
            reservation_state_name: Some("Standard".to_string()),
            organization_name: Some("Admissions".to_string()),
            expected_count: Some("120".to_string()),
            reservation_start_dt: Some("2025-09-01T09:00:00-07:00".to_string()),
            reservation_end_dt: Some("2025-09-01T10:30:00-07:00".to_string()),
            spaces: SpaceAssignment::Single(Space {
                formal_name: Some("Main Hall, Room 101".to_string()),
                space_name: Some("MH 101".to_string()),
            }),
            ..RawReservation::default()
        })
    }

    #[test]
    fn test_write_csv_header_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reservations.csv");

        write_csv(&[sample()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,organization,location_full,location_abbr,start_date_friendly,end_date_friendly,expected_attendance,event_type,reservation_state"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Orientation,Admissions,Main Hall Room 101,MH 101,09/01/2025 09:00 AM,09/01/2025 10:30 AM,120,BL-Lecture,Standard"
        );
    }

    #[test]
    fn test_write_csv_absent_fields_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let record = normalize(&RawReservation::default());
        write_csv(&[record], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, ",,Not Specified,Not Specified,,,,,");
    }
}
