//! Batch scheduling across a date horizon.
//!
//! A larger lookahead horizon is partitioned into fixed-width windows, each
//! fetched independently. A failed window is logged and skipped; the run
//! continues with the next window. That isolate-and-continue loop is the
//! only resilience policy in the system - there is no per-request retry.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::{HarvestError, Result};
use crate::normalize::EventTypeFilter;
use crate::record::Reservation;
use crate::scrape::scrape_range;

/// One contiguous sub-range of the horizon, as relative day offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Inclusive start offset (e.g. "+0").
    pub lookback: String,

    /// Inclusive end offset (e.g. "+6").
    pub lookahead: String,
}

impl Window {
    /// Partition `[0, days_ahead)` into windows of `step_size` days.
    ///
    /// The final window is truncated when `days_ahead` is not an exact
    /// multiple of `step_size`.
    ///
    /// # Errors
    /// `HarvestError::InvalidStepSize` when `step_size` is zero.
    pub fn partition(days_ahead: u32, step_size: u32) -> Result<Vec<Window>> {
        if step_size == 0 {
            return Err(HarvestError::InvalidStepSize(step_size));
        }

        let windows = (0..days_ahead)
            .step_by(step_size as usize)
            .map(|offset| {
                let last_day = offset.saturating_add(step_size).min(days_ahead) - 1;
                Window {
                    lookback: format!("+{offset}"),
                    lookahead: format!("+{last_day}"),
                }
            })
            .collect();

        Ok(windows)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.lookback, self.lookahead)
    }
}

/// Outcome of one window's fetch.
#[derive(Debug)]
pub struct WindowOutcome {
    pub window: Window,
    pub outcome: Result<Vec<Reservation>>,
}

/// Aggregated result of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// All records from successful windows, in window order.
    pub records: Vec<Reservation>,

    /// Windows that failed, with their bounds.
    pub failed_windows: Vec<Window>,

    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Total record count across successful windows.
    pub fn total_records(&self) -> usize {
        self.records.len()
    }
}

/// Run the harvester over the full horizon.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `config` - API credentials
/// * `days_ahead` - Total horizon in days
/// * `step_size` - Window width in days
/// * `filter` - Event-type filter for every window
pub fn run(
    client: &Client,
    config: &Config,
    days_ahead: u32,
    step_size: u32,
    filter: &EventTypeFilter,
) -> Result<BatchReport> {
    run_with(days_ahead, step_size, |window| {
        scrape_range(client, config, &window.lookback, &window.lookahead, filter)
    })
}

/// Batch loop over an injectable per-window fetch.
///
/// Windows are processed strictly in sequence; each outcome is recorded
/// before aggregation so a failure never hides behind the totals.
pub fn run_with<F>(days_ahead: u32, step_size: u32, mut fetch: F) -> Result<BatchReport>
where
    F: FnMut(&Window) -> Result<Vec<Reservation>>,
{
    let windows = Window::partition(days_ahead, step_size)?;
    let started = Instant::now();

    let mut outcomes: Vec<WindowOutcome> = Vec::with_capacity(windows.len());
    for window in windows {
        tracing::info!(window = %window, "Scraping window");
        let outcome = fetch(&window);

        if let Err(error) = &outcome {
            tracing::error!(window = %window, error = %error, "Window failed; continuing");
        }

        outcomes.push(WindowOutcome { window, outcome });
    }

    let mut records = Vec::new();
    let mut failed_windows = Vec::new();
    for entry in outcomes {
        match entry.outcome {
            Ok(batch) => records.extend(batch),
            Err(_) => failed_windows.push(entry.window),
        }
    }

    Ok(BatchReport {
        records,
        failed_windows,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(event_type: &str) -> Reservation {
        use crate::envelope::RawReservation;
        use crate::normalize::normalize;

        let raw = RawReservation {
            event_type_name: Some(event_type.to_string()),
            ..RawReservation::default()
        };
        normalize(&raw)
    }

    #[test]
    fn test_partition_exact_multiple() {
        let windows = Window::partition(14, 7).unwrap();
        assert_eq!(
            windows,
            vec![
                Window {
                    lookback: "+0".to_string(),
                    lookahead: "+6".to_string()
                },
                Window {
                    lookback: "+7".to_string(),
                    lookahead: "+13".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_partition_truncates_final_window() {
        let windows = Window::partition(10, 7).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].lookback, "+7");
        assert_eq!(windows[1].lookahead, "+9");
    }

    #[test]
    fn test_partition_zero_horizon() {
        assert!(Window::partition(0, 7).unwrap().is_empty());
    }

    #[test]
    fn test_partition_handles_extreme_bounds() {
        // Near-max values must not overflow the offset arithmetic
        let windows = Window::partition(u32::MAX, u32::MAX - 1).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].lookback, "+0");
        assert_eq!(windows[0].lookahead, format!("+{}", u32::MAX - 2));
        assert_eq!(windows[1].lookback, format!("+{}", u32::MAX - 1));
        assert_eq!(windows[1].lookahead, format!("+{}", u32::MAX - 1));
    }

    #[test]
    fn test_partition_rejects_zero_step() {
        assert!(matches!(
            Window::partition(14, 0),
            Err(HarvestError::InvalidStepSize(0))
        ));
    }

    #[test]
    fn test_failed_window_does_not_abort_run() {
        let report = run_with(21, 7, |window| {
            if window.lookback == "+7" {
                Err(HarvestError::MissingElement {
                    element: "reservation".to_string(),
                    context: "page 2 of 3".to_string(),
                })
            } else {
                Ok(vec![record("BL-Lecture"), record("IN-Meeting")])
            }
        })
        .unwrap();

        // Windows 1 and 3 contribute; window 2 contributes zero
        assert_eq!(report.total_records(), 4);
        assert_eq!(report.failed_windows.len(), 1);
        assert_eq!(report.failed_windows[0].lookback, "+7");
    }

    #[test]
    fn test_windows_processed_in_order() {
        let mut seen = Vec::new();
        run_with(21, 7, |window| {
            seen.push(window.lookback.clone());
            Ok(Vec::new())
        })
        .unwrap();
        assert_eq!(seen, vec!["+0", "+7", "+14"]);
    }
}
