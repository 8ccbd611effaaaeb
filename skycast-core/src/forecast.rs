//! Windowing of the raw hourly series into the upcoming hours shown on screen.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{HourlyForecastEntry, HourlySeries};

/// Cap on both the number of raw entries scanned and the number of future
/// entries returned. Past hours inside the scan window reduce the output;
/// hours past the window are never considered.
const WINDOW_SIZE: usize = 12;

/// Select the upcoming hours from a raw series.
///
/// Scans at most the first [`WINDOW_SIZE`] raw entries in order, drops hours
/// at or before `now`, and labels each kept hour with its "HH:00" hour of
/// day. A missing probability becomes 0. Pure and deterministic given `now`.
pub fn window_hourly(hourly: &HourlySeries, now: NaiveDateTime) -> Vec<HourlyForecastEntry> {
    let mut entries = Vec::new();

    for (i, raw) in hourly.times.iter().take(WINDOW_SIZE).enumerate() {
        let Some(time) = parse_local(raw) else {
            continue;
        };
        if time <= now {
            continue;
        }

        let probability = hourly
            .precipitation_probability
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(0);

        entries.push(HourlyForecastEntry {
            time: raw.clone(),
            hour_label: format!("{:02}:00", time.hour()),
            precipitation_probability: probability,
        });

        if entries.len() >= WINDOW_SIZE {
            break;
        }
    }

    entries
}

/// Parse an Open-Meteo local timestamp such as "2026-08-04T13:00".
/// A trailing seconds field is tolerated.
fn parse_local(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
