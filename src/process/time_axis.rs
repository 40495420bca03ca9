use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PcmError, Result};
use crate::process::ingest::Series;

/// `HH:MM:SS.mmm`, e.g. `11:10:46.215`
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// chrono treats the `%.3f` fraction as optional, so the shape is checked first.
static SAMPLE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}:\d{2}\.\d{3}$").expect("static regex"));

/// Elapsed seconds since the first sample, one entry per data row, in raw row order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub elapsed: Vec<f64>,
}

/// Fast parse of `"HH:MM:SS.mmm"` on a fixed day; only offsets between samples matter.
fn parse_sample_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !SAMPLE_TIME.is_match(s) {
        return None;
    }
    let time = NaiveTime::parse_from_str(s, TIME_FORMAT).ok()?;
    let day = NaiveDate::from_ymd_opt(2010, 1, 1)?;
    Some(day.and_time(time))
}

impl TimeAxis {
    /// Build the axis from the time-of-day column.
    pub fn from_time_column(column: &Series) -> Result<Self> {
        let mut epoch: Option<NaiveDateTime> = None;
        let mut elapsed = Vec::with_capacity(column.cells.len());

        for (idx, cell) in column.cells.iter().enumerate() {
            let sample = cell
                .as_text()
                .and_then(parse_sample_time)
                .ok_or_else(|| {
                    PcmError::structural(format!(
                        "data row {}: malformed timestamp {:?}, expected HH:MM:SS.mmm",
                        idx + 1,
                        cell.to_string()
                    ))
                })?;
            let first = *epoch.get_or_insert(sample);
            let delta = sample - first;
            elapsed.push(delta.num_milliseconds() as f64 / 1_000.0);
        }

        Ok(Self { elapsed })
    }

    pub fn len(&self) -> usize {
        self.elapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed.is_empty()
    }

    /// Row indices ordered by ascending time; ties keep their row order.
    pub fn sorted_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.elapsed.len()).collect();
        order.sort_by(|&a, &b| self.elapsed[a].total_cmp(&self.elapsed[b]));
        order
    }
}
