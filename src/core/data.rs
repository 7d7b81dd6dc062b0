use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Convert ds string ("%Y-%m-%d" or "%Y-%m-%d %H:%M:%S") to NaiveDateTime
pub fn parse_ds(ds: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDateTime::parse_from_str(ds, "%Y-%m-%d %H:%M:%S") {
        Some(d)
    } else if let Ok(d) = NaiveDate::parse_from_str(ds, "%Y-%m-%d") {
        Some(d.and_hms_opt(0, 0, 0).unwrap())
    } else {
        None
    }
}

/// Training data as seen by the configuration layer: ordered observation
/// timestamps, observation times normalized to [0, 1], and target values.
#[derive(Debug, Clone, Serialize)]
pub struct TimeDataset {
    pub ds: Vec<NaiveDateTime>,
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

impl TimeDataset {
    pub fn new(ds: Vec<String>, y: Vec<f64>) -> crate::Result<Self> {
        let ts: Vec<NaiveDateTime> = ds
            .iter()
            .map(|s| {
                parse_ds(s).ok_or_else(|| {
                    crate::AugurError::DataValidation(format!("Invalid date format: {}", s))
                })
            })
            .collect::<crate::Result<_>>()?;
        Self::from_timestamps(ts, y)
    }

    pub fn from_timestamps(ds: Vec<NaiveDateTime>, y: Vec<f64>) -> crate::Result<Self> {
        if ds.is_empty() {
            return Err(crate::AugurError::DataValidation(
                "dataset must contain at least one observation".to_string(),
            ));
        }
        if ds.len() != y.len() {
            return Err(crate::AugurError::DataValidation(
                "ds and y must have same length".to_string(),
            ));
        }
        let t = time_scale(&ds);
        Ok(Self { ds, t, y })
    }

    pub fn len(&self) -> usize {
        self.ds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ds.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.ds
    }
}

/// Map timestamps onto [0, 1]. A single-point or constant history maps to 0.
fn time_scale(ds: &[NaiveDateTime]) -> Vec<f64> {
    let t0 = match ds.iter().min() {
        Some(t0) => *t0,
        None => return Vec::new(),
    };
    let t_last = ds.iter().max().copied().unwrap_or(t0);
    let span = t_last - t0;
    let span_s = span.num_microseconds().unwrap_or(1) as f64 / 1_000_000.0;
    ds.iter()
        .map(|ts| {
            let dt = *ts - t0;
            let s = dt.num_microseconds().unwrap_or(0) as f64 / 1_000_000.0;
            if span_s > 0.0 {
                s / span_s
            } else {
                0.0
            }
        })
        .collect()
}
