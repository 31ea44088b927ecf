//! Historical dataset provider
//!
//! Holds the read-only collection of [`HistoricalRecord`]s sorted by
//! departure date. Loading happens once at startup; afterwards the dataset is
//! shared immutably (typically behind an `Arc`) across concurrent requests.

mod csv_loader;

pub use csv_loader::{parse_timestamp, REQUIRED_COLUMNS};

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::error::SimResult;
use crate::types::HistoricalRecord;

/// Sorted, immutable collection of historical records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalDataset {
    records: Vec<HistoricalRecord>,
}

/// Dataset overview for health and info endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub extreme_records: usize,
    pub first_departure: Option<NaiveDateTime>,
    pub last_departure: Option<NaiveDateTime>,
}

impl HistoricalDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from in-memory records, sorting by departure date.
    pub fn from_records(mut records: Vec<HistoricalRecord>) -> Self {
        records.sort_by(|a, b| a.departure_date.cmp(&b.departure_date));
        Self { records }
    }

    /// Load a CSV file. Fails fast on a missing column or unparseable date.
    pub fn from_csv_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "Loaded historical dataset"
        );
        Ok(dataset)
    }

    /// Load CSV from any reader (header row required).
    pub fn from_reader<R: Read>(reader: R) -> SimResult<Self> {
        let records = csv_loader::read_records(reader)?;
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with `start <= departure_date < end`.
    pub fn window(&self, start: NaiveDateTime, end: NaiveDateTime) -> &[HistoricalRecord] {
        if end <= start {
            return &[];
        }
        let lo = self.records.partition_point(|r| r.departure_date < start);
        let hi = self.records.partition_point(|r| r.departure_date < end);
        &self.records[lo..hi]
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.records.len(),
            extreme_records: self.records.iter().filter(|r| r.is_extreme()).count(),
            first_departure: self.records.first().map(|r| r.departure_date),
            last_departure: self.records.last().map(|r| r.departure_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_from_records_sorts() {
        let ds = HistoricalDataset::from_records(vec![
            HistoricalRecord::at(at(2024, 3, 10)),
            HistoricalRecord::at(at(2024, 1, 5)),
            HistoricalRecord::at(at(2024, 2, 1)),
        ]);
        let dates: Vec<_> = ds.records().iter().map(|r| r.departure_date).collect();
        assert_eq!(dates, vec![at(2024, 1, 5), at(2024, 2, 1), at(2024, 3, 10)]);
    }

    #[test]
    fn test_window_is_half_open() {
        let ds = HistoricalDataset::from_records(vec![
            HistoricalRecord::at(at(2024, 1, 1)),
            HistoricalRecord::at(at(2024, 1, 15)),
            HistoricalRecord::at(at(2024, 1, 29)),
        ]);
        let w = ds.window(at(2024, 1, 1), at(2024, 1, 29));
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].departure_date, at(2024, 1, 1));
        assert_eq!(w[1].departure_date, at(2024, 1, 15));
    }

    #[test]
    fn test_window_inverted_bounds_is_empty() {
        let ds = HistoricalDataset::from_records(vec![HistoricalRecord::at(at(2024, 1, 1))]);
        assert!(ds.window(at(2024, 2, 1), at(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_summary() {
        let mut extreme = HistoricalRecord::at(at(2024, 2, 1));
        extreme.weather_status = "Ekstrem".into();
        let ds = HistoricalDataset::from_records(vec![
            extreme,
            HistoricalRecord::at(at(2024, 1, 1)),
        ]);
        let s = ds.summary();
        assert_eq!(s.records, 2);
        assert_eq!(s.extreme_records, 1);
        assert_eq!(s.first_departure, Some(at(2024, 1, 1)));
        assert_eq!(s.last_departure, Some(at(2024, 2, 1)));

        let empty = HistoricalDataset::empty().summary();
        assert_eq!(empty.records, 0);
        assert!(empty.first_departure.is_none());
    }
}
