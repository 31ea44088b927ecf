//! CSV row parsing for the historical dataset

use std::collections::HashMap;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{SimResult, SimulationError};
use crate::types::HistoricalRecord;

/// Columns every dataset must carry. `is_extreme` is derived from
/// `weather_status` and is not required.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "departure_date",
    "distance",
    "cargo_volume_ton",
    "capacity_ton",
    "rainfall_mm",
    "wind_speed_kmh",
    "wave_height_m",
    "temperature_c",
    "humidity_percent",
    "wsi",
    "load_ratio",
    "base_speed",
    "actual_speed",
    "duration",
    "weather_status",
];

const ARRIVAL_ESTIMATE: &str = "arrival_estimate";
const REVISED_ARRIVAL_ESTIMATE: &str = "revised_arrival_estimate";

/// Parse a timestamp in any of the accepted dataset formats:
/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (optionally
/// with fractional seconds) or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

/// Column name -> index, keyed by trimmed lowercase header.
struct ColumnIndex(HashMap<String, usize>);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> SimResult<Self> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
            .collect();
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !map.contains_key(**c)) {
            return Err(SimulationError::MissingColumn((*missing).to_string()));
        }
        Ok(Self(map))
    }

    fn cell<'r>(&self, row: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.0.get(name).and_then(|&i| row.get(i)).map(str::trim)
    }

    /// Numeric cell; empty or non-numeric becomes NaN.
    fn number(&self, row: &StringRecord, name: &str) -> f64 {
        self.cell(row, name)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }

    fn optional_timestamp(
        &self,
        row: &StringRecord,
        name: &str,
        line: u64,
    ) -> SimResult<Option<NaiveDateTime>> {
        match self.cell(row, name) {
            None | Some("") => Ok(None),
            Some(raw) => parse_timestamp(raw).map(Some).ok_or_else(|| {
                SimulationError::InvalidInput(format!(
                    "row {line}: unparseable {name} '{raw}'"
                ))
            }),
        }
    }
}

pub(super) fn read_records<R: Read>(reader: R) -> SimResult<Vec<HistoricalRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    let mut records = Vec::new();
    let mut skipped_cells = 0usize;

    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1
        let line = row.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);

        let raw_date = columns.cell(&row, "departure_date").unwrap_or("");
        let departure_date = parse_timestamp(raw_date).ok_or_else(|| {
            SimulationError::InvalidInput(format!(
                "row {line}: unparseable departure_date '{raw_date}'"
            ))
        })?;

        let record = HistoricalRecord {
            departure_date,
            distance: columns.number(&row, "distance"),
            cargo_volume_ton: columns.number(&row, "cargo_volume_ton"),
            capacity_ton: columns.number(&row, "capacity_ton"),
            rainfall_mm: columns.number(&row, "rainfall_mm"),
            wind_speed_kmh: columns.number(&row, "wind_speed_kmh"),
            wave_height_m: columns.number(&row, "wave_height_m"),
            temperature_c: columns.number(&row, "temperature_c"),
            humidity_percent: columns.number(&row, "humidity_percent"),
            wsi: columns.number(&row, "wsi"),
            load_ratio: columns.number(&row, "load_ratio"),
            base_speed: columns.number(&row, "base_speed"),
            actual_speed: columns.number(&row, "actual_speed"),
            duration: columns.number(&row, "duration"),
            weather_status: columns
                .cell(&row, "weather_status")
                .unwrap_or_default()
                .to_string(),
            arrival_estimate: columns.optional_timestamp(&row, ARRIVAL_ESTIMATE, line)?,
            revised_arrival_estimate: columns.optional_timestamp(
                &row,
                REVISED_ARRIVAL_ESTIMATE,
                line,
            )?,
        };

        skipped_cells += [
            record.distance,
            record.capacity_ton,
            record.rainfall_mm,
            record.wind_speed_kmh,
            record.wave_height_m,
            record.actual_speed,
            record.base_speed,
        ]
        .iter()
        .filter(|v| v.is_nan())
        .count();

        records.push(record);
    }

    if skipped_cells > 0 {
        debug!(skipped_cells, "Dataset contains missing numeric cells");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "departure_date,distance,cargo_volume_ton,capacity_ton,rainfall_mm,\
wind_speed_kmh,wave_height_m,temperature_c,humidity_percent,wsi,load_ratio,base_speed,\
actual_speed,duration,weather_status";

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(parse_timestamp("2024-05-06"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("06/05/2024"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let csv = format!(
            "{}\n2024-01-01,100,900,1000,5,10,1,27,80,0.2,0.9,20,18,5,Normal\n",
            HEADER.replace("wsi", "WSI").replace("distance", " Distance ")
        );
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].wsi, 0.2);
        assert_eq!(records[0].distance, 100.0);
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let csv = "departure_date,distance\n2024-01-01,100\n";
        match read_records(csv.as_bytes()) {
            Err(SimulationError::MissingColumn(col)) => assert_eq!(col, "cargo_volume_ton"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_garbage_cells_become_nan() {
        let csv = format!("{HEADER}\n2024-01-01,,900,abc,5,10,1,27,80,0.2,0.9,20,18,5,Normal\n");
        let records = read_records(csv.as_bytes()).unwrap();
        assert!(records[0].distance.is_nan());
        assert!(records[0].capacity_ton.is_nan());
        assert_eq!(records[0].cargo_volume_ton, 900.0);
    }

    #[test]
    fn test_bad_date_names_row() {
        let csv = format!(
            "{HEADER}\n2024-01-01,1,1,1,1,1,1,1,1,1,1,1,1,1,Normal\nnot-a-date,1,1,1,1,1,1,1,1,1,1,1,1,1,Normal\n"
        );
        match read_records(csv.as_bytes()) {
            Err(SimulationError::InvalidInput(msg)) => {
                assert!(msg.contains("row 3"), "{msg}");
                assert!(msg.contains("not-a-date"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_arrival_columns() {
        let csv = format!(
            "{HEADER},arrival_estimate,revised_arrival_estimate\n\
2024-01-01,1,1,1,1,1,1,1,1,1,1,1,1,1,Normal,2024-01-02 06:00:00,\n"
        );
        let records = read_records(csv.as_bytes()).unwrap();
        assert!(records[0].arrival_estimate.is_some());
        assert!(records[0].revised_arrival_estimate.is_none());
    }
}
