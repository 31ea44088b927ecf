//! Dataset Loading Tests
//!
//! Loads CSV files from disk through `HistoricalDataset::from_csv_path` and
//! runs both simulation paths on the result.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use mining_value::config::AppConfig;
use mining_value::dataset::HistoricalDataset;
use mining_value::simulation::Simulator;
use mining_value::types::{PredictionSource, RiskLevel, RuleId};
use mining_value::SimulationError;

const HEADER: &str = "departure_date,distance,cargo_volume_ton,capacity_ton,rainfall_mm,\
wind_speed_kmh,wave_height_m,temperature_c,humidity_percent,wsi,load_ratio,base_speed,\
actual_speed,duration,weather_status";

fn write_file(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

#[test]
fn loads_file_and_runs_mining_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{HEADER}\n\
         2024-02-20 06:00:00,100,5000,6000,100,50,3.5,27,80,4,0.83,20,10,10,ekstrem\n\
         2024-02-27 06:00:00,100,5000,6000,,50,3.5,27,80,4,0.83,20,10,10,Extreme\n\
         2023-12-01 06:00:00,100,5000,60000,0,0,0,27,80,4,0.83,20,20,5,normal\n"
    );
    let path = write_file(dir.path(), "history.csv", &body);

    let ds = HistoricalDataset::from_csv_path(&path).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.summary().extreme_records, 2);

    let sim = Simulator::with_defaults(ds);
    let result = sim.run_mining(10_000.0, week()).unwrap();

    assert_eq!(result.window.shipments, 2);
    // the empty rainfall cell is skipped, not averaged as zero
    assert_eq!(result.input_features.rainfall_mm, 100.0);
    assert_eq!(result.input_features.is_extreme, 1.0);
    // 100*0.2 + 50*0.4 + 3.5*0.4
    assert!((result.input_features.weather_factor - 41.4).abs() < 1e-9);
    assert_eq!(result.prediction_source, PredictionSource::HeuristicFallback);
    assert!((result.predicted_production_ton - 4_800.0).abs() < 1e-9);

    assert_eq!(
        &result.fired_rules[..4],
        &[
            RuleId::WeatherModerate,
            RuleId::FleetHealthLow,
            RuleId::ExtremeWeatherFrequent,
            RuleId::AchievementAtRisk,
        ]
    );
    assert!(result.fired_rules.contains(&RuleId::KbHighWind));
    assert!(result.fired_rules.contains(&RuleId::KbLowShipments));
}

#[test]
fn shipping_uses_explicit_arrival_columns() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{HEADER},arrival_estimate,revised_arrival_estimate\n\
         2024-03-01 06:00:00,100,5000,6000,5,10,0.5,27,80,1,0.83,20,20,5,normal,\
         2024-03-01 11:00:00,2024-03-01 14:30:00\n"
    );
    let path = write_file(dir.path(), "arrivals.csv", &body);

    let sim = Simulator::with_defaults(HistoricalDataset::from_csv_path(&path).unwrap());
    let batch = sim.run_shipping(week(), 10_000.0).unwrap();

    assert_eq!(batch.results.len(), 1);
    let r = &batch.results[0];
    assert!((r.delay_hours - 3.5).abs() < 1e-9);
    assert_eq!(r.risk_level, RiskLevel::Low);
    assert_eq!(batch.high_risk_count, 0);
}

#[test]
fn missing_column_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let header = HEADER.replace(",wsi", "");
    let path = write_file(dir.path(), "no_wsi.csv", &format!("{header}\n"));

    let err = HistoricalDataset::from_csv_path(&path).unwrap_err();
    assert!(matches!(err, SimulationError::MissingColumn(ref c) if c == "wsi"));
}

#[test]
fn unparseable_date_names_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{HEADER}\n\
         2024-02-20,100,5000,6000,0,0,0,27,80,1,0.8,20,20,5,normal\n\
         yesterday,100,5000,6000,0,0,0,27,80,1,0.8,20,20,5,normal\n"
    );
    let path = write_file(dir.path(), "bad_date.csv", &body);

    match HistoricalDataset::from_csv_path(&path).unwrap_err() {
        SimulationError::InvalidInput(msg) => assert!(msg.contains("row 3"), "{msg}"),
        other => panic!("expected invalid input, got {other}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = HistoricalDataset::from_csv_path("/nonexistent/history.csv").unwrap_err();
    assert!(matches!(err, SimulationError::Io(_)));
}

#[test]
fn simulator_from_config_loads_linear_model() {
    let dir = tempfile::tempdir().unwrap();
    let features: Vec<&str> = mining_value::types::FEATURE_NAMES.to_vec();
    let mut coefficients = vec![0.0; features.len()];
    coefficients[0] = 10.0; // distance
    let model = serde_json::json!({
        "features": features,
        "intercept": 1000.0,
        "coefficients": coefficients,
    });
    let model_path = write_file(dir.path(), "mining_model.json", &model.to_string());

    let mut config = AppConfig::default();
    config.model.mining_model_path = Some(model_path);

    let ds = HistoricalDataset::from_reader(
        format!("{HEADER}\n2024-03-01,200,5000,6000,0,0,0,27,80,1,0.8,20,20,5,normal\n")
            .as_bytes(),
    )
    .unwrap();
    let sim = Simulator::from_config(&config, Arc::new(ds)).unwrap();
    let result = sim.run_mining(3_000.0, week()).unwrap();

    assert_eq!(result.prediction_source, PredictionSource::ModelBacked);
    assert!((result.predicted_production_ton - 3_000.0).abs() < 1e-9);
    assert!((result.achievement_percent - 100.0).abs() < 1e-6);
}
