//! Synthetic voyage dataset generator
//!
//! Writes a CSV with every column the dataset loader requires, one voyage
//! every few hours, with seasonal rainfall and occasional storm spells that
//! slow vessels down and mark records extreme.
//!
//! # Usage
//! ```bash
//! ./synth-dataset --start 2024-01-01 --days 120 --seed 7 > history.csv
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use mining_value::dataset::REQUIRED_COLUMNS;

// ============================================================================
// Fleet Constants
// ============================================================================

/// Barge capacity (tons)
const CAPACITY_TON: f64 = 7_500.0;
/// Mean cargo as a fraction of capacity
const MEAN_FILL: f64 = 0.85;
/// Route distance (km)
const BASE_DISTANCE: f64 = 180.0;
/// Planned speed (km/h)
const BASE_SPEED: f64 = 18.0;
/// Probability that a day starts a storm spell
const STORM_ONSET: f64 = 0.06;

#[derive(Parser, Debug)]
#[command(name = "synth-dataset")]
#[command(about = "Generate a synthetic historical voyage CSV")]
#[command(version)]
struct Args {
    /// First departure date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    /// Number of days to generate
    #[arg(short, long, default_value = "90", value_parser = clap::value_parser!(u32).range(1..=3650))]
    days: u32,

    /// Voyages per day
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=24))]
    voyages_per_day: u32,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Weather for one day; storms persist for a few days once started.
struct Weather {
    storm_days_left: u32,
}

impl Weather {
    fn advance(&mut self, rng: &mut StdRng) -> bool {
        if self.storm_days_left > 0 {
            self.storm_days_left -= 1;
        } else if rng.gen_bool(STORM_ONSET) {
            self.storm_days_left = rng.gen_range(1..=3);
        }
        self.storm_days_left > 0
    }
}

fn seasonal_rain(day_of_year: u32) -> f64 {
    let phase = f64::from(day_of_year) / 365.0 * std::f64::consts::TAU;
    // wet season peaks around January
    40.0 + 30.0 * phase.cos()
}

fn fmt_ts(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_dataset<W: Write>(out: W, args: &Args) -> Result<usize> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let noise = Normal::new(0.0, 1.0).context("invalid noise distribution")?;

    let mut writer = csv::Writer::from_writer(out);
    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header.extend(["arrival_estimate", "revised_arrival_estimate"]);
    writer.write_record(&header)?;

    let mut weather = Weather { storm_days_left: 0 };
    let spacing_hours = 24 / i64::from(args.voyages_per_day);
    let mut rows = 0;

    for day in 0..args.days {
        let date = args.start + Duration::days(i64::from(day));
        let storm = weather.advance(&mut rng);
        let day_of_year = chrono::Datelike::ordinal(&date);

        for voyage in 0..args.voyages_per_day {
            let departure = date
                .and_hms_opt(6, 0, 0)
                .context("invalid departure time")?
                + Duration::hours(spacing_hours * i64::from(voyage));

            let rainfall = (seasonal_rain(day_of_year)
                + if storm { 60.0 } else { 0.0 }
                + 15.0 * noise.sample(&mut rng))
            .max(0.0);
            let wind = (if storm { 48.0 } else { 15.0 } + 6.0 * noise.sample(&mut rng)).max(0.0);
            let wave = (if storm { 3.2 } else { 1.0 } + 0.4 * noise.sample(&mut rng)).max(0.1);
            let temperature = 27.0 + 2.0 * noise.sample(&mut rng);
            let humidity = (75.0 + 8.0 * noise.sample(&mut rng)).clamp(30.0, 100.0);

            let distance = BASE_DISTANCE + 10.0 * noise.sample(&mut rng);
            let cargo = (CAPACITY_TON * (MEAN_FILL + 0.08 * noise.sample(&mut rng)))
                .clamp(0.0, CAPACITY_TON * 1.25);
            let load_ratio = cargo / CAPACITY_TON;
            let wsi = (rainfall * 0.2 + wind * 0.4 + wave * 0.4) / 10.0;

            let slowdown = if storm { 0.65 } else { 0.97 };
            let actual_speed =
                (BASE_SPEED * (slowdown + 0.05 * noise.sample(&mut rng))).max(BASE_SPEED * 0.3);
            let duration = distance / actual_speed;

            let planned = departure + Duration::minutes((distance / BASE_SPEED * 60.0) as i64);
            let revised = departure + Duration::minutes((duration * 60.0) as i64);
            let status = if storm && wave > 2.5 { "extreme" } else { "normal" };

            writer.write_record([
                fmt_ts(departure),
                format!("{distance:.1}"),
                format!("{cargo:.1}"),
                format!("{CAPACITY_TON:.1}"),
                format!("{rainfall:.1}"),
                format!("{wind:.1}"),
                format!("{wave:.2}"),
                format!("{temperature:.1}"),
                format!("{humidity:.1}"),
                format!("{wsi:.2}"),
                format!("{load_ratio:.3}"),
                format!("{BASE_SPEED:.1}"),
                format!("{actual_speed:.2}"),
                format!("{duration:.2}"),
                status.to_string(),
                fmt_ts(planned),
                fmt_ts(revised),
            ])?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let rows = match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_dataset(io::BufWriter::new(file), &args)?
        }
        None => write_dataset(io::stdout().lock(), &args)?,
    };
    eprintln!("Generated {rows} voyages");
    Ok(())
}
