//! Free-text simulation request parsing
//!
//! The first `YYYY-MM-DD` in the message is the week start; the first number
//! outside that date is the target tonnage. Either one falls back to a
//! default when absent or unusable, and the fallback is reported.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

const DATE_PATTERN: &str = r"\d{4}-\d{2}-\d{2}";
const NUMBER_PATTERN: &str = r"\d+(?:[.,]\d+)*";

/// Compiled once; `None` only if the pattern failed to compile.
fn date_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PATTERN).ok()).as_ref()
}

fn number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NUMBER_PATTERN).ok()).as_ref()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub target_ton: f64,
    pub week_start: NaiveDate,
    /// Target was absent or unusable and the default was taken
    pub target_defaulted: bool,
    /// Date was absent or invalid and today was taken
    pub week_start_defaulted: bool,
}

/// Parse a number written with `.`/`,` as thousands or decimal separators.
///
/// `12.000` and `12,000` are twelve thousand (every group after a separator
/// has three digits); `12.5` and `12,5` are twelve and a half.
fn parse_amount(raw: &str) -> Option<f64> {
    let groups: Vec<&str> = raw.split(['.', ',']).collect();
    let normalized = if groups.len() > 1 && groups[1..].iter().all(|g| g.len() == 3) {
        groups.concat()
    } else if groups.len() == 2 {
        format!("{}.{}", groups[0], groups[1])
    } else if groups.len() == 1 {
        raw.to_string()
    } else {
        return None;
    };
    normalized.parse::<f64>().ok()
}

pub fn parse_simulation_request(
    message: &str,
    today: NaiveDate,
    default_target_ton: f64,
) -> SimulationRequest {
    let date_match = date_re().and_then(|re| re.find(message));
    let parsed_date =
        date_match.and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());

    // Blank out the date so its digits are not read as the target
    let without_date = match date_match {
        Some(m) => {
            let mut s = message.to_string();
            s.replace_range(m.range(), &" ".repeat(m.len()));
            s
        }
        None => message.to_string(),
    };

    let parsed_target = number_re()
        .and_then(|re| re.find(&without_date))
        .and_then(|m| parse_amount(m.as_str()))
        .filter(|t| t.is_finite() && *t > 0.0);

    SimulationRequest {
        target_ton: parsed_target.unwrap_or(default_target_ton),
        week_start: parsed_date.unwrap_or(today),
        target_defaulted: parsed_target.is_none(),
        week_start_defaulted: parsed_date.is_none(),
    }
}
