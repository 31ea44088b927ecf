//! Keyword intent classification for chat messages

use serde::Serialize;

/// Words that mark a message as a simulation request. The operational
/// vocabulary is Indonesian; English equivalents are accepted as well.
const SIMULATION_KEYWORDS: &[&str] = &[
    "simulasi",
    "prediksi",
    "produksi",
    "minggu",
    "target",
    "kapasitas",
    "delay",
    "simulate",
    "simulation",
    "predict",
    "production",
    "capacity",
];

/// Words that route a simulation request to the shipping path.
const SHIPPING_KEYWORDS: &[&str] = &[
    "kapal",
    "vessel",
    "shipping",
    "delay",
    "arrival",
    "departure",
    "voyage",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    Mining,
    Shipping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Simulation(SimulationKind),
    General,
}

impl Intent {
    pub fn is_simulation(&self) -> bool {
        matches!(self, Intent::Simulation(_))
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Simulation if any simulation keyword appears; shipping if a shipping
/// keyword appears as well. Everything else is general chat.
pub fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();
    if !contains_any(&lower, SIMULATION_KEYWORDS) {
        return Intent::General;
    }
    if contains_any(&lower, SHIPPING_KEYWORDS) {
        Intent::Simulation(SimulationKind::Shipping)
    } else {
        Intent::Simulation(SimulationKind::Mining)
    }
}
