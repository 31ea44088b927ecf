//! Prompt builders for narrating simulation results

use crate::types::{MiningSimulationResult, ShippingBatchResult};

const PERSONA: &str = "You are an expert mining and shipping operations assistant.";
const TASK: &str = "Explain the result in natural language, focusing on what was asked. \
Do not invent numbers that are not in the data above.";

/// Narration prompt for a weekly mining simulation.
pub fn mining_prompt(result: &MiningSimulationResult, user_message: &str) -> String {
    let history_note = if result.window.insufficient_history {
        "Note: no historical records in the window; features are zero.\n"
    } else {
        ""
    };
    let features: String = result
        .input_features
        .iter()
        .map(|(name, value)| format!("  {name}: {value:.3}\n"))
        .collect();
    let recommendations: String = result
        .recommendations
        .iter()
        .map(|rec| format!("  - {rec}\n"))
        .collect();

    format!(
        r#"{PERSONA}
Question: '{user_message}'

MINING SIMULATION RESULT
Week start: {week_start}
Target production: {target:.1} ton
Predicted production: {predicted:.1} ton ({source} prediction)
Achievement: {achievement:.1}%
History window: {window_start} to {window_end} ({shipments} shipments)
{history_note}Input features:
{features}Recommendations:
{recommendations}
{TASK}"#,
        week_start = result.week_start,
        target = result.target_ton,
        predicted = result.predicted_production_ton,
        source = result.prediction_source,
        achievement = result.achievement_percent,
        window_start = result.window.start,
        window_end = result.window.end,
        shipments = result.window.shipments,
    )
}

/// Narration prompt for per-voyage shipping estimates.
pub fn shipping_prompt(batch: &ShippingBatchResult, user_message: &str) -> String {
    let week_line = batch
        .week_start
        .map(|week| format!("Week start: {week}\n"))
        .unwrap_or_default();
    let scenario_note = if batch.used_default_scenario {
        "No voyages in the history window; a default voyage scenario was used.\n"
    } else {
        ""
    };
    let voyages: String = batch
        .results
        .iter()
        .map(|r| {
            format!(
                "  - departure {}: risk {}, speed {}, predicted delay {:.2} h ({}), cargo {:.0} ton\n",
                r.departure_date,
                r.risk_level,
                r.speed_status,
                r.predicted_delay_hours,
                r.prediction_source,
                r.input_features.cargo_volume_ton
            )
        })
        .collect();

    format!(
        r#"{PERSONA}
Question: '{user_message}'

SHIPPING DELAY PREDICTION
{week_line}{scenario_note}Voyages: {count}, high risk: {high_risk}, average predicted delay: {avg_delay:.2} hours
{voyages}
{TASK}"#,
        count = batch.results.len(),
        high_risk = batch.high_risk_count,
        avg_delay = batch.average_delay_hours,
    )
}

/// Plain chat prompt.
pub fn general_prompt(user_message: &str) -> String {
    format!("{PERSONA}\nQuestion: '{user_message}'\nAnswer concisely.")
}
