//! Deterministic narration used when no LLM answer is available

use crate::types::{MiningSimulationResult, RiskLevel, ShippingBatchResult};

pub fn narrate_mining(result: &MiningSimulationResult) -> String {
    let mut text = format!(
        "For the week starting {}, predicted production is {:.1} ton against a target of {:.1} ton ({:.1}% achievement, {} estimate).",
        result.week_start,
        result.predicted_production_ton,
        result.target_ton,
        result.achievement_percent,
        result.prediction_source,
    );
    if result.window.insufficient_history {
        text.push_str(" There is no shipment history in the preceding four weeks, so this estimate carries little information.");
    }
    if !result.recommendations.is_empty() {
        text.push_str(" Recommendations: ");
        text.push_str(&result.recommendations.join(" "));
    }
    text
}

pub fn narrate_shipping(batch: &ShippingBatchResult) -> String {
    let n = batch.results.len();
    let mut text = if batch.used_default_scenario {
        "No voyages were recorded in the last four weeks, so a default 100 km voyage was estimated.".to_string()
    } else {
        format!("{n} voyage(s) were estimated.")
    };
    text.push_str(&format!(
        " Average predicted delay is {:.2} hours",
        batch.average_delay_hours
    ));
    match batch.high_risk_count {
        0 => text.push_str(" and no voyage is at high weather risk."),
        k => text.push_str(&format!(
            "; {k} voyage(s) face high weather risk from waves or wind."
        )),
    }
    if let Some(worst) = batch.results.iter().max_by_key(|r| r.risk_level) {
        if worst.risk_level == RiskLevel::Medium {
            text.push_str(" Some voyages face moderate weather risk.");
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::HistoricalDataset;
    use crate::simulation::Simulator;
    use chrono::NaiveDate;

    #[test]
    fn test_mining_narration_mentions_missing_history() {
        let sim = Simulator::with_defaults(HistoricalDataset::empty());
        let week = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let result = sim.run_mining(10_000.0, week).unwrap();
        let text = narrate_mining(&result);
        assert!(text.contains("2024-03-04"));
        assert!(text.contains("no shipment history"));
        assert!(text.contains("target at risk"));
    }

    #[test]
    fn test_shipping_narration_default_scenario() {
        let sim = Simulator::with_defaults(HistoricalDataset::empty());
        let week = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let batch = sim.run_shipping(week, 4_000.0).unwrap();
        let text = narrate_shipping(&batch);
        assert!(text.contains("default 100 km voyage"));
        assert!(text.contains("no voyage is at high weather risk"));
    }
}
