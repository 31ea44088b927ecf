//! Secondary knowledge-base rules
//!
//! General operating guidance, independent of the primary battery. Every rule
//! is conditional; outputs are always appended after the primary ones.

use crate::config::KnowledgeBaseThresholds;
use crate::types::{FeatureVector, Recommendation, RuleId};

pub fn evaluate_knowledge_base(
    fv: &FeatureVector,
    shipments: usize,
    t: &KnowledgeBaseThresholds,
) -> Vec<Recommendation> {
    if !t.enabled {
        return Vec::new();
    }

    let mut out = Vec::new();

    if fv.wind_speed_kmh > t.wind_speed_kmh {
        out.push(Recommendation {
            rule: RuleId::KbHighWind,
            message: "High wind speed: vessel stability may be affected.".to_string(),
            justification: format!(
                "wind_speed_kmh={:.1} > {}.",
                fv.wind_speed_kmh, t.wind_speed_kmh
            ),
        });
    }

    if fv.wave_height_m > t.wave_height_m {
        out.push(Recommendation {
            rule: RuleId::KbHighWave,
            message: format!(
                "Wave height above {} m: loading and unloading are risky.",
                t.wave_height_m
            ),
            justification: format!(
                "wave_height_m={:.2} > {}.",
                fv.wave_height_m, t.wave_height_m
            ),
        });
    }

    if fv.rainfall_mm > t.rainfall_mm {
        out.push(Recommendation {
            rule: RuleId::KbHeavyRainfall,
            message: "Very heavy rainfall: operational delays likely.".to_string(),
            justification: format!("rainfall_mm={:.1} > {}.", fv.rainfall_mm, t.rainfall_mm),
        });
    }

    if shipments < t.min_shipments {
        out.push(Recommendation {
            rule: RuleId::KbLowShipments,
            message: "Low shipment count: review vessel distribution and schedules.".to_string(),
            justification: format!("shipments={shipments} < {}.", t.min_shipments),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        let fv = FeatureVector {
            wind_speed_kmh: 45.0,
            wave_height_m: 3.0,
            rainfall_mm: 80.0,
            ..Default::default()
        };
        assert!(evaluate_knowledge_base(&fv, 3, &KnowledgeBaseThresholds::default()).is_empty());
    }

    #[test]
    fn test_all_fire_in_order() {
        let fv = FeatureVector {
            wind_speed_kmh: 46.0,
            wave_height_m: 3.5,
            rainfall_mm: 81.0,
            ..Default::default()
        };
        let rules: Vec<_> = evaluate_knowledge_base(&fv, 2, &KnowledgeBaseThresholds::default())
            .into_iter()
            .map(|r| r.rule)
            .collect();
        assert_eq!(
            rules,
            vec![
                RuleId::KbHighWind,
                RuleId::KbHighWave,
                RuleId::KbHeavyRainfall,
                RuleId::KbLowShipments
            ]
        );
    }

    #[test]
    fn test_disabled_set_is_silent() {
        let t = KnowledgeBaseThresholds {
            enabled: false,
            ..Default::default()
        };
        assert!(evaluate_knowledge_base(&FeatureVector::default(), 0, &t).is_empty());
    }
}
