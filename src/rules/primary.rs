//! Primary rule battery
//!
//! Evaluated in fixed order: weather severity, fleet health, extreme weather
//! frequency, load ratio, achievement. Weather, fleet health and achievement
//! always fire exactly one outcome each; extreme weather and load ratio are
//! conditional.

use crate::config::RuleThresholds;
use crate::types::{FeatureVector, Recommendation, RuleId};

fn rec(rule: RuleId, message: String, justification: String) -> Recommendation {
    Recommendation {
        rule,
        message,
        justification,
    }
}

pub(super) fn weather_severity(fv: &FeatureVector, t: &RuleThresholds) -> Recommendation {
    let wf = fv.weather_factor;
    if wf > t.weather_severe {
        rec(
            RuleId::WeatherSevere,
            format!(
                "Severe weather expected (weather factor {wf:.1}): apply operational mitigation and reschedule exposed voyages."
            ),
            format!("weather_factor={wf:.2} > {}.", t.weather_severe),
        )
    } else if wf > t.weather_moderate {
        rec(
            RuleId::WeatherModerate,
            format!(
                "Moderate weather impact (weather factor {wf:.1}): monitor forecasts and keep buffer time in schedules."
            ),
            format!(
                "weather_factor={wf:.2} in ({}, {}].",
                t.weather_moderate, t.weather_severe
            ),
        )
    } else {
        rec(
            RuleId::WeatherFavorable,
            format!("Favorable weather conditions (weather factor {wf:.1}): no weather mitigation needed."),
            format!("weather_factor={wf:.2} <= {}.", t.weather_moderate),
        )
    }
}

pub(super) fn fleet_health(fv: &FeatureVector, t: &RuleThresholds) -> Recommendation {
    let idx = fv.fleet_health_index();
    if idx < t.fleet_health_low {
        rec(
            RuleId::FleetHealthLow,
            format!("Low fleet health (index {idx:.2}): maintenance needed before the next dispatch."),
            format!("fleet_health_index={idx:.2} < {}.", t.fleet_health_low),
        )
    } else if idx < t.fleet_health_degraded {
        rec(
            RuleId::FleetHealthDegraded,
            format!("Degraded fleet performance (index {idx:.2}): check the maintenance schedule."),
            format!(
                "fleet_health_index={idx:.2} in [{}, {}).",
                t.fleet_health_low, t.fleet_health_degraded
            ),
        )
    } else {
        rec(
            RuleId::FleetHealthy,
            format!("Fleet healthy (index {idx:.2})."),
            format!("fleet_health_index={idx:.2} >= {}.", t.fleet_health_degraded),
        )
    }
}

pub(super) fn extreme_weather(fv: &FeatureVector, t: &RuleThresholds) -> Option<Recommendation> {
    (fv.is_extreme > t.extreme_weather_fraction).then(|| {
        rec(
            RuleId::ExtremeWeatherFrequent,
            format!(
                "Frequent extreme weather ({:.0}% of recent shipments): prepare contingency plans.",
                fv.is_extreme * 100.0
            ),
            format!(
                "is_extreme={:.2} > {}.",
                fv.is_extreme, t.extreme_weather_fraction
            ),
        )
    })
}

pub(super) fn load_ratio(fv: &FeatureVector, t: &RuleThresholds) -> Option<Recommendation> {
    (fv.load_ratio > t.load_ratio_high).then(|| {
        rec(
            RuleId::LoadRatioHigh,
            format!(
                "High load ratio ({:.2}): risk of fleet over-utilization.",
                fv.load_ratio
            ),
            format!("load_ratio={:.2} > {}.", fv.load_ratio, t.load_ratio_high),
        )
    })
}

pub(super) fn achievement(achievement_percent: f64, t: &RuleThresholds) -> Recommendation {
    if achievement_percent < t.achievement_on_track_percent {
        rec(
            RuleId::AchievementAtRisk,
            format!("Predicted achievement {achievement_percent:.1}%: target at risk."),
            format!(
                "achievement_percent={achievement_percent:.1} < {}.",
                t.achievement_on_track_percent
            ),
        )
    } else {
        rec(
            RuleId::AchievementOnTrack,
            format!("Predicted achievement {achievement_percent:.1}%: target on track."),
            format!(
                "achievement_percent={achievement_percent:.1} >= {}.",
                t.achievement_on_track_percent
            ),
        )
    }
}

/// All primary outcomes in firing order.
pub fn evaluate_primary(
    fv: &FeatureVector,
    achievement_percent: f64,
    t: &RuleThresholds,
) -> Vec<Recommendation> {
    let mut out = Vec::with_capacity(5);
    out.push(weather_severity(fv, t));
    out.push(fleet_health(fv, t));
    out.extend(extreme_weather(fv, t));
    out.extend(load_ratio(fv, t));
    out.push(achievement(achievement_percent, t));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> RuleThresholds {
        RuleThresholds::default()
    }

    fn with_wf(wf: f64) -> FeatureVector {
        FeatureVector {
            weather_factor: wf,
            ..Default::default()
        }
    }

    #[test]
    fn test_weather_band_boundaries() {
        assert_eq!(weather_severity(&with_wf(70.01), &t()).rule, RuleId::WeatherSevere);
        assert_eq!(weather_severity(&with_wf(70.0), &t()).rule, RuleId::WeatherModerate);
        assert_eq!(weather_severity(&with_wf(40.01), &t()).rule, RuleId::WeatherModerate);
        assert_eq!(weather_severity(&with_wf(40.0), &t()).rule, RuleId::WeatherFavorable);
        assert_eq!(weather_severity(&with_wf(12.0), &t()).rule, RuleId::WeatherFavorable);
    }

    #[test]
    fn test_fleet_health_bands() {
        let fv = |actual: f64, base: f64| FeatureVector {
            actual_speed: actual,
            base_speed: base,
            ..Default::default()
        };
        assert_eq!(fleet_health(&fv(50.0, 100.0), &t()).rule, RuleId::FleetHealthLow);
        assert_eq!(fleet_health(&fv(60.0, 100.0), &t()).rule, RuleId::FleetHealthDegraded);
        assert_eq!(fleet_health(&fv(79.0, 100.0), &t()).rule, RuleId::FleetHealthDegraded);
        assert_eq!(fleet_health(&fv(80.0, 100.0), &t()).rule, RuleId::FleetHealthy);
        // No base speed counts as healthy
        assert_eq!(fleet_health(&fv(5.0, 0.0), &t()).rule, RuleId::FleetHealthy);
    }

    #[test]
    fn test_conditional_rules() {
        let fv = FeatureVector {
            is_extreme: 0.3,
            load_ratio: 1.15,
            ..Default::default()
        };
        assert!(extreme_weather(&fv, &t()).is_none());
        assert!(load_ratio(&fv, &t()).is_none());

        let fv = FeatureVector {
            is_extreme: 0.31,
            load_ratio: 1.2,
            ..Default::default()
        };
        assert!(extreme_weather(&fv, &t()).is_some());
        assert!(load_ratio(&fv, &t()).is_some());
    }

    #[test]
    fn test_achievement_boundary() {
        assert_eq!(achievement(84.99, &t()).rule, RuleId::AchievementAtRisk);
        assert_eq!(achievement(85.0, &t()).rule, RuleId::AchievementOnTrack);
        assert!(achievement(84.99, &t()).message.contains("at risk"));
    }

    #[test]
    fn test_full_order_when_everything_fires() {
        let fv = FeatureVector {
            weather_factor: 90.0,
            actual_speed: 10.0,
            base_speed: 100.0,
            is_extreme: 0.5,
            load_ratio: 1.5,
            ..Default::default()
        };
        let rules: Vec<RuleId> = evaluate_primary(&fv, 50.0, &t())
            .into_iter()
            .map(|r| r.rule)
            .collect();
        assert_eq!(
            rules,
            vec![
                RuleId::WeatherSevere,
                RuleId::FleetHealthLow,
                RuleId::ExtremeWeatherFrequent,
                RuleId::LoadRatioHigh,
                RuleId::AchievementAtRisk,
            ]
        );
    }
}
