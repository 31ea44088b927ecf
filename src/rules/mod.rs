//! Rule Engine
//!
//! Deterministic threshold battery over an already-computed feature vector
//! and achievement percentage. Rules never read raw historical records.
//!
//! ## Ordering
//!
//! ```text
//! weather -> fleet health -> extreme (opt) -> load ratio (opt) -> achievement
//!         -> knowledge-base rules (opt, appended, never interleaved)
//! ```
//!
//! Each fired rule contributes one message and one justification fragment;
//! fragments are joined with single spaces in firing order.

mod knowledge_base;
mod primary;

pub use knowledge_base::evaluate_knowledge_base;
pub use primary::evaluate_primary;

use tracing::debug;

use crate::config::{AppConfig, KnowledgeBaseThresholds, RuleThresholds};
use crate::types::{FeatureVector, Recommendation, RuleId};

/// Ordered rule outcomes of one evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub recommendations: Vec<Recommendation>,
}

impl Evaluation {
    pub fn messages(&self) -> Vec<String> {
        self.recommendations.iter().map(|r| r.message.clone()).collect()
    }

    pub fn fired_rules(&self) -> Vec<RuleId> {
        self.recommendations.iter().map(|r| r.rule).collect()
    }

    /// Justification fragments joined with single spaces.
    pub fn justification(&self) -> String {
        self.recommendations
            .iter()
            .map(|r| r.justification.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `(recommendations, justification)`
    pub fn into_parts(self) -> (Vec<String>, String) {
        let justification = self.justification();
        let messages = self.recommendations.into_iter().map(|r| r.message).collect();
        (messages, justification)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    primary: RuleThresholds,
    knowledge_base: KnowledgeBaseThresholds,
}

impl RuleEngine {
    pub fn new(primary: RuleThresholds, knowledge_base: KnowledgeBaseThresholds) -> Self {
        Self {
            primary,
            knowledge_base,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.rules.clone(), config.knowledge_base.clone())
    }

    /// Primary battery only.
    pub fn evaluate(&self, features: &FeatureVector, achievement_percent: f64) -> Evaluation {
        Evaluation {
            recommendations: evaluate_primary(features, achievement_percent, &self.primary),
        }
    }

    /// Primary battery followed by the knowledge-base rules.
    ///
    /// `shipments` is the number of records in the feature window.
    pub fn evaluate_all(
        &self,
        features: &FeatureVector,
        shipments: usize,
        achievement_percent: f64,
    ) -> Evaluation {
        let mut evaluation = self.evaluate(features, achievement_percent);
        let primary_count = evaluation.recommendations.len();
        evaluation
            .recommendations
            .extend(evaluate_knowledge_base(features, shipments, &self.knowledge_base));

        debug!(
            primary = primary_count,
            knowledge_base = evaluation.recommendations.len() - primary_count,
            "Rules evaluated"
        );
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleCategory;

    #[test]
    fn test_exactly_one_per_mandatory_category() {
        let engine = RuleEngine::default();
        for wf in [0.0, 41.0, 100.0] {
            for (actual, base) in [(10.0, 100.0), (70.0, 100.0), (100.0, 100.0), (3.0, 0.0)] {
                for ach in [0.0, 84.0, 85.0, 300.0] {
                    let fv = FeatureVector {
                        weather_factor: wf,
                        actual_speed: actual,
                        base_speed: base,
                        ..Default::default()
                    };
                    let rules = engine.evaluate_all(&fv, 0, ach).fired_rules();
                    for cat in [
                        RuleCategory::WeatherSeverity,
                        RuleCategory::FleetHealth,
                        RuleCategory::Achievement,
                    ] {
                        assert_eq!(
                            rules.iter().filter(|r| r.category() == cat).count(),
                            1,
                            "{cat:?} for wf={wf} speed={actual}/{base} ach={ach}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_knowledge_base_after_primary() {
        let fv = FeatureVector {
            wind_speed_kmh: 60.0,
            load_ratio: 2.0,
            ..Default::default()
        };
        let rules = RuleEngine::default().evaluate_all(&fv, 1, 10.0).fired_rules();
        let last_primary = rules.iter().rposition(|r| !r.is_knowledge_base()).unwrap();
        let first_kb = rules.iter().position(|r| r.is_knowledge_base()).unwrap();
        assert!(last_primary < first_kb);
        assert_eq!(rules[last_primary], RuleId::AchievementAtRisk);
    }

    #[test]
    fn test_justification_joined_with_single_spaces() {
        let evaluation = RuleEngine::default().evaluate(&FeatureVector::default(), 0.0);
        let fragments: Vec<_> = evaluation
            .recommendations
            .iter()
            .map(|r| r.justification.clone())
            .collect();
        assert_eq!(evaluation.justification(), fragments.join(" "));
        assert!(!evaluation.justification().contains("  "));

        let (messages, justification) = evaluation.into_parts();
        assert_eq!(messages.len(), 3);
        assert_eq!(justification, fragments.join(" "));
    }
}
