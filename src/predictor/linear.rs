//! JSON-serialized linear regression model
//!
//! ```json
//! {
//!   "features": ["distance", "capacity_ton", ...],
//!   "intercept": 120.5,
//!   "coefficients": [0.3, 0.75, ...]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::RegressionModel;
use crate::error::{SimResult, SimulationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    features: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(features: Vec<String>, intercept: f64, coefficients: Vec<f64>) -> SimResult<Self> {
        let model = Self {
            features,
            intercept,
            coefficients,
        };
        model.check()?;
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::ModelFile(format!("invalid model JSON: {e}")))?;
        model.check()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::ModelFile(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    fn check(&self) -> SimResult<()> {
        if self.coefficients.len() != self.features.len() {
            return Err(SimulationError::ModelFile(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.features.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(SimulationError::ModelFile(
                "intercept and coefficients must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl RegressionModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict(&self, input: &[f64]) -> Result<f64, String> {
        if input.len() != self.coefficients.len() {
            return Err(format!(
                "expected {} inputs, got {}",
                self.coefficients.len(),
                input.len()
            ));
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(input)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}
