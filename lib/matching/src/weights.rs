//! Component weights for the overall match score

use serde::{Deserialize, Serialize};
use shopmatch_core::{Error, Result};
use std::fmt;

/// Tolerance on the weight sum
const SUM_TOLERANCE: f64 = 0.001;

/// Upper bound on the quality weight
pub const MAX_QUALITY_WEIGHT: f64 = 0.15;

/// One of the four sub-scores combined into a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Component {
    Keyword,
    Category,
    Constraints,
    Quality,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Keyword,
        Component::Category,
        Component::Constraints,
        Component::Quality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::Keyword => "keyword",
            Component::Category => "category",
            Component::Constraints => "constraints",
            Component::Quality => "quality",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub category: f64,
    pub constraints: f64,
    pub quality: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.40,
            category: 0.25,
            constraints: 0.20,
            quality: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Keyword => self.keyword,
            Component::Category => self.category,
            Component::Constraints => self.constraints,
            Component::Quality => self.quality,
        }
    }

    /// Check the weights are usable as-is. They are never renormalized.
    pub fn validate(&self) -> Result<()> {
        for component in Component::ALL {
            let w = self.get(component);
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(Error::InvalidConfig(format!(
                    "{} weight must be within [0, 1], got {}",
                    component, w
                )));
            }
        }

        if self.quality > MAX_QUALITY_WEIGHT + f64::EPSILON {
            return Err(Error::InvalidConfig(format!(
                "quality weight must not exceed {}, got {}",
                MAX_QUALITY_WEIGHT, self.quality
            )));
        }

        let total: f64 = Component::ALL.iter().map(|c| self.get(*c)).sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "weights must sum to 1.0, got {:.3}",
                total
            )));
        }

        Ok(())
    }

    /// Parse and validate weights given as JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let weights: ScoreWeights = serde_json::from_str(text)
            .map_err(|e| Error::InvalidConfig(format!("malformed weights: {}", e)))?;
        weights.validate()?;
        Ok(weights)
    }
}
