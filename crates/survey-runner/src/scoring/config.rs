use super::profile::ProfileThresholds;
use serde::{Deserialize, Serialize};

/// Weights of the composite risk value. `consent_gap` applies to `100 - CONSENT`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub consent_gap: f64,
    pub secrecy: f64,
    pub avoidance: f64,
    pub attach_risk: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            consent_gap: 0.35,
            secrecy: 0.25,
            avoidance: 0.20,
            attach_risk: 0.20,
        }
    }
}

/// Composite weighting and profile bands applied after the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: CompositeWeights,
    pub thresholds: ProfileThresholds,
}
