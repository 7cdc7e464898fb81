use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::RiskTier;

/// Risk assessment for one focus disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct FocusRiskEntry {
    pub disease: String,
    pub confidence: f64,
    pub risk: RiskTier,
}

/// One of the highest-probability classes for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct RankedPrediction {
    pub disease: String,
    pub confidence: f64,
}

/// Description and precautions for a disease; every field is optional data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub disease: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
}

impl DiseaseInfo {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.precautions.is_empty()
    }
}

/// Full result of a symptom-based prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub focus_diseases: Vec<FocusRiskEntry>,
    pub top_diseases: Vec<RankedPrediction>,
    /// Enrichment for `top_diseases[0]`, omitted when no reference data exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_disease_info: Option<DiseaseInfo>,
}

impl PredictionReport {
    pub fn top(&self) -> Option<&RankedPrediction> {
        self.top_diseases.first()
    }
}

/// Round a confidence to three decimal places; exact halves go to the even digit.
pub fn round_confidence(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}
