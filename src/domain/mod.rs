pub mod catalog;
pub mod prediction;
pub mod risk;

pub use catalog::{display_name, ClassCatalog, SymptomCatalog, SymptomEntry};
pub use prediction::{
    round_confidence, DiseaseInfo, FocusRiskEntry, PredictionReport, RankedPrediction,
};
pub use risk::{RiskThresholds, RiskTier};
