pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod features;
pub mod formatter;
pub mod ml;
pub mod output;
pub mod reference;
pub mod server;
pub mod services;

pub use config::AppConfig;
pub use context::{Engine, ModelStatus, ServiceContext};
pub use domain::{
    ClassCatalog, DiseaseInfo, FocusRiskEntry, PredictionReport, RankedPrediction, RiskThresholds,
    RiskTier, SymptomCatalog, SymptomEntry,
};
pub use error::{MedriskError, Result};
pub use features::{EncodedSymptoms, FeatureEncoder, UnknownSymptomPolicy};
pub use formatter::RiskFormatter;
pub use ml::{Classifier, ModelFormat};
pub use reference::ReferenceData;
