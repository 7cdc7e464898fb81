use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::RiskThresholds;
use crate::features::UnknownSymptomPolicy;
use crate::ml::ModelFormat;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    /// JSON array of symptom identifiers, in training column order
    pub symptoms_path: PathBuf,
    /// JSON array of disease labels, in model output order
    pub classes_path: PathBuf,
    /// Serialized classifier
    pub model_path: PathBuf,
    #[serde(default)]
    pub model_format: ModelFormat,
    /// Optional description/precaution data keyed by disease
    #[serde(default)]
    pub reference_path: Option<PathBuf>,
    /// Refuse to start when the model cannot be loaded (default: start unready)
    #[serde(default)]
    pub require_model: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionConfig {
    /// Diseases always reported with a risk tier, in output order
    #[serde(default = "default_focus_diseases")]
    pub focus_diseases: Vec<String>,
    /// Number of ranked predictions returned
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub unknown_symptoms: UnknownSymptomPolicy,
    /// Lower bound of the High tier
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,
    /// Lower bound of the Medium tier
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,
}

fn default_focus_diseases() -> Vec<String> {
    vec![
        "Hypertension".to_string(),
        "Cardiovascular Disease".to_string(),
        "Type 2 Diabetes".to_string(),
    ]
}

fn default_top_n() -> usize {
    3
}

fn default_high_threshold() -> f64 {
    0.7
}

fn default_medium_threshold() -> f64 {
    0.4
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            focus_diseases: default_focus_diseases(),
            top_n: default_top_n(),
            unknown_symptoms: UnknownSymptomPolicy::default(),
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
        }
    }
}

impl PredictionConfig {
    pub fn thresholds(&self) -> RiskThresholds {
        RiskThresholds {
            high: self.high_threshold,
            medium: self.medium_threshold,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("artifacts.symptoms_path", "artifacts/all_symptoms.json")?
            .set_default("artifacts.classes_path", "artifacts/class_names.json")?
            .set_default("artifacts.model_path", "artifacts/model.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("MEDRISK_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (MEDRISK_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("MEDRISK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Configuration pointing at artifacts under `dir` with every other value defaulted
    pub fn with_artifact_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            server: ServerConfig::default(),
            artifacts: ArtifactsConfig {
                symptoms_path: dir.join("all_symptoms.json"),
                classes_path: dir.join("class_names.json"),
                model_path: dir.join("model.json"),
                model_format: ModelFormat::default(),
                reference_path: Some(dir.join("reference.json")),
                require_model: false,
            },
            prediction: PredictionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.prediction.top_n == 0 {
            errors.push("prediction.top_n must be at least 1".to_string());
        }

        if let Err(e) = self.prediction.thresholds().validate() {
            errors.push(e);
        }

        let mut seen = std::collections::HashSet::new();
        for disease in &self.prediction.focus_diseases {
            if disease.trim().is_empty() {
                errors.push("prediction.focus_diseases contains an empty label".to_string());
            } else if !seen.insert(disease.as_str()) {
                errors.push(format!(
                    "prediction.focus_diseases lists '{disease}' more than once"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
