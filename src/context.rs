//! The immutable service context.
//!
//! Catalogs, model, formatter and reference data are loaded once at startup
//! into a [`ServiceContext`], which is then shared read-only (behind an
//! `Arc`) with every request. Each request is encode -> infer -> format.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::{AppConfig, PredictionConfig};
use crate::domain::{ClassCatalog, DiseaseInfo, PredictionReport, SymptomCatalog, SymptomEntry};
use crate::error::{MedriskError, Result};
use crate::features::{to_f64, FeatureEncoder};
use crate::formatter::RiskFormatter;
use crate::ml::{load_classifier, Classifier};
use crate::reference::ReferenceData;

/// Catalogs, model and formatter that were loaded and checked against each other
pub struct Engine {
    encoder: FeatureEncoder,
    classes: Arc<ClassCatalog>,
    model: Box<dyn Classifier>,
    formatter: RiskFormatter,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("symptoms", &self.encoder.catalog().len())
            .field("classes", &self.classes.len())
            .field("model", &self.model.kind())
            .finish()
    }
}

impl Engine {
    /// Assemble an engine, checking the model shape against both catalogs and
    /// every focus disease against the class catalog.
    pub fn new(
        symptoms: SymptomCatalog,
        classes: ClassCatalog,
        model: Box<dyn Classifier>,
        prediction: &PredictionConfig,
    ) -> Result<Self> {
        if model.input_dim() != symptoms.len() {
            return Err(MedriskError::InvalidConfig(format!(
                "{} model expects {} features, symptom catalog has {}",
                model.kind(),
                model.input_dim(),
                symptoms.len()
            )));
        }
        if model.output_dim() != classes.len() {
            return Err(MedriskError::InvalidConfig(format!(
                "{} model scores {} classes, class catalog has {}",
                model.kind(),
                model.output_dim(),
                classes.len()
            )));
        }

        let classes = Arc::new(classes);
        let formatter = RiskFormatter::new(
            Arc::clone(&classes),
            &prediction.focus_diseases,
            prediction.thresholds(),
            prediction.top_n,
        )?;
        let encoder = FeatureEncoder::new(Arc::new(symptoms), prediction.unknown_symptoms);

        Ok(Self {
            encoder,
            classes,
            model,
            formatter,
        })
    }

    /// Load every artifact named in the configuration.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let artifacts = &config.artifacts;
        let symptoms = SymptomCatalog::from_file(&artifacts.symptoms_path)?;
        let classes = ClassCatalog::from_file(&artifacts.classes_path)?;
        let model = load_classifier(
            &artifacts.model_path,
            artifacts.model_format,
            symptoms.len(),
            classes.len(),
        )?;
        info!(
            symptoms = symptoms.len(),
            classes = classes.len(),
            model = model.kind(),
            "Loaded prediction artifacts"
        );
        Self::new(symptoms, classes, model, &config.prediction)
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn formatter(&self) -> &RiskFormatter {
        &self.formatter
    }

    pub fn model_kind(&self) -> &'static str {
        self.model.kind()
    }

    fn probabilities(&self, features: &[u8]) -> Result<Vec<f64>> {
        self.model
            .predict_proba(&to_f64(features))
            .map_err(into_inference_error)
    }

    fn label_for(&self, features: &[u8]) -> Result<String> {
        let idx = self
            .model
            .predict(&to_f64(features))
            .map_err(into_inference_error)?;
        self.classes
            .label(idx)
            .map(str::to_string)
            .ok_or_else(|| {
                MedriskError::Inference(format!("model predicted unknown class index {idx}"))
            })
    }
}

/// Model failures surface as inference errors whatever the model reported.
fn into_inference_error(err: MedriskError) -> MedriskError {
    match err {
        MedriskError::Inference(_) => err,
        other => MedriskError::Inference(other.to_string()),
    }
}

#[derive(Debug)]
enum EngineState {
    Ready(Engine),
    Unavailable { reason: String },
}

/// Readiness of the prediction engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Ready { model: &'static str },
    Unavailable { reason: String },
}

impl ModelStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

#[derive(Debug)]
pub struct ServiceContext {
    engine: EngineState,
    reference: ReferenceData,
    loaded_at: DateTime<Utc>,
}

impl ServiceContext {
    pub fn new(engine: Engine, reference: ReferenceData) -> Self {
        Self {
            engine: EngineState::Ready(engine),
            reference,
            loaded_at: Utc::now(),
        }
    }

    /// A context that rejects every prediction with `reason`.
    pub fn unavailable(reason: impl Into<String>, reference: ReferenceData) -> Self {
        Self {
            engine: EngineState::Unavailable {
                reason: reason.into(),
            },
            reference,
            loaded_at: Utc::now(),
        }
    }

    /// Build the context from configuration.
    ///
    /// Missing or unreadable artifacts leave the context unready unless
    /// `artifacts.require_model` is set. Inconsistent configuration (focus
    /// disease not in the class catalog, model shape not matching the
    /// catalogs) always fails.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let reference = load_reference(config);

        match Engine::load(config) {
            Ok(engine) => Ok(Self::new(engine, reference)),
            Err(e @ (MedriskError::UnknownFocusDisease(_) | MedriskError::InvalidConfig(_))) => {
                Err(e)
            }
            Err(e) if config.artifacts.require_model => {
                Err(MedriskError::ModelUnavailable(e.to_string()))
            }
            Err(e) => {
                warn!(error = %e, "Prediction engine unavailable, serving errors until restart");
                Ok(Self::unavailable(e.to_string(), reference))
            }
        }
    }

    pub fn status(&self) -> ModelStatus {
        match &self.engine {
            EngineState::Ready(engine) => ModelStatus::Ready {
                model: engine.model_kind(),
            },
            EngineState::Unavailable { reason } => ModelStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn engine(&self) -> Result<&Engine> {
        match &self.engine {
            EngineState::Ready(engine) => Ok(engine),
            EngineState::Unavailable { reason } => {
                Err(MedriskError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Full risk report for a list of symptom names.
    pub fn assess_symptoms<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<PredictionReport> {
        let span = info_span!("assess", request_id = %Uuid::new_v4());
        let _enter = span.enter();

        let engine = self.engine()?;
        let encoded = engine.encoder.encode(symptoms)?;
        if !encoded.unrecognized.is_empty() {
            debug!(unrecognized = ?encoded.unrecognized, "Ignoring unrecognized symptoms");
        }
        self.report_for(engine, &encoded.vector)
    }

    /// Full risk report for a caller-built feature vector.
    pub fn assess_vector(&self, vector: &[i64]) -> Result<PredictionReport> {
        let span = info_span!("assess_vector", request_id = %Uuid::new_v4());
        let _enter = span.enter();

        let engine = self.engine()?;
        let features = engine.encoder.validate_vector(vector)?;
        self.report_for(engine, &features)
    }

    /// Single most likely disease for a list of symptom names.
    pub fn predict_label<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<String> {
        let engine = self.engine()?;
        let encoded = engine.encoder.encode(symptoms)?;
        engine.label_for(&encoded.vector)
    }

    /// Single most likely disease for a caller-built feature vector.
    pub fn predict_label_vector(&self, vector: &[i64]) -> Result<String> {
        let engine = self.engine()?;
        let features = engine.encoder.validate_vector(vector)?;
        engine.label_for(&features)
    }

    pub fn symptoms(&self) -> Result<Vec<SymptomEntry>> {
        Ok(self.engine()?.encoder.catalog().entries())
    }

    pub fn classes(&self) -> Result<Vec<String>> {
        Ok(self.engine()?.classes.labels().to_vec())
    }

    /// Reference info for a class label; a known label without reference data
    /// yields an entry with no description and no precautions.
    pub fn disease_info(&self, disease: &str) -> Result<DiseaseInfo> {
        let engine = self.engine()?;
        if engine.classes.position(disease).is_none() {
            return Err(MedriskError::NotFound(format!("disease '{disease}'")));
        }
        Ok(self
            .reference
            .lookup(disease)
            .cloned()
            .unwrap_or_else(|| DiseaseInfo {
                disease: disease.to_string(),
                ..DiseaseInfo::default()
            }))
    }

    fn report_for(&self, engine: &Engine, features: &[u8]) -> Result<PredictionReport> {
        let probs = engine.probabilities(features)?;
        let mut report = engine.formatter.format(&probs)?;
        report.top_disease_info = report
            .top()
            .and_then(|top| self.reference.lookup(&top.disease))
            .cloned();

        if let Some(top) = report.top() {
            info!(
                active_symptoms = features.iter().filter(|v| **v == 1).count(),
                top = %top.disease,
                confidence = top.confidence,
                "Prediction complete"
            );
        }
        Ok(report)
    }
}

fn load_reference(config: &AppConfig) -> ReferenceData {
    let Some(path) = config.artifacts.reference_path.as_ref() else {
        return ReferenceData::empty();
    };
    if !path.exists() {
        warn!(path = %path.display(), "Reference data file not found, enrichment disabled");
        return ReferenceData::empty();
    }
    match ReferenceData::from_file(path) {
        Ok(data) => {
            info!(diseases = data.len(), "Loaded reference data");
            data
        }
        Err(e) => {
            warn!(error = %e, "Could not load reference data, enrichment disabled");
            ReferenceData::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskTier;
    use crate::ml::MockClassifier;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn prediction_config(focus: &[&str]) -> PredictionConfig {
        PredictionConfig {
            focus_diseases: strings(focus),
            ..PredictionConfig::default()
        }
    }

    fn mock_model(probs: Vec<f64>) -> MockClassifier {
        let mut model = MockClassifier::new();
        model.expect_kind().return_const("mock");
        model.expect_input_dim().return_const(3usize);
        model.expect_output_dim().return_const(3usize);
        model
            .expect_predict_proba()
            .returning(move |_| Ok(probs.clone()));
        model
    }

    fn context_with(model: MockClassifier, reference: ReferenceData) -> ServiceContext {
        let engine = Engine::new(
            SymptomCatalog::new(strings(&["itching", "fever", "cough"])).unwrap(),
            ClassCatalog::new(strings(&["A", "B", "C"])).unwrap(),
            Box::new(model),
            &prediction_config(&["B"]),
        )
        .unwrap();
        ServiceContext::new(engine, reference)
    }

    #[test]
    fn assesses_symptoms_end_to_end() {
        let mut model = MockClassifier::new();
        model.expect_kind().return_const("mock");
        model.expect_input_dim().return_const(3usize);
        model.expect_output_dim().return_const(3usize);
        model
            .expect_predict_proba()
            .withf(|features| features.to_vec() == vec![0.0, 1.0, 0.0])
            .times(1)
            .returning(|_| Ok(vec![0.2, 0.75, 0.05]));

        let ctx = context_with(model, ReferenceData::empty());
        let report = ctx.assess_symptoms(&["fever", "sneezing"]).unwrap();

        assert_eq!(report.focus_diseases[0].disease, "B");
        assert_eq!(report.focus_diseases[0].confidence, 0.75);
        assert_eq!(report.focus_diseases[0].risk, RiskTier::High);
        let top: Vec<&str> = report.top_diseases.iter().map(|p| p.disease.as_str()).collect();
        assert_eq!(top, vec!["B", "A", "C"]);
        assert!(report.top_disease_info.is_none());
    }

    #[test]
    fn enriches_top_prediction_when_reference_exists() {
        let raw = r#"{"B": {"description": "Bee fever", "precautions": ["Rest"]}}"#;
        let reference = ReferenceData::from_json(raw).unwrap();
        let ctx = context_with(mock_model(vec![0.2, 0.75, 0.05]), reference);
        let report = ctx.assess_symptoms(&["fever"]).unwrap();
        let info = report.top_disease_info.unwrap();
        assert_eq!(info.disease, "B");
        assert_eq!(info.description.as_deref(), Some("Bee fever"));
    }

    #[test]
    fn malformed_vector_never_reaches_model() {
        let mut model = MockClassifier::new();
        model.expect_kind().return_const("mock");
        model.expect_input_dim().return_const(3usize);
        model.expect_output_dim().return_const(3usize);
        model.expect_predict_proba().times(0);
        model.expect_predict().times(0);

        let ctx = context_with(model, ReferenceData::empty());
        assert!(matches!(
            ctx.predict_label_vector(&[0, 1]),
            Err(MedriskError::MalformedInput(_))
        ));
        assert!(matches!(
            ctx.assess_vector(&[0, 3, 1]),
            Err(MedriskError::MalformedInput(_))
        ));
    }

    #[test]
    fn predicts_label_from_vector() {
        let mut model = mock_model(vec![0.1, 0.1, 0.8]);
        model.expect_predict().returning(|_| Ok(2));
        let ctx = context_with(model, ReferenceData::empty());
        assert_eq!(ctx.predict_label_vector(&[1, 0, 1]).unwrap(), "C");
    }

    #[test]
    fn model_failure_is_reported_as_inference_error() {
        let mut model = MockClassifier::new();
        model.expect_kind().return_const("mock");
        model.expect_input_dim().return_const(3usize);
        model.expect_output_dim().return_const(3usize);
        model
            .expect_predict_proba()
            .returning(|_| Err(MedriskError::Internal("boom".into())));

        let ctx = context_with(model, ReferenceData::empty());
        let err = ctx.assess_symptoms(&["fever"]).unwrap_err();
        assert!(matches!(err, MedriskError::Inference(ref m) if m.contains("boom")));
    }

    #[test]
    fn unavailable_context_rejects_every_operation() {
        let ctx = ServiceContext::unavailable("model file not found", ReferenceData::empty());
        assert!(!ctx.status().is_ready());
        assert!(matches!(
            ctx.assess_symptoms(&["fever"]),
            Err(MedriskError::ModelUnavailable(_))
        ));
        assert!(matches!(
            ctx.predict_label_vector(&[0, 1, 0]),
            Err(MedriskError::ModelUnavailable(_))
        ));
        assert!(matches!(ctx.symptoms(), Err(MedriskError::ModelUnavailable(_))));
    }

    #[test]
    fn engine_rejects_mismatched_model_shape() {
        let mut model = MockClassifier::new();
        model.expect_kind().return_const("mock");
        model.expect_input_dim().return_const(4usize);
        model.expect_output_dim().return_const(3usize);

        let err = Engine::new(
            SymptomCatalog::new(strings(&["itching", "fever", "cough"])).unwrap(),
            ClassCatalog::new(strings(&["A", "B", "C"])).unwrap(),
            Box::new(model),
            &prediction_config(&["B"]),
        )
        .unwrap_err();
        assert!(matches!(err, MedriskError::InvalidConfig(_)));
    }

    #[test]
    fn engine_rejects_unknown_focus_disease() {
        let err = Engine::new(
            SymptomCatalog::new(strings(&["itching", "fever", "cough"])).unwrap(),
            ClassCatalog::new(strings(&["A", "B", "C"])).unwrap(),
            Box::new(mock_model(vec![0.2, 0.75, 0.05])),
            &prediction_config(&["Hypertension"]),
        )
        .unwrap_err();
        assert!(matches!(err, MedriskError::UnknownFocusDisease(_)));
    }

    #[test]
    fn disease_info_distinguishes_unknown_labels() {
        let ctx = context_with(mock_model(vec![0.2, 0.75, 0.05]), ReferenceData::empty());
        let info = ctx.disease_info("A").unwrap();
        assert_eq!(info.disease, "A");
        assert!(info.is_empty());
        assert!(matches!(ctx.disease_info("Z"), Err(MedriskError::NotFound(_))));
    }

    #[test]
    fn load_without_artifacts_starts_unready() {
        let config = AppConfig::with_artifact_dir("/nonexistent/medrisk");
        let ctx = ServiceContext::load(&config).unwrap();
        assert!(matches!(ctx.status(), ModelStatus::Unavailable { .. }));

        let mut strict = config.clone();
        strict.artifacts.require_model = true;
        assert!(matches!(
            ServiceContext::load(&strict),
            Err(MedriskError::ModelUnavailable(_))
        ));
    }
}
