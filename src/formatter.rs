//! Probability vector -> focus-disease risk list + ranked top-N.

use std::sync::Arc;

use crate::domain::{
    round_confidence, ClassCatalog, FocusRiskEntry, PredictionReport, RankedPrediction,
    RiskThresholds,
};
use crate::error::{MedriskError, Result};

#[derive(Debug, Clone)]
pub struct RiskFormatter {
    classes: Arc<ClassCatalog>,
    /// (label, class index), resolved once at construction
    focus: Vec<(String, usize)>,
    thresholds: RiskThresholds,
    top_n: usize,
}

impl RiskFormatter {
    /// Resolve every focus label against the class catalog.
    ///
    /// A label missing from the catalog is a configuration fault and fails here,
    /// before any request is served.
    pub fn new(
        classes: Arc<ClassCatalog>,
        focus_diseases: &[String],
        thresholds: RiskThresholds,
        top_n: usize,
    ) -> Result<Self> {
        thresholds.validate().map_err(MedriskError::InvalidConfig)?;
        if top_n == 0 {
            return Err(MedriskError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }

        let focus = focus_diseases
            .iter()
            .map(|label| {
                classes
                    .position(label)
                    .map(|idx| (label.clone(), idx))
                    .ok_or_else(|| MedriskError::UnknownFocusDisease(label.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            classes,
            focus,
            thresholds,
            top_n,
        })
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn focus_labels(&self) -> impl Iterator<Item = &str> {
        self.focus.iter().map(|(label, _)| label.as_str())
    }

    fn check_len(&self, probs: &[f64]) -> Result<()> {
        if probs.len() != self.classes.len() {
            return Err(MedriskError::Inference(format!(
                "probability vector has {} scores, class catalog has {} labels",
                probs.len(),
                self.classes.len()
            )));
        }
        Ok(())
    }

    /// Risk entry for each focus disease, in configured order.
    ///
    /// The tier is taken from the unrounded probability; only the reported
    /// confidence is rounded.
    pub fn focus_risks(&self, probs: &[f64]) -> Result<Vec<FocusRiskEntry>> {
        self.check_len(probs)?;
        Ok(self
            .focus
            .iter()
            .map(|(label, idx)| {
                let p = probs[*idx];
                FocusRiskEntry {
                    disease: label.clone(),
                    confidence: round_confidence(p),
                    risk: self.thresholds.classify(p),
                }
            })
            .collect())
    }

    /// The `top_n` most probable classes, descending.
    ///
    /// Uses a stable sort: equal probabilities keep ascending class index order.
    pub fn top_predictions(&self, probs: &[f64]) -> Result<Vec<RankedPrediction>> {
        self.check_len(probs)?;
        Ok(rank_descending(probs)
            .into_iter()
            .take(self.top_n)
            .filter_map(|idx| {
                self.classes.label(idx).map(|label| RankedPrediction {
                    disease: label.to_string(),
                    confidence: round_confidence(probs[idx]),
                })
            })
            .collect())
    }

    pub fn format(&self, probs: &[f64]) -> Result<PredictionReport> {
        Ok(PredictionReport {
            focus_diseases: self.focus_risks(probs)?,
            top_diseases: self.top_predictions(probs)?,
            top_disease_info: None,
        })
    }
}

/// Class indices ordered by probability, highest first, ties by index.
pub fn rank_descending(probs: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|a, b| probs[*b].total_cmp(&probs[*a]));
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskTier;

    fn classes(labels: &[&str]) -> Arc<ClassCatalog> {
        Arc::new(ClassCatalog::new(labels.iter().map(|s| s.to_string()).collect()).unwrap())
    }

    fn formatter(labels: &[&str], focus: &[&str]) -> RiskFormatter {
        let focus: Vec<String> = focus.iter().map(|s| s.to_string()).collect();
        RiskFormatter::new(classes(labels), &focus, RiskThresholds::default(), 3).unwrap()
    }

    #[test]
    fn formats_focus_and_top3() {
        let f = formatter(&["A", "B", "C"], &["B"]);
        let report = f.format(&[0.2, 0.75, 0.05]).unwrap();

        assert_eq!(
            report.focus_diseases,
            vec![FocusRiskEntry {
                disease: "B".into(),
                confidence: 0.75,
                risk: RiskTier::High,
            }]
        );
        let top: Vec<(&str, f64)> = report
            .top_diseases
            .iter()
            .map(|p| (p.disease.as_str(), p.confidence))
            .collect();
        assert_eq!(top, vec![("B", 0.75), ("A", 0.2), ("C", 0.05)]);
    }

    #[test]
    fn unknown_focus_label_fails_construction() {
        let err = RiskFormatter::new(
            classes(&["A", "B"]),
            &["Z".to_string()],
            RiskThresholds::default(),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, MedriskError::UnknownFocusDisease(ref l) if l == "Z"));
    }

    #[test]
    fn tier_uses_unrounded_probability() {
        let f = formatter(&["A", "B"], &["A"]);
        let entry = &f.focus_risks(&[0.6999, 0.3001]).unwrap()[0];
        assert_eq!(entry.confidence, 0.7);
        assert_eq!(entry.risk, RiskTier::Medium);
    }

    #[test]
    fn confidences_are_rounded() {
        let f = formatter(&["A", "B", "C"], &["A"]);
        let report = f.format(&[0.123456, 0.5, 0.376544]).unwrap();
        assert_eq!(report.focus_diseases[0].confidence, 0.123);
        assert_eq!(report.top_diseases[1].confidence, 0.377);
    }

    #[test]
    fn top_n_is_sorted_and_capped() {
        let f = formatter(&["A", "B", "C", "D", "E"], &[]);
        let top = f.top_predictions(&[0.1, 0.3, 0.05, 0.4, 0.15]).unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(top[0].disease, "D");

        let small = formatter(&["A", "B"], &[]);
        assert_eq!(small.top_predictions(&[0.4, 0.6]).unwrap().len(), 2);
    }

    #[test]
    fn ties_keep_catalog_order() {
        assert_eq!(rank_descending(&[0.25, 0.5, 0.25, 0.0]), vec![1, 0, 2, 3]);
        let f = formatter(&["A", "B", "C", "D"], &[]);
        let top = f.top_predictions(&[0.25, 0.25, 0.25, 0.25]).unwrap();
        let names: Vec<&str> = top.iter().map(|p| p.disease.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn rejects_probability_length_mismatch() {
        let f = formatter(&["A", "B", "C"], &["A"]);
        assert!(matches!(
            f.format(&[0.5, 0.5]),
            Err(MedriskError::Inference(_))
        ));
    }
}
