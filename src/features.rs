//! Symptom list -> binary feature vector.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::SymptomCatalog;
use crate::error::{MedriskError, Result};

/// What to do with submitted symptom names that are not in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSymptomPolicy {
    /// Drop them; they contribute nothing to the vector.
    #[default]
    Ignore,
    /// Fail the request with a validation error naming them.
    Reject,
}

/// Result of encoding one symptom list
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSymptoms {
    pub vector: Vec<u8>,
    /// Submitted names with no catalog match, in submission order
    pub unrecognized: Vec<String>,
}

impl EncodedSymptoms {
    pub fn active_count(&self) -> usize {
        self.vector.iter().filter(|v| **v == 1).count()
    }

    pub fn as_f64(&self) -> Vec<f64> {
        to_f64(&self.vector)
    }
}

pub fn to_f64(vector: &[u8]) -> Vec<f64> {
    vector.iter().map(|v| f64::from(*v)).collect()
}

#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    catalog: Arc<SymptomCatalog>,
    policy: UnknownSymptomPolicy,
}

impl FeatureEncoder {
    pub fn new(catalog: Arc<SymptomCatalog>, policy: UnknownSymptomPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> UnknownSymptomPolicy {
        self.policy
    }

    /// Set position i to 1 when catalog[i] is among `symptoms`.
    ///
    /// Duplicates collapse to a single 1 and input order is irrelevant.
    pub fn encode<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<EncodedSymptoms> {
        let mut vector = vec![0u8; self.catalog.len()];
        let mut unrecognized = Vec::new();

        for name in symptoms {
            let raw = name.as_ref();
            match self.catalog.resolve(raw) {
                Some(pos) => vector[pos] = 1,
                None => {
                    let name = raw.trim();
                    if !unrecognized.iter().any(|u: &String| u == name) {
                        unrecognized.push(name.to_string());
                    }
                }
            }
        }

        if self.policy == UnknownSymptomPolicy::Reject && !unrecognized.is_empty() {
            return Err(MedriskError::UnknownSymptoms(unrecognized));
        }

        Ok(EncodedSymptoms {
            vector,
            unrecognized,
        })
    }

    /// Catalog identifiers at the positions set to 1.
    pub fn decode(&self, vector: &[u8]) -> Vec<String> {
        vector
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 1)
            .filter_map(|(pos, _)| self.catalog.get(pos).map(str::to_string))
            .collect()
    }

    /// Check a caller-built vector before it reaches the model.
    pub fn validate_vector(&self, vector: &[i64]) -> Result<Vec<u8>> {
        if vector.len() != self.catalog.len() {
            return Err(MedriskError::MalformedInput(format!(
                "feature vector has {} values, expected {}",
                vector.len(),
                self.catalog.len()
            )));
        }
        vector
            .iter()
            .enumerate()
            .map(|(pos, v)| match v {
                0 => Ok(0u8),
                1 => Ok(1u8),
                other => Err(MedriskError::MalformedInput(format!(
                    "feature vector value at position {pos} is {other}, expected 0 or 1"
                ))),
            })
            .collect()
    }
}
