//! Disease descriptions and precautions used to enrich the top prediction.
//!
//! Reference data is optional at every level: the file, a disease's entry,
//! and each field of an entry may all be absent. Lookups return `Option`
//! and never fail a request.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::DiseaseInfo;
use crate::error::{MedriskError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
struct ReferenceEntry {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    precautions: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    entries: HashMap<String, DiseaseInfo>,
}

impl ReferenceData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `{ "<disease>": { "description": "...", "precautions": ["..."] } }`.
    ///
    /// Keys are trimmed; blank descriptions and precautions are dropped.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, ReferenceEntry> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(disease, entry)| {
                let disease = disease.trim().to_string();
                let info = DiseaseInfo {
                    disease: disease.clone(),
                    description: entry
                        .description
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty()),
                    precautions: entry
                        .precautions
                        .into_iter()
                        .flatten()
                        .map(|p| p.trim().to_string())
                        .filter(|p| !p.is_empty())
                        .collect(),
                };
                (disease, info)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MedriskError::artifact(path.display().to_string(), e))?;
        Self::from_json(&content).map_err(|e| MedriskError::artifact(path.display().to_string(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Info for a disease, or `None` when nothing is known about it.
    pub fn lookup(&self, disease: &str) -> Option<&DiseaseInfo> {
        self.entries
            .get(disease.trim())
            .filter(|info| !info.is_empty())
    }
}
