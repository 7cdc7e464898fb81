//! Symptom and class catalogs.
//!
//! Both catalogs are ordered and immutable. Their order is the column order
//! the model was trained with, which cannot be verified here and is trusted.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tabled::Tabled;

use crate::error::{MedriskError, Result};

/// Read a JSON array of strings from disk.
fn load_string_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MedriskError::artifact(path.display().to_string(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| MedriskError::artifact(path.display().to_string(), e))
}

/// Build a name -> position index, rejecting empty and duplicate entries.
fn build_index(kind: &str, entries: &[String]) -> Result<HashMap<String, usize>> {
    if entries.is_empty() {
        return Err(MedriskError::Validation(format!("{kind} catalog is empty")));
    }
    let mut index = HashMap::with_capacity(entries.len());
    for (pos, entry) in entries.iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(MedriskError::Validation(format!(
                "{kind} catalog entry {pos} is empty"
            )));
        }
        if index.insert(entry.clone(), pos).is_some() {
            return Err(MedriskError::Validation(format!(
                "{kind} catalog contains duplicate entry '{entry}'"
            )));
        }
    }
    Ok(index)
}

/// Human-readable form of a symptom identifier: `skin_rash` -> `Skin Rash`.
///
/// Words are title-cased: a letter is upper-cased when it follows a
/// non-letter and lower-cased otherwise.
pub fn display_name(symptom: &str) -> String {
    let mut out = String::with_capacity(symptom.len());
    let mut prev_is_letter = false;
    for ch in symptom.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// A symptom identifier paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct SymptomEntry {
    pub id: String,
    pub display_name: String,
}

/// Ordered symptom identifiers defining feature vector positions.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    symptoms: Vec<String>,
    index: HashMap<String, usize>,
    display_index: HashMap<String, usize>,
}

impl SymptomCatalog {
    pub fn new(symptoms: Vec<String>) -> Result<Self> {
        let index = build_index("symptom", &symptoms)?;
        let mut display_index = HashMap::with_capacity(symptoms.len());
        for (pos, symptom) in symptoms.iter().enumerate() {
            display_index.entry(display_name(symptom.trim())).or_insert(pos);
        }
        Ok(Self {
            symptoms,
            index,
            display_index,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(load_string_list(path.as_ref())?)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.symptoms.get(position).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    /// Position of an exact symptom identifier.
    pub fn position(&self, symptom: &str) -> Option<usize> {
        self.index.get(symptom).copied()
    }

    /// Position of a symptom given either its identifier or its display name.
    ///
    /// The exact identifier wins, so ids carrying stray whitespace stay
    /// selectable; then the trimmed name, then the display name.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        if let Some(pos) = self.position(name) {
            return Some(pos);
        }
        let trimmed = name.trim();
        self.position(trimmed).or_else(|| self.display_index.get(trimmed).copied())
    }

    pub fn entries(&self) -> Vec<SymptomEntry> {
        self.symptoms
            .iter()
            .map(|id| SymptomEntry {
                id: id.clone(),
                display_name: display_name(id),
            })
            .collect()
    }
}

/// Ordered disease labels defining probability vector positions.
#[derive(Debug, Clone)]
pub struct ClassCatalog {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl ClassCatalog {
    pub fn new(labels: Vec<String>) -> Result<Self> {
        let index = build_index("class", &labels)?;
        Ok(Self { labels, index })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(load_string_list(path.as_ref())?)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, position: usize) -> Option<&str> {
        self.labels.get(position).map(String::as_str)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
