#![allow(dead_code)]

use medrisk::config::AppConfig;
use serde_json::json;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Artifact directory under the system temp dir, removed on drop.
pub struct ArtifactDir {
    pub path: PathBuf,
}

impl ArtifactDir {
    /// Catalog [itching, fever, cough], classes [A, B, C] and a one-tree
    /// forest that yields [0.2, 0.75, 0.05] when fever is set and
    /// [0.6, 0.1, 0.3] otherwise.
    pub fn standard() -> Self {
        let dir = Self::empty();
        dir.write_json("all_symptoms.json", &json!(["itching", "fever", "cough"]));
        dir.write_json("class_names.json", &json!(["A", "B", "C"]));
        dir.write_json("model.json", &forest(3));
        dir.write_json(
            "reference.json",
            &json!({
                "B": {
                    "description": "Description of B",
                    "precautions": ["rest", "fluids", null]
                }
            }),
        );
        dir
    }

    pub fn empty() -> Self {
        let path = std::env::temp_dir().join(format!("medrisk-it-{}", Uuid::new_v4().simple()));
        std::fs::create_dir_all(&path).expect("create temp artifact dir");
        Self { path }
    }

    pub fn write_json(&self, name: &str, value: &serde_json::Value) {
        std::fs::write(self.path.join(name), value.to_string()).expect("write artifact");
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.path.join(name)).expect("remove artifact");
    }

    /// Config with focus disease B only.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::with_artifact_dir(&self.path);
        config.prediction.focus_diseases = vec!["B".to_string()];
        config
    }
}

impl Drop for ArtifactDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// One tree splitting on feature 1 (fever).
pub fn forest(n_features: usize) -> serde_json::Value {
    json!({
        "n_features": n_features,
        "n_classes": 3,
        "trees": [{
            "nodes": [
                {"feature": 1, "threshold": 0.5, "left": 1, "right": 2},
                {"value": [12.0, 2.0, 6.0]},
                {"value": [4.0, 15.0, 1.0]}
            ]
        }]
    })
}

pub fn demo_artifacts() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/artifacts")
}
