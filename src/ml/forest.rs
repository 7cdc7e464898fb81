//! Decision-tree ensemble classifier loaded from JSON.
//!
//! Layout follows the flat node arrays random-forest libraries export: each
//! node is either a split (`feature`, `threshold`, `left`, `right`) or a leaf
//! carrying per-class weights. A row goes left when
//! `features[feature] <= threshold`. Leaf weights are normalized per tree and
//! the ensemble probability is the mean over trees.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{check_probabilities, Classifier};
use crate::error::{MedriskError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node 0 is the root.
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(
        &self,
        idx: usize,
        n_features: usize,
        n_classes: usize,
    ) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree[{idx}] has no nodes"));
        }
        for (n, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "tree[{idx}] node {n} splits on feature {feature} of {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("tree[{idx}] node {n} threshold is not finite"));
                    }
                    // Children must come after their parent, which also rules out cycles.
                    for child in [left, right] {
                        if *child <= n || *child >= self.nodes.len() {
                            return Err(format!(
                                "tree[{idx}] node {n} has invalid child index {child}"
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "tree[{idx}] leaf {n} has {} class weights, expected {n_classes}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("tree[{idx}] leaf {n} has invalid weights"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("tree[{idx}] leaf {n} weights sum to zero"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, features: &[f64]) -> &[f64] {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl TreeEnsemble {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MedriskError::artifact(path.display().to_string(), e))?;
        let model: Self = serde_json::from_str(&content)
            .map_err(|e| MedriskError::artifact(path.display().to_string(), e))?;
        model
            .validate()
            .map_err(|e| MedriskError::artifact(path.display().to_string(), e))?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.n_features == 0 {
            return Err("n_features must be > 0".to_string());
        }
        if self.n_classes == 0 {
            return Err("n_classes must be > 0".to_string());
        }
        if self.trees.is_empty() {
            return Err("trees must not be empty".to_string());
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx, self.n_features, self.n_classes)?;
        }
        Ok(())
    }
}

impl Classifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "forest"
    }

    fn input_dim(&self) -> usize {
        self.n_features
    }

    fn output_dim(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(MedriskError::MalformedInput(format!(
                "forest input dim mismatch: got {}, expected {}",
                features.len(),
                self.n_features
            )));
        }

        let mut probs = vec![0.0_f64; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_for(features);
            let total: f64 = leaf.iter().sum();
            for (p, w) in probs.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }
        let n_trees = self.trees.len() as f64;
        probs.iter_mut().for_each(|p| *p /= n_trees);

        check_probabilities(probs, self.n_classes)
    }
}
