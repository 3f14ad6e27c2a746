//! Serialized model artifacts.
//!
//! An artifact is a JSON document naming the features it consumes (in the
//! order the model expects them) and one of the supported model bodies:
//!
//! - `linear`: `intercept + Σ coefficients[i] * x[i]`
//! - `tree_ensemble`: regression trees stored as parallel node arrays,
//!   combined by `sum` (boosted, scaled by `learning_rate`) or `mean` (forest)
//!
//! Structural checks run once in [`ModelArtifact::from_json`]; after that
//! prediction cannot loop or index out of bounds.

use crate::domain::model::FeatureRecord;
use crate::domain::ports::Predictor;
use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Marks a leaf in [`RegressionTree::feature`].
pub const LEAF: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub features: Vec<String>,
    pub model: ModelBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelBody {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<RegressionTree>,
}

/// Flat node arrays; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    pub value: Vec<f64>,
}

impl ModelArtifact {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact =
            serde_json::from_slice(bytes).map_err(|e| PredictorError::load(e.to_string()))?;
        artifact.check()?;
        Ok(artifact)
    }

    fn check(&self) -> Result<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(PredictorError::load(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        if self.features.is_empty() {
            return Err(PredictorError::load("model declares no features"));
        }

        let mut seen = HashSet::new();
        for name in &self.features {
            if !FeatureRecord::FIELDS.contains(&name.as_str()) {
                return Err(PredictorError::load(format!(
                    "unsupported feature '{}' (record provides {})",
                    name,
                    FeatureRecord::FIELDS.join(", ")
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(PredictorError::load(format!("duplicate feature '{}'", name)));
            }
        }

        match &self.model {
            ModelBody::Linear(linear) => linear.check(self.features.len()),
            ModelBody::TreeEnsemble(ensemble) => ensemble.check(self.features.len()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.model {
            ModelBody::Linear(_) => "linear",
            ModelBody::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl Predictor for ModelArtifact {
    fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let x = record.project(&self.features)?;
        let y = match &self.model {
            ModelBody::Linear(linear) => linear.evaluate(&x),
            ModelBody::TreeEnsemble(ensemble) => ensemble.evaluate(&x),
        };

        if !y.is_finite() {
            return Err(PredictorError::prediction(format!(
                "model produced a non-finite value ({})",
                y
            )));
        }
        Ok(y)
    }
}

impl LinearModel {
    fn check(&self, n_features: usize) -> Result<()> {
        if self.coefficients.len() != n_features {
            return Err(PredictorError::load(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                n_features
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PredictorError::load("linear model has non-finite parameters"));
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

impl TreeEnsemble {
    fn check(&self, n_features: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(PredictorError::load("tree ensemble has no trees"));
        }
        if !self.base_score.is_finite() || !self.learning_rate.is_finite() {
            return Err(PredictorError::load(
                "tree ensemble has non-finite base_score or learning_rate",
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(n_features)
                .map_err(|e| PredictorError::load(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(x)).sum();
        match self.aggregation {
            Aggregation::Sum => self.base_score + self.learning_rate * total,
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
        }
    }
}

impl RegressionTree {
    /// Returns a plain reason string; the caller wraps it with the tree index.
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        let n = self.feature.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.threshold.len(),
            self.left.len(),
            self.right.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays have different lengths".to_string());
        }

        for node in 0..n {
            let feature = self.feature[node];
            if feature == LEAF {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} but the model has {} features",
                    node, feature, n_features
                ));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {} has a non-finite threshold", node));
            }
            // 子節點索引必須大於父節點，保證走訪會結束
            for child in [self.left[node], self.right[node]] {
                if child <= node as i32 || child as usize >= n {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.feature[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
        self.value[node]
    }
}
