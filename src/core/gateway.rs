use crate::core::artifact::ModelArtifact;
use crate::domain::model::FeatureRecord;
use crate::domain::ports::Predictor;
use crate::utils::error::{PredictorError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared, immutable handle to a loaded predictor.
#[derive(Clone)]
pub struct ModelHandle {
    predictor: Arc<dyn Predictor>,
    source: String,
}

impl ModelHandle {
    pub fn new(predictor: Arc<dyn Predictor>, source: impl Into<String>) -> Self {
        Self {
            predictor,
            source: source.into(),
        }
    }

    /// Where the model came from (a path, or a label for in-memory predictors).
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Loads the model artifact from its configured path and runs inference on it.
#[derive(Debug, Clone)]
pub struct ModelGateway {
    model_path: PathBuf,
}

impl ModelGateway {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// 載入設定的模型路徑
    pub fn load(&self) -> Result<ModelHandle> {
        load_model(&self.model_path)
    }

    pub fn predict(&self, handle: &ModelHandle, record: &FeatureRecord) -> Result<f64> {
        handle.predictor.predict(record).map_err(|e| match e {
            PredictorError::PredictionError { .. } => e,
            other => PredictorError::prediction(other.to_string()),
        })
    }
}

/// Reads and deserializes an artifact.
///
/// A missing path is [`PredictorError::NotFoundError`]; anything that goes
/// wrong after that (read, parse, structural checks) is
/// [`PredictorError::LoadError`].
pub fn load_model(path: &Path) -> Result<ModelHandle> {
    if !path.is_file() {
        return Err(PredictorError::NotFoundError {
            path: path.display().to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| PredictorError::load(e.to_string()))?;
    let artifact = ModelArtifact::from_json(&bytes)?;

    tracing::info!(
        "📦 Loaded {} model '{}' from {} ({} features)",
        artifact.kind(),
        artifact.name.as_deref().unwrap_or("unnamed"),
        path.display(),
        artifact.features.len()
    );

    Ok(ModelHandle::new(
        Arc::new(artifact),
        path.display().to_string(),
    ))
}
