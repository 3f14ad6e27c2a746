use crate::core::gateway::{ModelGateway, ModelHandle};
use crate::domain::model::{
    Coordinate, District, FeatureRecord, Outcome, Prediction, PredictionRequest,
    CONCENTRATION_UNIT,
};
use crate::domain::ports::{ConfigProvider, Predictor};
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::validate_coordinates;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Runs one submission end to end: validate → build record → predict.
///
/// The model is loaded at most once and shared by every later submission.
/// A failed load is not remembered, so the next submission tries again.
pub struct PredictionService {
    gateway: ModelGateway,
    model: RwLock<Option<ModelHandle>>,
}

impl PredictionService {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            gateway: ModelGateway::new(model_path),
            model: RwLock::new(None),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.model_path())
    }

    /// Service backed by an in-memory predictor; nothing is read from disk.
    pub fn with_predictor(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            gateway: ModelGateway::new(PathBuf::new()),
            model: RwLock::new(Some(ModelHandle::new(predictor, "in-memory"))),
        }
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// 啟動時預先載入模型
    pub fn preload(&self) -> Result<()> {
        self.model_handle().map(|_| ())
    }

    fn model_handle(&self) -> Result<ModelHandle> {
        if let Some(handle) = self.read_slot()?.as_ref() {
            return Ok(handle.clone());
        }

        let mut slot = self
            .model
            .write()
            .map_err(|_| PredictorError::load("model slot lock poisoned"))?;
        // 另一個請求可能已經載入
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        let handle = self.gateway.load()?;
        *slot = Some(handle.clone());
        Ok(handle)
    }

    fn read_slot(&self) -> Result<std::sync::RwLockReadGuard<'_, Option<ModelHandle>>> {
        self.model
            .read()
            .map_err(|_| PredictorError::load("model slot lock poisoned"))
    }

    /// Validates and predicts with coordinates that are already numeric.
    pub fn submit_values(&self, district: &str, latitude: f64, longitude: f64) -> Result<Prediction> {
        let coordinate = Coordinate::checked(latitude, longitude)?;
        let district: District = district.parse()?;
        self.predict_at(district, coordinate)
    }

    pub fn submit(&self, request: &PredictionRequest) -> Result<Prediction> {
        let coordinate = validate_coordinates(&request.latitude, &request.longitude)?;
        let district: District = request.district.parse()?;
        self.predict_at(district, coordinate)
    }

    fn predict_at(
        &self,
        district: District,
        coordinate: Coordinate,
    ) -> Result<Prediction> {
        let record = FeatureRecord::from(coordinate);
        let handle = self.model_handle()?;
        let value = self.gateway.predict(&handle, &record)?;

        tracing::debug!(
            district = district.name(),
            latitude = record.latitude,
            longitude = record.longitude,
            prediction = value,
            "prediction complete"
        );

        Ok(Prediction {
            district,
            coordinate,
            prediction: value,
            unit: CONCENTRATION_UNIT,
        })
    }

    /// Like [`submit`](Self::submit) but collapses errors into the user-visible message.
    pub fn handle(&self, request: &PredictionRequest) -> Outcome {
        match self.submit(request) {
            Ok(prediction) => Outcome::Success(prediction),
            Err(e) => {
                if e.is_model_unavailable() {
                    tracing::error!("❌ {} ({})", e, e.recovery_suggestion());
                } else {
                    tracing::warn!("⚠️ Submission rejected: {}", e);
                }
                Outcome::Failure(e.user_friendly_message())
            }
        }
    }
}
