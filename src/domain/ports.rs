use crate::domain::model::FeatureRecord;
use crate::utils::error::Result;
use std::path::Path;

/// Anything that turns a feature record into a predicted concentration.
pub trait Predictor: Send + Sync {
    fn predict(&self, record: &FeatureRecord) -> Result<f64>;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &Path;
    fn host(&self) -> &str;
    fn port(&self) -> u16;
}
