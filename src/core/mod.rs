pub mod artifact;
pub mod batch;
pub mod formatter;
pub mod gateway;
pub mod service;

pub use crate::domain::model::{Coordinate, District, FeatureRecord, Outcome, Prediction, PredictionRequest};
pub use crate::domain::ports::{ConfigProvider, Predictor};
pub use crate::utils::error::Result;
