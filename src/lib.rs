pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::AppConfig;
pub use core::{gateway::ModelGateway, service::PredictionService};
pub use domain::model::{District, Outcome, Prediction, PredictionRequest};
pub use domain::ports::Predictor;
pub use utils::error::{PredictorError, Result};
