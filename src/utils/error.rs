use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("Model file not found at {path}")]
    NotFoundError { path: String },

    #[error("Failed to load model: {message}")]
    LoadError { message: String },

    #[error("Prediction failed: {message}")]
    PredictionError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, PredictorError>;

/// 錯誤嚴重程度，CLI 用來決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 使用者輸入錯誤
    Low,
    /// 推論失敗
    Medium,
    /// 模型無法使用
    High,
    /// 設定或系統錯誤
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Low => 2,
            Self::Medium => 1,
            Self::High => 3,
            Self::Critical => 4,
        }
    }
}

impl PredictorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::LoadError {
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::PredictionError {
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::PredictionError { .. } => ErrorSeverity::Medium,
            Self::NotFoundError { .. } | Self::LoadError { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.severity().exit_code()
    }

    /// True for errors that mean the model is unavailable rather than the request being bad.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, Self::NotFoundError { .. } | Self::LoadError { .. })
    }

    /// The single message shown to the user for this error.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::NotFoundError { .. } | Self::LoadError { .. } => {
                format!("Model could not be loaded: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Check that latitude is between 27.0 and 34.0, longitude is between 73.0 and 77.0, and the district is a Punjab district"
            }
            Self::NotFoundError { .. } => {
                "Point --model (or [model] path in the config file) at an existing model artifact"
            }
            Self::LoadError { .. } => {
                "Make sure the model artifact is a valid JSON model exported for this predictor"
            }
            Self::PredictionError { .. } => {
                "The model rejected this input; try again or re-export the model artifact"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Check that the input is well-formed JSON",
            Self::CsvError(_) => {
                "Check that the CSV file has district,latitude,longitude headers"
            }
            Self::ConfigError { .. } => "Fix the configuration value and try again",
        }
    }
}
