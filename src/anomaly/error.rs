use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnomalyError {
    #[error("anomaly model not loaded")]
    ModelUnavailable,
    #[error("feature {feature} is not a finite number ({value})")]
    FeatureComputation { feature: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model: {0}")]
    Invalid(String),
    #[error("invalid training data: {0}")]
    TrainingData(String),
}
