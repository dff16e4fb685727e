mod classifier;
mod error;
mod features;
mod forest;
mod training;

pub use classifier::{AnomalyClassifier, AnomalyStatus, AnomalyVerdict, OutlierModel, Prediction};
pub use error::{AnomalyError, ModelError};
pub use features::{
    OrbitalFeatures, DEFAULT_ALTITUDE_KM, DEFAULT_ECCENTRICITY, DEFAULT_INCLINATION_DEG,
    DEFAULT_MEAN_MOTION, FEATURE_COUNT,
};
pub use forest::{ForestParams, IsolationForest};
pub use training::{synthetic_dataset, train_model, TRAINING_SAMPLES};
