use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::anomaly::error::{AnomalyError, ModelError};
use crate::anomaly::features::{OrbitalFeatures, FEATURE_COUNT};
use crate::anomaly::forest::IsolationForest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Inlier,
    Outlier,
}

/// A trained outlier detector over the orbital feature vector. Inference
/// must be deterministic; implementations are shared read-only across
/// requests.
pub trait OutlierModel: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Prediction;
}

impl OutlierModel for IsolationForest {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Prediction {
        if self.is_outlier(features) {
            Prediction::Outlier
        } else {
            Prediction::Inlier
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnomalyStatus {
    Normal,
    Anomaly,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnomalyVerdict {
    pub anomaly_status: AnomalyStatus,
    pub features: OrbitalFeatures,
}

/// Wraps the model loaded at startup, if any.
#[derive(Clone, Default)]
pub struct AnomalyClassifier {
    model: Option<Arc<dyn OutlierModel>>,
}

impl AnomalyClassifier {
    pub fn new(model: Arc<dyn OutlierModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    /// Load an isolation forest artifact. The model must have been trained
    /// on the full orbital feature vector.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let forest = IsolationForest::load(path)?;
        if forest.feature_count() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "model expects {} features, classifier provides {}",
                forest.feature_count(),
                FEATURE_COUNT
            )));
        }
        Ok(Self::new(Arc::new(forest)))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn classify(&self, features: &OrbitalFeatures) -> Result<AnomalyVerdict, AnomalyError> {
        let model = self.model.as_ref().ok_or(AnomalyError::ModelUnavailable)?;
        let values = features.checked()?;

        let anomaly_status = match model.predict(&values) {
            Prediction::Outlier => AnomalyStatus::Anomaly,
            Prediction::Inlier => AnomalyStatus::Normal,
        };

        Ok(AnomalyVerdict {
            anomaly_status,
            features: *features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::forest::ForestParams;
    use crate::anomaly::training::train_model;

    /// Flags anything above a fixed altitude.
    struct AltitudeCeiling(f64);

    impl OutlierModel for AltitudeCeiling {
        fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Prediction {
            if features[2] > self.0 {
                Prediction::Outlier
            } else {
                Prediction::Inlier
            }
        }
    }

    fn features(altitude_km: f64) -> OrbitalFeatures {
        OrbitalFeatures {
            mean_motion: 15.0,
            mean_motion_dot: 0.0001,
            altitude_km,
            inclination_deg: 98.0,
            eccentricity: 0.01,
        }
    }

    #[test]
    fn maps_model_output() {
        let classifier = AnomalyClassifier::new(Arc::new(AltitudeCeiling(1000.0)));
        assert_eq!(
            classifier.classify(&features(500.0)).unwrap().anomaly_status,
            AnomalyStatus::Normal
        );
        assert_eq!(
            classifier.classify(&features(5000.0)).unwrap().anomaly_status,
            AnomalyStatus::Anomaly
        );
    }

    #[test]
    fn missing_model_is_unavailable() {
        let classifier = AnomalyClassifier::unavailable();
        assert!(!classifier.is_loaded());
        assert!(matches!(
            classifier.classify(&features(500.0)),
            Err(AnomalyError::ModelUnavailable)
        ));
    }

    #[test]
    fn non_finite_features_fail() {
        let classifier = AnomalyClassifier::new(Arc::new(AltitudeCeiling(1000.0)));
        assert!(matches!(
            classifier.classify(&features(f64::INFINITY)),
            Err(AnomalyError::FeatureComputation { .. })
        ));
    }

    #[test]
    fn trained_forest_is_deterministic() {
        let forest = train_model(ForestParams::default()).unwrap();
        let classifier = AnomalyClassifier::new(Arc::new(forest));

        let nominal = features(500.0);
        let first = classifier.classify(&nominal).unwrap();
        for _ in 0..10 {
            assert_eq!(classifier.classify(&nominal).unwrap(), first);
        }
        assert_eq!(first.anomaly_status, AnomalyStatus::Normal);

        let extreme = OrbitalFeatures {
            mean_motion: 2.0,
            mean_motion_dot: 0.05,
            altitude_km: 35_786.0,
            inclination_deg: 0.1,
            eccentricity: 0.7,
        };
        assert_eq!(
            classifier.classify(&extreme).unwrap().anomaly_status,
            AnomalyStatus::Anomaly
        );
    }

    #[test]
    fn load_checks_feature_width() {
        let narrow = IsolationForest::fit(
            &[vec![1.0, 2.0], vec![2.0, 1.0], vec![3.0, 3.0]],
            ForestParams::default(),
        )
        .unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        narrow.save(file.path()).unwrap();

        assert!(matches!(
            AnomalyClassifier::load(file.path()),
            Err(ModelError::Invalid(_))
        ));
    }
}
