use serde::Serialize;
use utoipa::ToSchema;

use crate::anomaly::error::AnomalyError;
use crate::orbit::mean_motion_derivative;
use crate::store::SatelliteRecord;

pub const FEATURE_COUNT: usize = 5;

/// Nominal low-Earth-orbit values substituted for parameters a record lacks.
pub const DEFAULT_MEAN_MOTION: f64 = 15.0;
pub const DEFAULT_ALTITUDE_KM: f64 = 500.0;
pub const DEFAULT_INCLINATION_DEG: f64 = 98.0;
pub const DEFAULT_ECCENTRICITY: f64 = 0.01;

const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "mean_motion",
    "mean_motion_dot",
    "altitude_km",
    "inclination_deg",
    "eccentricity",
];

/// Model input, in the column order the model is trained with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct OrbitalFeatures {
    pub mean_motion: f64,
    pub mean_motion_dot: f64,
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub eccentricity: f64,
}

impl OrbitalFeatures {
    /// Features for a stored record. The derivative always comes from TLE
    /// line 1; the rest default when the record does not carry them.
    pub fn from_record(record: &SatelliteRecord) -> Self {
        Self {
            mean_motion: record.mean_motion.unwrap_or(DEFAULT_MEAN_MOTION),
            mean_motion_dot: mean_motion_derivative(&record.tle_line1),
            altitude_km: record.altitude_km.unwrap_or(DEFAULT_ALTITUDE_KM),
            inclination_deg: record.inclination.unwrap_or(DEFAULT_INCLINATION_DEG),
            eccentricity: record.eccentricity.unwrap_or(DEFAULT_ECCENTRICITY),
        }
    }

    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.mean_motion,
            self.mean_motion_dot,
            self.altitude_km,
            self.inclination_deg,
            self.eccentricity,
        ]
    }

    /// The feature vector, provided every value is a finite number.
    pub fn checked(&self) -> Result<[f64; FEATURE_COUNT], AnomalyError> {
        let values = self.to_array();
        match values.iter().position(|v| !v.is_finite()) {
            Some(i) => Err(AnomalyError::FeatureComputation {
                feature: FEATURE_NAMES[i],
                value: values[i],
            }),
            None => Ok(values),
        }
    }
}
