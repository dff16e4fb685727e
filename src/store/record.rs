use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::error::StoreError;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SatelliteStatus {
    #[default]
    Active,
    Decayed,
}

/// A tracked satellite as submitted by a client.
///
/// The optional orbital parameters are only used as anomaly features and
/// fall back to nominal values when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SatelliteRecord {
    pub name: String,
    pub norad_id: u32,
    pub tle_line1: String,
    pub tle_line2: String,
    #[serde(default)]
    pub status: SatelliteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_motion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclination: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eccentricity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_km: Option<f64>,
}

impl SatelliteRecord {
    pub fn new(name: impl Into<String>, norad_id: u32, tle_line1: &str, tle_line2: &str) -> Self {
        Self {
            name: name.into(),
            norad_id,
            tle_line1: tle_line1.to_string(),
            tle_line2: tle_line2.to_string(),
            status: SatelliteStatus::Active,
            mean_motion: None,
            inclination: None,
            eccentricity: None,
            altitude_km: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatelliteId(Uuid);

impl SatelliteId {
    pub fn generate() -> Self {
        SatelliteId(Uuid::new_v4())
    }
}

impl FromStr for SatelliteId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(SatelliteId)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSatellite {
    pub id: SatelliteId,
    pub record: SatelliteRecord,
}
