use serde::Serialize;
use utoipa::ToSchema;

/// Sub-satellite point over a spherical Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl GeoPosition {
    pub fn is_finite(&self) -> bool {
        self.latitude_deg.is_finite()
            && self.longitude_deg.is_finite()
            && self.altitude_km.is_finite()
    }

    /// Same position with every component rounded to two decimals.
    pub fn rounded(&self) -> Self {
        Self {
            latitude_deg: round2(self.latitude_deg),
            longitude_deg: round2(self.longitude_deg),
            altitude_km: round2(self.altitude_km),
        }
    }
}

/// TEME position and velocity as returned by SGP4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalState {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl OrbitalState {
    pub fn is_finite(&self) -> bool {
        self.position_km
            .iter()
            .chain(self.velocity_km_s.iter())
            .all(|v| v.is_finite())
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
