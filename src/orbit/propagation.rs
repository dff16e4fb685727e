use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::orbit::error::PropagationError;
use crate::orbit::types::{GeoPosition, OrbitalState};

/// Mean Earth radius used for the spherical altitude approximation.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Parse a TLE pair and build the SGP4 constants for it.
pub fn load_elements(line1: &str, line2: &str) -> Result<(Elements, Constants), PropagationError> {
    let elements = Elements::from_tle(None, line1.trim().as_bytes(), line2.trim().as_bytes())?;
    let constants = Constants::from_elements(&elements)?;
    Ok((elements, constants))
}

/// Propagate already-parsed elements to `at`, returning the TEME state.
pub fn propagate_elements(
    elements: &Elements,
    constants: &Constants,
    at: DateTime<Utc>,
) -> Result<OrbitalState, PropagationError> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&at.naive_utc())
        .map_err(|e| PropagationError::Epoch(e.to_string()))?;

    let prediction = constants.propagate(minutes)?;

    let state = OrbitalState {
        position_km: prediction.position,
        velocity_km_s: prediction.velocity,
    };
    if state.is_finite() {
        Ok(state)
    } else {
        Err(PropagationError::NonFinite)
    }
}

/// Propagate a TLE pair to `at` and project the position onto a sphere.
pub fn propagate(
    line1: &str,
    line2: &str,
    at: DateTime<Utc>,
) -> Result<GeoPosition, PropagationError> {
    let (elements, constants) = load_elements(line1, line2)?;
    let state = propagate_elements(&elements, &constants, at)?;
    let position = spherical_position(state.position_km);
    if position.is_finite() {
        Ok(position)
    } else {
        Err(PropagationError::NonFinite)
    }
}

/// Position of the satellite at `at`, or `None` when it cannot be computed.
pub fn derive_position(line1: &str, line2: &str, at: DateTime<Utc>) -> Option<GeoPosition> {
    propagate(line1, line2, at)
        .map_err(|e| log::debug!("position unavailable: {}", e))
        .ok()
}

/// Latitude/longitude/altitude of an inertial position over a spherical Earth.
///
/// No Earth rotation is applied, so longitude is measured in the inertial
/// frame.
pub fn spherical_position(position_km: [f64; 3]) -> GeoPosition {
    let [x, y, z] = position_km;
    let equatorial = (x * x + y * y).sqrt();
    GeoPosition {
        latitude_deg: z.atan2(equatorial).to_degrees(),
        longitude_deg: y.atan2(x).to_degrees(),
        altitude_km: (equatorial * equatorial + z * z).sqrt() - EARTH_MEAN_RADIUS_KM,
    }
}
