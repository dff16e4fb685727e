mod catalog;
mod decay;
mod error;
mod propagation;
mod tle;
mod types;

pub use catalog::{load_catalog, parse_catalog, CatalogEntry};
pub use decay::{
    days_remaining, derive_lifetime, risk_timeline, DecayEstimate, DecayStatus, LifetimePolicy,
    RiskPoint, WARNING_THRESHOLD_DAYS,
};
pub use error::{CatalogError, PropagationError, TleFieldError};
pub use propagation::{
    derive_position, load_elements, propagate, propagate_elements, spherical_position,
    EARTH_MEAN_RADIUS_KM,
};
pub use tle::{derive_epoch, mean_motion_derivative, parse_epoch, parse_mean_motion_derivative};
pub use types::{round2, GeoPosition, OrbitalState};
