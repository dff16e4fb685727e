//! Heuristic decay estimation from the mean motion derivative.
//!
//! The lifetime figures are rough proxies (a faster-decaying mean motion
//! means a shorter remaining life), not a calibrated re-entry model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::orbit::tle::{derive_epoch, mean_motion_derivative};
use crate::orbit::types::round2;

/// Estimates at or below this many days are flagged.
pub const WARNING_THRESHOLD_DAYS: f64 = 30.0;
const RISK_TIMELINE_POINTS: usize = 10;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecayStatus {
    Stable,
    Warning,
    Unknown,
}

impl DecayStatus {
    pub fn classify(days: Option<f64>) -> Self {
        match days {
            None => DecayStatus::Unknown,
            Some(d) if d <= WARNING_THRESHOLD_DAYS => DecayStatus::Warning,
            Some(_) => DecayStatus::Stable,
        }
    }
}

/// The two lifetime formulas in use. Each endpoint keeps its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifetimePolicy {
    /// `1 / (2 * mm_dot)` for positive derivatives; status follows the lifetime.
    /// Used for the single-satellite position view.
    HalfInverse,
    /// `1 / |mm_dot|` for any non-zero derivative; status follows the days
    /// remaining after the epoch. Used when adding and listing satellites.
    InverseMagnitude,
}

impl LifetimePolicy {
    pub fn lifetime_days(self, mm_dot: f64) -> Option<f64> {
        let lifetime = match self {
            LifetimePolicy::HalfInverse if mm_dot > 0.0 => 1.0 / (2.0 * mm_dot),
            LifetimePolicy::InverseMagnitude if mm_dot != 0.0 => 1.0 / mm_dot.abs(),
            _ => return None,
        };
        Some(round2(lifetime)).filter(|l| l.is_finite())
    }
}

/// Estimated lifetime in days for TLE line 1 under `policy`.
pub fn derive_lifetime(line1: &str, policy: LifetimePolicy) -> Option<f64> {
    policy.lifetime_days(mean_motion_derivative(line1))
}

/// Whole days between `now` and `epoch + lifetime_days`, truncated toward zero.
pub fn days_remaining(epoch: DateTime<Utc>, lifetime_days: f64, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - epoch).num_milliseconds() as f64 / MILLIS_PER_DAY;
    (lifetime_days - elapsed).trunc() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DecayEstimate {
    pub epoch: Option<DateTime<Utc>>,
    pub lifetime_days: Option<f64>,
    pub days_remaining: Option<i64>,
    pub status: DecayStatus,
}

impl DecayEstimate {
    pub fn estimate(line1: &str, policy: LifetimePolicy, now: DateTime<Utc>) -> Self {
        let epoch = derive_epoch(line1);
        let lifetime_days = derive_lifetime(line1, policy);
        let days_remaining = epoch
            .zip(lifetime_days)
            .map(|(epoch, lifetime)| days_remaining(epoch, lifetime, now));

        let status = match policy {
            LifetimePolicy::HalfInverse => DecayStatus::classify(lifetime_days),
            LifetimePolicy::InverseMagnitude => {
                DecayStatus::classify(days_remaining.map(|d| d as f64))
            }
        };

        Self {
            epoch,
            lifetime_days,
            days_remaining,
            status,
        }
    }

    /// Epoch as a calendar date (`YYYY-MM-DD`).
    pub fn epoch_date(&self) -> Option<String> {
        self.epoch.map(|e| e.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct RiskPoint {
    pub day: i64,
    pub altitude_km: f64,
}

/// Linear altitude decay from `altitude_km` to zero across the lifetime.
/// Days are rounded for display; altitudes follow the exact fraction of the
/// lifetime and never drop below zero.
pub fn risk_timeline(altitude_km: f64, lifetime_days: f64) -> Option<Vec<RiskPoint>> {
    if !(lifetime_days > 0.0 && lifetime_days.is_finite() && altitude_km.is_finite()) {
        return None;
    }

    let last = (RISK_TIMELINE_POINTS - 1) as f64;
    let points = (0..RISK_TIMELINE_POINTS)
        .map(|i| {
            let fraction = i as f64 / last;
            let remaining = altitude_km * (1.0 - fraction);
            RiskPoint {
                day: (fraction * lifetime_days).round() as i64,
                altitude_km: if remaining > 0.0 { round2(remaining) } else { 0.0 },
            }
        })
        .collect();
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const DECAYING_LINE1: &str =
        "1 25544U 98067A   20194.88612269  .02000000  00000-0 -31515-4 0  9990";
    const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";

    #[test]
    fn classification_boundary_is_inclusive() {
        assert_eq!(DecayStatus::classify(Some(30.01)), DecayStatus::Stable);
        assert_eq!(DecayStatus::classify(Some(30.0)), DecayStatus::Warning);
        assert_eq!(DecayStatus::classify(Some(29.99)), DecayStatus::Warning);
        assert_eq!(DecayStatus::classify(Some(-4.0)), DecayStatus::Warning);
        assert_eq!(DecayStatus::classify(None), DecayStatus::Unknown);
    }

    #[test]
    fn classification_is_monotonic() {
        let mut seen_warning = false;
        for tenths in (250..=350).rev() {
            let status = DecayStatus::classify(Some(tenths as f64 / 10.0));
            if seen_warning {
                assert_eq!(status, DecayStatus::Warning);
            }
            seen_warning |= status == DecayStatus::Warning;
        }
        assert!(seen_warning);
    }

    #[test]
    fn policies_disagree() {
        assert_eq!(LifetimePolicy::HalfInverse.lifetime_days(0.02), Some(25.0));
        assert_eq!(LifetimePolicy::InverseMagnitude.lifetime_days(0.02), Some(50.0));

        assert_eq!(LifetimePolicy::HalfInverse.lifetime_days(-0.00002218), None);
        assert_eq!(
            LifetimePolicy::InverseMagnitude.lifetime_days(-0.00002218),
            Some(45085.66)
        );

        assert_eq!(LifetimePolicy::HalfInverse.lifetime_days(0.0), None);
        assert_eq!(LifetimePolicy::InverseMagnitude.lifetime_days(0.0), None);
    }

    #[test]
    fn days_remaining_truncates_toward_zero() {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let at = |days: f64| epoch + Duration::milliseconds((days * MILLIS_PER_DAY) as i64);

        assert_eq!(days_remaining(epoch, 10.5, at(4.0)), 6);
        assert_eq!(days_remaining(epoch, 10.5, at(11.0)), 0);
        assert_eq!(days_remaining(epoch, 10.5, at(12.0)), -1);
    }

    #[test]
    fn estimate_follows_policy() {
        let epoch = derive_epoch(DECAYING_LINE1).unwrap();

        let single = DecayEstimate::estimate(
            DECAYING_LINE1,
            LifetimePolicy::HalfInverse,
            epoch + Duration::days(10),
        );
        assert_eq!(single.lifetime_days, Some(25.0));
        assert_eq!(single.days_remaining, Some(15));
        assert_eq!(single.status, DecayStatus::Warning);
        assert_eq!(single.epoch_date().as_deref(), Some("2020-07-12"));

        let listed = DecayEstimate::estimate(
            DECAYING_LINE1,
            LifetimePolicy::InverseMagnitude,
            epoch + Duration::days(10),
        );
        assert_eq!(listed.lifetime_days, Some(50.0));
        assert_eq!(listed.days_remaining, Some(40));
        assert_eq!(listed.status, DecayStatus::Stable);

        let later = DecayEstimate::estimate(
            DECAYING_LINE1,
            LifetimePolicy::InverseMagnitude,
            epoch + Duration::days(20),
        );
        assert_eq!(later.days_remaining, Some(30));
        assert_eq!(later.status, DecayStatus::Warning);
    }

    #[test]
    fn negative_derivative_is_unknown_for_single_view() {
        let estimate =
            DecayEstimate::estimate(ISS_LINE1, LifetimePolicy::HalfInverse, Utc::now());
        assert!(estimate.epoch.is_some());
        assert_eq!(estimate.lifetime_days, None);
        assert_eq!(estimate.days_remaining, None);
        assert_eq!(estimate.status, DecayStatus::Unknown);
    }

    #[test]
    fn unreadable_line_is_unknown() {
        let estimate =
            DecayEstimate::estimate("1 bogus", LifetimePolicy::InverseMagnitude, Utc::now());
        assert_eq!(estimate.epoch, None);
        assert_eq!(estimate.status, DecayStatus::Unknown);
        assert_eq!(estimate.epoch_date(), None);
    }

    #[test]
    fn risk_timeline_reaches_ground() {
        let points = risk_timeline(400.0, 90.0).unwrap();
        assert_eq!(points.len(), 10);
        assert_eq!(points[0], RiskPoint { day: 0, altitude_km: 400.0 });
        assert_eq!(points[1], RiskPoint { day: 10, altitude_km: 355.56 });
        assert_eq!(points[9], RiskPoint { day: 90, altitude_km: 0.0 });
    }

    #[test]
    fn risk_timeline_stays_above_ground() {
        let points = risk_timeline(420.0, 20.6).unwrap();
        assert!(points.iter().all(|p| p.altitude_km >= 0.0));
        assert_eq!(points[9], RiskPoint { day: 21, altitude_km: 0.0 });
        assert!(points[9].altitude_km.is_sign_positive());
        assert_eq!(points[1], RiskPoint { day: 2, altitude_km: 373.33 });
    }

    #[test]
    fn risk_timeline_needs_positive_lifetime() {
        assert!(risk_timeline(400.0, 0.0).is_none());
        assert!(risk_timeline(400.0, -3.0).is_none());
        assert!(risk_timeline(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn status_renders_snake_case() {
        assert_eq!(DecayStatus::Warning.to_string(), "warning");
        assert_eq!(
            serde_json::to_string(&DecayStatus::Stable).unwrap(),
            "\"stable\""
        );
    }
}
