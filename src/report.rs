//! Per-request views combining propagation and decay estimates.
//!
//! Nothing here is persisted: every view is recomputed from the TLE lines
//! for the instant it is asked for.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use utoipa::ToSchema;

use crate::orbit::{derive_position, DecayEstimate, DecayStatus, GeoPosition, LifetimePolicy};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn rounded_position(line1: &str, line2: &str, now: DateTime<Utc>) -> Option<GeoPosition> {
    derive_position(line1, line2, now).map(|p| p.rounded())
}

/// Derived values returned when a satellite is added.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SatelliteSnapshot {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_km: Option<f64>,
    pub epoch_date: Option<String>,
    pub lifetime_days: Option<f64>,
    pub days_remaining: Option<i64>,
    pub decay_status: DecayStatus,
}

impl SatelliteSnapshot {
    pub fn compute(line1: &str, line2: &str, now: DateTime<Utc>) -> Self {
        let position = rounded_position(line1, line2, now);
        let decay = DecayEstimate::estimate(line1, LifetimePolicy::InverseMagnitude, now);

        Self {
            latitude: position.map(|p| p.latitude_deg),
            longitude: position.map(|p| p.longitude_deg),
            altitude_km: position.map(|p| p.altitude_km),
            epoch_date: decay.epoch_date(),
            lifetime_days: decay.lifetime_days,
            days_remaining: decay.days_remaining,
            decay_status: decay.status,
        }
    }
}

/// Decay fields attached to every record in the satellite listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DecayListing {
    pub epoch_date: Option<String>,
    pub lifetime_est_days: Option<f64>,
    pub days_remaining: Option<i64>,
    pub decay_warning: DecayStatus,
}

impl DecayListing {
    pub fn compute(line1: &str, now: DateTime<Utc>) -> Self {
        let decay = DecayEstimate::estimate(line1, LifetimePolicy::InverseMagnitude, now);
        Self {
            epoch_date: decay.epoch_date(),
            lifetime_est_days: decay.lifetime_days,
            days_remaining: decay.days_remaining,
            decay_warning: decay.status,
        }
    }
}

/// Live position of one satellite with its decay estimate.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PositionReport {
    pub name: String,
    pub norad_id: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_km: Option<f64>,
    pub epoch: Option<String>,
    pub lifetime_days: Option<f64>,
    pub decay_status: DecayStatus,
    pub last_updated_utc: String,
}

impl PositionReport {
    pub fn compute(
        name: &str,
        norad_id: u32,
        line1: &str,
        line2: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let position = rounded_position(line1, line2, now);
        let decay = DecayEstimate::estimate(line1, LifetimePolicy::HalfInverse, now);

        Self {
            name: name.to_string(),
            norad_id,
            latitude: position.map(|p| p.latitude_deg),
            longitude: position.map(|p| p.longitude_deg),
            altitude_km: position.map(|p| p.altitude_km),
            epoch: decay.epoch_date(),
            lifetime_days: decay.lifetime_days,
            decay_status: decay.status,
            last_updated_utc: now.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Write one CSV row per report, with a header row.
pub fn write_csv<W: Write>(reports: &[PositionReport], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for report in reports {
        wtr.serialize(report)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LINE1: &str = "1 25544U 98067A   20194.88612269  .00016717  00000-0 -31515-4 0  9990";
    const LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";
    const NEGATIVE_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";

    fn shortly_after_epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 7, 13, 0, 0, 0).unwrap()
    }

    #[test]
    fn position_report_uses_half_inverse_lifetime() {
        let report = PositionReport::compute("ISS", 25544, LINE1, LINE2, shortly_after_epoch());

        assert_eq!(report.epoch.as_deref(), Some("2020-07-12"));
        assert_eq!(report.lifetime_days, Some(2990.97));
        assert_eq!(report.decay_status, DecayStatus::Stable);
        assert_eq!(report.last_updated_utc, "2020-07-13 00:00:00 UTC");

        let altitude = report.altitude_km.unwrap();
        assert!(altitude > 300.0 && altitude < 500.0);
        let latitude = report.latitude.unwrap();
        assert!(latitude.abs() <= 51.7);
    }

    #[test]
    fn position_report_without_positive_derivative_is_unknown() {
        let report =
            PositionReport::compute("ISS", 25544, NEGATIVE_LINE1, LINE2, shortly_after_epoch());
        assert_eq!(report.lifetime_days, None);
        assert_eq!(report.decay_status, DecayStatus::Unknown);
        assert!(report.latitude.is_some());
    }

    #[test]
    fn snapshot_uses_inverse_magnitude_lifetime() {
        let snapshot = SatelliteSnapshot::compute(NEGATIVE_LINE1, LINE2, shortly_after_epoch());
        assert_eq!(snapshot.lifetime_days, Some(45085.66));
        assert_eq!(snapshot.days_remaining, Some(45085));
        assert_eq!(snapshot.decay_status, DecayStatus::Stable);
        assert_eq!(snapshot.epoch_date.as_deref(), Some("2020-07-12"));
    }

    #[test]
    fn unreadable_lines_degrade_to_absent_values() {
        let snapshot = SatelliteSnapshot::compute("garbage", "garbage", shortly_after_epoch());
        assert_eq!(snapshot.latitude, None);
        assert_eq!(snapshot.epoch_date, None);
        assert_eq!(snapshot.lifetime_days, None);
        assert_eq!(snapshot.decay_status, DecayStatus::Unknown);

        let listing = DecayListing::compute("garbage", shortly_after_epoch());
        assert_eq!(listing.days_remaining, None);
        assert_eq!(listing.decay_warning, DecayStatus::Unknown);
    }

    #[test]
    fn csv_has_header_and_blank_absent_values() {
        let reports = [
            PositionReport::compute("ISS", 25544, LINE1, LINE2, shortly_after_epoch()),
            PositionReport::compute("Broken", 1, "garbage", "garbage", shortly_after_epoch()),
        ];
        let mut out = Vec::new();
        write_csv(&reports, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "name,norad_id,latitude,longitude,altitude_km,epoch,lifetime_days,decay_status,last_updated_utc"
        );
        assert!(lines[1].starts_with("ISS,25544,"));
        assert!(lines[1].contains(",2020-07-12,2990.97,stable,"));
        assert_eq!(lines[2], "Broken,1,,,,,,unknown,2020-07-13 00:00:00 UTC");
    }
}
