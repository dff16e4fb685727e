//! Fixed-column field extraction from TLE line 1.
//!
//! Only the fields the decay estimator needs are read here; everything else
//! is left to the `sgp4` element parser.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::orbit::error::TleFieldError;

const EPOCH_YEAR_COLUMNS: (usize, usize) = (18, 20);
const EPOCH_DAY_COLUMNS: (usize, usize) = (20, 32);
const MEAN_MOTION_DOT_COLUMNS: (usize, usize) = (33, 43);

/// Two-digit years below this value belong to the 2000s.
const CENTURY_PIVOT: i32 = 57;
/// Width of the implied-decimal mantissa in exponent notation (`12345-3`).
const MANTISSA_WIDTH: usize = 5;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Parse the first derivative of mean motion (columns 34-43).
///
/// Accepts plain decimals (` .00002182`, `-.00002218`) as well as the
/// implied-decimal exponent notation used elsewhere in the TLE format, where
/// `12345-3` reads as `0.12345e-3`.
pub fn parse_mean_motion_derivative(line1: &str) -> Result<f64, TleFieldError> {
    const FIELD: &str = "mean motion derivative";

    let raw: String = column(line1, MEAN_MOTION_DOT_COLUMNS, FIELD)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if raw.is_empty() {
        return Err(TleFieldError::Empty { field: FIELD });
    }

    let invalid = || TleFieldError::InvalidNumber {
        field: FIELD,
        raw: raw.clone(),
    };

    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.strip_prefix('+').unwrap_or(&raw)),
    };

    let value: f64 = if unsigned.contains(['+', '-']) {
        let mantissa = unsigned.get(..MANTISSA_WIDTH).ok_or_else(invalid)?;
        let exponent = unsigned.get(MANTISSA_WIDTH..).ok_or_else(invalid)?;
        if !mantissa.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let exponent: i32 = exponent.parse().map_err(|_| invalid())?;
        format!("{}0.{}e{}", sign, mantissa, exponent)
            .parse()
            .map_err(|_| invalid())?
    } else {
        raw.parse().map_err(|_| invalid())?
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Mean motion derivative, or `0.0` when the field cannot be read.
pub fn mean_motion_derivative(line1: &str) -> f64 {
    parse_mean_motion_derivative(line1).unwrap_or_else(|e| {
        log::debug!("mean motion derivative unavailable: {}", e);
        0.0
    })
}

/// Parse the element set epoch (columns 19-32) into a UTC instant.
pub fn parse_epoch(line1: &str) -> Result<DateTime<Utc>, TleFieldError> {
    const YEAR_FIELD: &str = "epoch year";
    const DAY_FIELD: &str = "epoch day";

    let year_raw = column(line1, EPOCH_YEAR_COLUMNS, YEAR_FIELD)?.trim();
    if year_raw.is_empty() {
        return Err(TleFieldError::Empty { field: YEAR_FIELD });
    }
    let two_digit: i32 = year_raw.parse().map_err(|_| TleFieldError::InvalidNumber {
        field: YEAR_FIELD,
        raw: year_raw.to_string(),
    })?;
    let year = if two_digit < CENTURY_PIVOT {
        two_digit + 2000
    } else {
        two_digit + 1900
    };

    let day_raw = column(line1, EPOCH_DAY_COLUMNS, DAY_FIELD)?.trim();
    let cleaned = clean_day_of_year(day_raw);
    if cleaned.is_empty() {
        return Err(TleFieldError::Empty { field: DAY_FIELD });
    }
    let day: f64 = cleaned
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite())
        .ok_or_else(|| TleFieldError::InvalidNumber {
            field: DAY_FIELD,
            raw: day_raw.to_string(),
        })?;

    let out_of_range = || TleFieldError::EpochOutOfRange { year, day };

    let offset_us = ((day - 1.0) * MICROS_PER_DAY).round();
    if offset_us.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }

    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|start| start.checked_add_signed(Duration::microseconds(offset_us as i64)))
        .map(|epoch| epoch.and_utc())
        .ok_or_else(out_of_range)
}

/// Element set epoch, or `None` when the fields cannot be read.
pub fn derive_epoch(line1: &str) -> Option<DateTime<Utc>> {
    parse_epoch(line1)
        .map_err(|e| log::debug!("epoch unavailable: {}", e))
        .ok()
}

// Hand-edited catalogs sometimes carry doubled or dangling dots in the day field.
fn clean_day_of_year(raw: &str) -> String {
    raw.replace("..", ".")
        .replace(" .", "")
        .trim_end_matches('.')
        .to_string()
}

/// Slice `[start, end)` of the line, clamped to its length.
fn column<'a>(
    line: &'a str,
    (start, end): (usize, usize),
    field: &'static str,
) -> Result<&'a str, TleFieldError> {
    let end = end.min(line.len());
    let start = start.min(end);
    line.get(start..end)
        .ok_or(TleFieldError::Encoding { field })
}
