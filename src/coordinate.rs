//! Geographic coordinates and the degree+minutes text encoding.

use serde::Serialize;

use crate::error::{Result, SeisError};

/// Decimal places kept for every decoded coordinate.
pub const COORDINATE_PRECISION: u32 = 5;

/// Signed decimal degrees; negative is West / South.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude:  f64,
}

impl Coordinate {
    /// Build a coordinate, truncating both axes to [`COORDINATE_PRECISION`].
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: truncate(longitude, COORDINATE_PRECISION),
            latitude:  truncate(latitude, COORDINATE_PRECISION),
        }
    }
}

/// Truncate `value` toward zero at `precision` decimal places.
///
/// A scaled value within rounding noise of an integer is snapped to it
/// first, so a value already stored at that precision (e.g. `50.12345`,
/// which may scale to `5012344.999…`) is kept rather than cut one unit
/// short.  This also makes the operation idempotent.
pub fn truncate(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let nearest = scaled.round();
    let noise = (scaled.abs() * 8.0 * f64::EPSILON).max(1e-6);
    let kept = if (scaled - nearest).abs() <= noise { nearest } else { scaled.trunc() };
    kept / factor
}

/// Which axis a degree+minutes string encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Leading characters holding the whole degrees.
    fn degree_digits(self) -> usize {
        match self {
            Axis::Latitude  => 2,
            Axis::Longitude => 3,
        }
    }

    /// `(positive, negative)` hemisphere letters.
    fn hemispheres(self) -> (char, char) {
        match self {
            Axis::Latitude  => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Axis::Latitude  => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

/// Length of the Sigma longitude text field.
pub const LONGITUDE_TEXT_LEN: usize = 9;
/// Length of the Sigma latitude text field.
pub const LATITUDE_TEXT_LEN: usize = 8;

/// Parse `DDMM.mmmmH` / `DDDMM.mmmH` text into signed decimal degrees.
///
/// The first 2 (latitude) or 3 (longitude) characters are whole degrees,
/// everything up to the trailing hemisphere letter is decimal minutes.
/// Result is `degrees + minutes / 60`, truncated, negated for `S` / `W`.
pub fn parse_degrees_minutes(raw: &[u8], axis: Axis) -> Result<f64> {
    let axis_name = axis.name();
    let text = std::str::from_utf8(raw)
        .map_err(|_| SeisError::bad_header(format!("{axis_name} is not valid text")))?;

    if axis == Axis::Longitude && text.chars().count() != LONGITUDE_TEXT_LEN {
        return Err(SeisError::bad_header(format!(
            "invalid longitude value: {text:?} (expected {LONGITUDE_TEXT_LEN} characters)"
        )));
    }

    let (positive, negative) = axis.hemispheres();
    let sign = match text.chars().last() {
        Some(c) if c == positive => 1.0,
        Some(c) if c == negative => -1.0,
        _ => {
            return Err(SeisError::bad_header(format!(
                "invalid {axis_name} hemisphere: {text:?}"
            )))
        }
    };

    let body = &text[..text.len() - 1];
    let split = axis.degree_digits();
    if !body.is_char_boundary(split) || body.len() <= split {
        return Err(SeisError::bad_header(format!("invalid {axis_name} value: {text:?}")));
    }
    let (degrees_text, minutes_text) = body.split_at(split);

    let degrees: u16 = Some(degrees_text)
        .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| SeisError::bad_header(format!("invalid {axis_name} degrees: {text:?}")))?;
    let minutes: f64 = minutes_text
        .parse()
        .ok()
        .filter(|m: &f64| m.is_finite() && *m >= 0.0)
        .ok_or_else(|| SeisError::bad_header(format!("invalid {axis_name} minutes: {text:?}")))?;

    let value = truncate(f64::from(degrees) + minutes / 60.0, COORDINATE_PRECISION);
    Ok(sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_representable_values() {
        assert_eq!(truncate(50.12345, 5), 50.12345);
        assert_eq!(truncate(30.54321, 5), 30.54321);
        assert_eq!(truncate(50.123459, 5), 50.12345);
        assert_eq!(truncate(-50.123459, 5), -50.12345);
    }

    #[test]
    fn parses_longitude_east_and_west() {
        let east = parse_degrees_minutes(b"03730.000E", Axis::Longitude);
        assert!(east.is_err(), "ten characters must be rejected");

        let east = parse_degrees_minutes(b"03730.00E", Axis::Longitude).unwrap();
        assert_eq!(east, 37.5);
        let west = parse_degrees_minutes(b"03730.00W", Axis::Longitude).unwrap();
        assert_eq!(west, -37.5);
    }

    #[test]
    fn parses_latitude_north_and_south() {
        assert_eq!(parse_degrees_minutes(b"5545.00N", Axis::Latitude).unwrap(), 55.75);
        assert_eq!(parse_degrees_minutes(b"5545.00S", Axis::Latitude).unwrap(), -55.75);
        assert_eq!(parse_degrees_minutes(b"5510.00N", Axis::Latitude).unwrap(), 55.16666);
    }

    #[test]
    fn rejects_bad_hemisphere_letters() {
        assert!(matches!(
            parse_degrees_minutes(b"03730.00N", Axis::Longitude),
            Err(SeisError::BadHeaderData(_))
        ));
        assert!(matches!(
            parse_degrees_minutes(b"5545.00E", Axis::Latitude),
            Err(SeisError::BadHeaderData(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert!(parse_degrees_minutes(b"5x45.00N", Axis::Latitude).is_err());
        assert!(parse_degrees_minutes(b"55ab.cdN", Axis::Latitude).is_err());
    }

    #[test]
    fn degrees_must_be_plain_digits() {
        assert!(parse_degrees_minutes(b"+545.00N", Axis::Latitude).is_err());
        assert!(parse_degrees_minutes(b"+3730.00E", Axis::Longitude).is_err());
        assert!(parse_degrees_minutes(b" 5545.0N", Axis::Latitude).is_err());
    }

    #[test]
    fn huge_values_pass_through() {
        assert_eq!(truncate(f64::MAX, 5), f64::MAX);
        assert_eq!(truncate(-1.0e305, 5), -1.0e305);
    }
}
