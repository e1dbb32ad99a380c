//! Coordinates typed as text or sent as a native location.

use crate::error::FieldError;
use crate::poi::{BoundingBox, Location};
use once_cell::sync::Lazy;
use regex::Regex;

static LAT_LON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?\d+\.\d+),\s*(-?\d+\.\d+)\s*$").unwrap());

/// Parses `lat, lon` with decimal degrees.
pub fn parse_lat_lon(input: &str) -> Result<Location, FieldError> {
    let caps = LAT_LON
        .captures(input)
        .ok_or(FieldError::MalformedCoordinate)?;
    let lat: f64 = caps[1]
        .parse()
        .map_err(|_| FieldError::MalformedCoordinate)?;
    let lon: f64 = caps[2]
        .parse()
        .map_err(|_| FieldError::MalformedCoordinate)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(FieldError::MalformedCoordinate);
    }
    Ok(Location::new(lat, lon))
}

/// Checks a location against the optional bounding box.
pub fn check_bounds(
    location: Location,
    bbox: Option<&BoundingBox>,
) -> Result<Location, FieldError> {
    match bbox {
        Some(bbox) if !bbox.contains(&location) => Err(FieldError::OutOfBounds),
        _ => Ok(location),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_lat_lon("53.9, 27.56").unwrap(), Location::new(53.9, 27.56));
        assert_eq!(parse_lat_lon(" -1.5,2.25 ").unwrap(), Location::new(-1.5, 2.25));
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["53.9", "53, 27", "abc", "53.9 27.5", "95.0, 27.5"] {
            assert_eq!(
                parse_lat_lon(input),
                Err(FieldError::MalformedCoordinate),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_bounds() {
        let bbox = BoundingBox::from([27.4, 53.8, 27.8, 54.0]);
        assert!(check_bounds(Location::new(53.9, 27.6), Some(&bbox)).is_ok());
        assert_eq!(
            check_bounds(Location::new(55.75, 37.61), Some(&bbox)),
            Err(FieldError::OutOfBounds)
        );
        assert!(check_bounds(Location::new(55.75, 37.61), None).is_ok());
    }
}
