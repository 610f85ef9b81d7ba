//! Coordinate range handling for points entering the simulator

use crate::core::GeoPoint;
use crate::validation::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// What to do with a coordinate outside lat∈[-90,90], lon∈[-180,180]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatePolicy {
    /// Clamp latitude, wrap longitude into [-180, 180)
    #[default]
    Normalize,
    /// Clamp both components to their ranges
    Clamp,
    /// Refuse the point
    Reject,
    /// Pass the value through untouched
    Unchecked,
}

/// Applies a [`CoordinatePolicy`] to incoming points
pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Check WGS84 ranges and finiteness
    pub fn validate(point: &GeoPoint) -> SimResult<()> {
        if !point.lat.is_finite() || !point.lon.is_finite() {
            return Err(SimError::InvalidCoordinate {
                point: *point,
                reason: "coordinate is not finite".to_string(),
            });
        }

        if !(-90.0..=90.0).contains(&point.lat) {
            return Err(SimError::InvalidCoordinate {
                point: *point,
                reason: "latitude must be between -90 and 90 degrees".to_string(),
            });
        }

        if !(-180.0..=180.0).contains(&point.lon) {
            return Err(SimError::InvalidCoordinate {
                point: *point,
                reason: "longitude must be between -180 and 180 degrees".to_string(),
            });
        }

        Ok(())
    }

    /// Return the point the simulator should use under `policy`
    pub fn apply(policy: CoordinatePolicy, point: GeoPoint) -> SimResult<GeoPoint> {
        if policy == CoordinatePolicy::Unchecked {
            return Ok(point);
        }

        if !point.lat.is_finite() || !point.lon.is_finite() {
            return Err(SimError::InvalidCoordinate {
                point,
                reason: "coordinate is not finite".to_string(),
            });
        }

        let adjusted = match policy {
            CoordinatePolicy::Reject => {
                Self::validate(&point)?;
                point
            }
            CoordinatePolicy::Clamp => {
                GeoPoint::new(point.lat.clamp(-90.0, 90.0), point.lon.clamp(-180.0, 180.0))
            }
            CoordinatePolicy::Normalize => {
                GeoPoint::new(point.lat.clamp(-90.0, 90.0), wrap_longitude(point.lon))
            }
            CoordinatePolicy::Unchecked => point,
        };

        if adjusted != point {
            tracing::warn!(
                original = %point,
                adjusted = %adjusted,
                ?policy,
                "coordinate adjusted to valid range"
            );
        }

        Ok(adjusted)
    }
}

/// Wrap an out-of-range longitude into [-180, 180); in-range values are kept
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        assert!(CoordinateValidator::validate(&GeoPoint::new(37.5665, 126.978)).is_ok());
        assert!(CoordinateValidator::validate(&GeoPoint::new(91.0, 0.0)).is_err());
        assert!(CoordinateValidator::validate(&GeoPoint::new(0.0, -180.5)).is_err());
        assert!(CoordinateValidator::validate(&GeoPoint::new(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_normalize_wraps_longitude() {
        let p = CoordinateValidator::apply(CoordinatePolicy::Normalize, GeoPoint::new(10.0, 190.0)).unwrap();
        assert!((p.lon + 170.0).abs() < 1e-9);
        assert_eq!(p.lat, 10.0);

        let p = CoordinateValidator::apply(CoordinatePolicy::Normalize, GeoPoint::new(95.0, -540.0)).unwrap();
        assert_eq!(p.lat, 90.0);
        assert!((p.lon + 180.0).abs() < 1e-9);

        // In-range points are untouched, including the antimeridian itself.
        let p = GeoPoint::new(-45.0, 180.0);
        assert_eq!(CoordinateValidator::apply(CoordinatePolicy::Normalize, p).unwrap(), p);
    }

    #[test]
    fn test_clamp_policy() {
        let p = CoordinateValidator::apply(CoordinatePolicy::Clamp, GeoPoint::new(-100.0, 200.0)).unwrap();
        assert_eq!(p, GeoPoint::new(-90.0, 180.0));
    }

    #[test]
    fn test_reject_policy() {
        let result = CoordinateValidator::apply(CoordinatePolicy::Reject, GeoPoint::new(95.0, 0.0));
        assert!(matches!(result, Err(SimError::InvalidCoordinate { .. })));

        let ok = CoordinateValidator::apply(CoordinatePolicy::Reject, GeoPoint::new(45.0, 0.0));
        assert_eq!(ok.unwrap(), GeoPoint::new(45.0, 0.0));
    }

    #[test]
    fn test_unchecked_passes_everything() {
        let p = GeoPoint::new(123.0, f64::NAN);
        let out = CoordinateValidator::apply(CoordinatePolicy::Unchecked, p).unwrap();
        assert_eq!(out.lat, 123.0);
        assert!(out.lon.is_nan());
    }

    #[test]
    fn test_non_finite_rejected_by_normalize() {
        let result = CoordinateValidator::apply(CoordinatePolicy::Normalize, GeoPoint::new(f64::NAN, 0.0));
        assert!(result.is_err());
    }
}
