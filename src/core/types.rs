//! Core data types for the simulator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside the WGS84 ranges
    pub fn is_in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Component-wise comparison within `tolerance_deg`
    pub fn approx_eq(&self, other: &GeoPoint, tolerance_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance_deg
            && (self.lon - other.lon).abs() <= tolerance_deg
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Error returned when a `"lat,lon"` string cannot be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected \"lat,lon\" in decimal degrees, got {input:?}")]
pub struct ParseGeoPointError {
    pub input: String,
}

impl FromStr for GeoPoint {
    type Err = ParseGeoPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGeoPointError { input: s.to_string() };

        let (lat, lon) = s.split_once(',').ok_or_else(err)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| err())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| err())?;
        Ok(GeoPoint::new(lat, lon))
    }
}

/// Opaque identifier of a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(raw: u32) -> Self {
        EntityId(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{:04}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geo_point() {
        let point: GeoPoint = "37.5665, 126.9780".parse().unwrap();
        assert_eq!(point, GeoPoint::new(37.5665, 126.978));

        assert!("37.5665".parse::<GeoPoint>().is_err());
        assert!("north,east".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn test_range_check() {
        assert!(GeoPoint::new(90.0, -180.0).is_in_range());
        assert!(!GeoPoint::new(90.5, 0.0).is_in_range());
        assert!(!GeoPoint::new(0.0, 181.0).is_in_range());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_in_range());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::new(7).to_string(), "entity-0007");
        assert_eq!(EntityId::new(7).raw(), 7);
    }
}
