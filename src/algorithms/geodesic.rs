//! Great-circle geometry on a spherical Earth
//!
//! All functions are pure. Points are mapped onto the unit sphere with
//! `nalgebra::Vector3` so that interpolation happens along the arc rather
//! than in latitude/longitude space, which would bend long routes visibly.

use crate::core::{GeoPoint, DEGENERATE_ANGLE_RAD, EARTH_MEAN_RADIUS_M};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Great-circle distance in meters on a sphere of mean Earth radius
pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_meters_with_radius(a, b, EARTH_MEAN_RADIUS_M)
}

/// Great-circle distance in meters on a sphere of radius `radius_m`
pub fn haversine_meters_with_radius(a: &GeoPoint, b: &GeoPoint, radius_m: f64) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    radius_m * c
}

/// Map a geographic point onto the unit sphere (x toward 0°E, z toward the north pole)
pub fn to_unit_vector(p: &GeoPoint) -> Vector3<f64> {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    let cos_lat = lat.cos();
    Vector3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
}

/// Inverse of [`to_unit_vector`]. The vector need not be normalized.
pub fn from_unit_vector(v: &Vector3<f64>) -> GeoPoint {
    let hyp = v.x.hypot(v.y);
    GeoPoint::new(v.z.atan2(hyp).to_degrees(), v.y.atan2(v.x).to_degrees())
}

/// Central angle between two points in radians
pub fn angular_separation(a: &GeoPoint, b: &GeoPoint) -> f64 {
    to_unit_vector(a).dot(&to_unit_vector(b)).clamp(-1.0, 1.0).acos()
}

/// Spherical linear interpolation from `a` (t = 0) to `b` (t = 1)
pub fn slerp(a: &GeoPoint, b: &GeoPoint, t: f64) -> GeoPoint {
    slerp_with_threshold(a, b, t, DEGENERATE_ANGLE_RAD)
}

/// Spherical linear interpolation with an explicit degenerate-angle threshold.
///
/// When the arc is shorter than `threshold_rad`, `a` is returned for every `t`.
/// Antipodal endpoints (within `threshold_rad` of a half turn) have no unique
/// great circle; the arc through the north pole is used, or through 0°E when
/// `a` is itself a pole.
pub fn slerp_with_threshold(a: &GeoPoint, b: &GeoPoint, t: f64, threshold_rad: f64) -> GeoPoint {
    let ua = to_unit_vector(a);
    let ub = to_unit_vector(b);
    let theta = ua.dot(&ub).clamp(-1.0, 1.0).acos();

    if theta < threshold_rad {
        return *a;
    }

    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return *a;
    }
    if t == 1.0 {
        return *b;
    }

    if PI - theta < threshold_rad {
        let m = antipodal_tangent(&ua);
        return from_unit_vector(&(ua * (t * theta).cos() + m * (t * theta).sin()));
    }

    let sin_theta = theta.sin();
    let w1 = ((1.0 - t) * theta).sin() / sin_theta;
    let w2 = (t * theta).sin() / sin_theta;

    from_unit_vector(&(ua * w1 + ub * w2))
}

/// Unit vector orthogonal to `u`, pointing toward the north pole
fn antipodal_tangent(u: &Vector3<f64>) -> Vector3<f64> {
    let north = Vector3::z();
    let toward_north = north - u * u.z;
    if toward_north.norm() > 1e-6 {
        return toward_north.normalize();
    }
    let east = Vector3::x();
    (east - u * u.x).normalize()
}

/// Sample the great circle from `a` to `b` into `segment_count + 1` points
pub fn sample_great_circle(a: &GeoPoint, b: &GeoPoint, segment_count: usize) -> Vec<GeoPoint> {
    sample_great_circle_with_threshold(a, b, segment_count, DEGENERATE_ANGLE_RAD)
}

pub fn sample_great_circle_with_threshold(
    a: &GeoPoint,
    b: &GeoPoint,
    segment_count: usize,
    threshold_rad: f64,
) -> Vec<GeoPoint> {
    if segment_count == 0 {
        return vec![*a];
    }

    (0..=segment_count)
        .map(|i| {
            let t = i as f64 / segment_count as f64;
            slerp_with_threshold(a, b, t, threshold_rad)
        })
        .collect()
}

/// Point halfway along the great circle
pub fn midpoint(a: &GeoPoint, b: &GeoPoint) -> GeoPoint {
    slerp(a, b, 0.5)
}

/// Forward azimuth at `a` toward `b`, degrees clockwise from north in [0, 360)
pub fn initial_bearing_deg(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL_DEG: f64 = 1e-9;

    #[test]
    fn test_quarter_equator_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 90.0);

        let distance = haversine_meters(&a, &b);
        assert!((distance - 10_007_543.4).abs() < 1.0);
        assert!((distance - PI * EARTH_MEAN_RADIUS_M / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_symmetry_and_identity() {
        let pairs = [
            (GeoPoint::new(37.5665, 126.978), GeoPoint::new(35.1796, 129.0756)),
            (GeoPoint::new(-33.8688, 151.2093), GeoPoint::new(51.5074, -0.1278)),
            (GeoPoint::new(89.9, 0.0), GeoPoint::new(-89.9, 180.0)),
        ];

        for (a, b) in pairs {
            assert!((haversine_meters(&a, &b) - haversine_meters(&b, &a)).abs() < 1e-6);
            assert_eq!(haversine_meters(&a, &a), 0.0);
        }
    }

    #[test]
    fn test_unit_vector_inverse_wraps_longitude() {
        let p = GeoPoint::new(12.5, 179.9999);
        let back = from_unit_vector(&to_unit_vector(&p));
        assert!(back.approx_eq(&p, 1e-9));

        let v = to_unit_vector(&GeoPoint::new(0.0, -179.0));
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((from_unit_vector(&v).lon + 179.0).abs() < 1e-9);
    }

    #[test]
    fn test_slerp_coincident_points() {
        let a = GeoPoint::new(48.8566, 2.3522);
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(slerp(&a, &a, t), a);
        }
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = GeoPoint::new(37.5665, 126.978);
        let b = GeoPoint::new(40.7128, -74.006);

        assert_eq!(slerp(&a, &b, 0.0), a);
        assert!(slerp(&a, &b, 1.0).approx_eq(&b, TOL_DEG));
    }

    #[test]
    fn test_slerp_follows_great_circle() {
        // Equator midpoint is on the equator.
        let mid = slerp(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 90.0), 0.5);
        assert!(mid.approx_eq(&GeoPoint::new(0.0, 45.0), 1e-9));

        // Two points on the 60th parallel: the great circle bulges poleward,
        // unlike a linear lat/lon blend which would stay at 60°.
        let a = GeoPoint::new(60.0, -90.0);
        let b = GeoPoint::new(60.0, 90.0);
        let mid = slerp(&a, &b, 0.5);
        assert!((mid.lat - 90.0).abs() < 1e-6);

        let a = GeoPoint::new(60.0, 0.0);
        let b = GeoPoint::new(60.0, 60.0);
        let mid = slerp(&a, &b, 0.5);
        assert!(mid.lat > 60.0 + 1.0);
        assert!((mid.lon - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_slerp_constant_angular_rate() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(-30.0, 100.0);
        let total = angular_separation(&a, &b);

        for t in [0.1, 0.3, 0.6, 0.9] {
            let p = slerp(&a, &b, t);
            assert!((angular_separation(&a, &p) - t * total).abs() < 1e-9);
        }
    }

    #[test]
    fn test_slerp_crosses_antimeridian() {
        let a = GeoPoint::new(0.0, 170.0);
        let b = GeoPoint::new(0.0, -170.0);
        let mid = slerp(&a, &b, 0.5);
        assert!((mid.lon.abs() - 180.0).abs() < 1e-9);
        assert!(mid.lat.abs() < 1e-9);
    }

    #[test]
    fn test_slerp_antipodal_goes_over_the_pole() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);

        assert_eq!(slerp(&a, &b, 0.0), a);
        assert_eq!(slerp(&a, &b, 1.0), b);
        assert!((slerp(&a, &b, 0.5).lat - 90.0).abs() < 1e-6);

        let quarter = slerp(&a, &b, 0.25);
        assert!((quarter.lat - 45.0).abs() < 1e-6);
        assert!(quarter.lon.abs() < 1e-6);

        let three_quarters = slerp(&a, &b, 0.75);
        assert!((three_quarters.lat - 45.0).abs() < 1e-6);
        assert!((three_quarters.lon.abs() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_slerp_antipodal_from_pole() {
        let a = GeoPoint::new(90.0, 0.0);
        let b = GeoPoint::new(-90.0, 0.0);

        assert_eq!(slerp(&a, &b, 1.0), b);
        let mid = slerp(&a, &b, 0.5);
        assert!(mid.lat.abs() < 1e-6);
        assert!(mid.lon.abs() < 1e-6);
    }

    #[test]
    fn test_sample_antipodal_route_moves() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let route = sample_great_circle(&a, &b, 8);

        assert_eq!(route[0], a);
        assert_eq!(route[8], b);
        for pair in route.windows(2) {
            let step = angular_separation(&pair[0], &pair[1]);
            assert!((step - PI / 8.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sample_great_circle_endpoints() {
        let a = GeoPoint::new(37.5665, 126.978);
        let b = GeoPoint::new(34.0522, -118.2437);

        let route = sample_great_circle(&a, &b, 64);
        assert_eq!(route.len(), 65);
        assert!(route[0].approx_eq(&a, TOL_DEG));
        assert!(route[64].approx_eq(&b, TOL_DEG));

        // Restartable: identical output on a second call.
        assert_eq!(route, sample_great_circle(&a, &b, 64));
    }

    #[test]
    fn test_sample_zero_segments() {
        let a = GeoPoint::new(1.0, 2.0);
        let route = sample_great_circle(&a, &GeoPoint::new(3.0, 4.0), 0);
        assert_eq!(route, vec![a]);
    }

    #[test]
    fn test_initial_bearing() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((initial_bearing_deg(&origin, &GeoPoint::new(10.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing_deg(&origin, &GeoPoint::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing_deg(&origin, &GeoPoint::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing_deg(&origin, &GeoPoint::new(0.0, -10.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint() {
        let mid = midpoint(&GeoPoint::new(0.0, -10.0), &GeoPoint::new(0.0, 10.0));
        assert!(mid.approx_eq(&GeoPoint::new(0.0, 0.0), 1e-9));
    }
}
