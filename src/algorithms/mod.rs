//! Geodesic algorithms

pub mod geodesic;

pub use geodesic::{
    angular_separation, from_unit_vector, haversine_meters, haversine_meters_with_radius,
    initial_bearing_deg, midpoint, sample_great_circle, slerp, slerp_with_threshold,
    to_unit_vector,
};
