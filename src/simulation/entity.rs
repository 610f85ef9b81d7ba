//! Constant-speed motion of one entity along a great circle

use crate::algorithms::geodesic::{
    haversine_meters, initial_bearing_deg, sample_great_circle_with_threshold,
    slerp_with_threshold,
};
use crate::core::{
    EntityId, GeoPoint, DEFAULT_ROUTE_SEGMENTS, DEGENERATE_ANGLE_RAD, MACH_3_MS, MIN_DURATION_S,
};
use crate::utils::config::MotionConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to create a moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntityRequest {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub hostile: bool,
    pub label: String,
}

/// Motion parameters shared by every entity of a simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParameters {
    pub speed_mps: f64,
    pub route_segments: usize,
    pub degenerate_angle_rad: f64,
    pub min_duration_s: f64,
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            speed_mps: MACH_3_MS,
            route_segments: DEFAULT_ROUTE_SEGMENTS,
            degenerate_angle_rad: DEGENERATE_ANGLE_RAD,
            min_duration_s: MIN_DURATION_S,
        }
    }
}

impl From<&MotionConfig> for MotionParameters {
    fn from(config: &MotionConfig) -> Self {
        Self {
            speed_mps: config.speed_mps,
            route_segments: config.route_segments,
            degenerate_angle_rad: config.degenerate_angle_rad,
            min_duration_s: config.min_duration_s,
        }
    }
}

/// Point-in-time view of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub label: String,
    pub hostile: bool,
    pub position: GeoPoint,
    /// Fraction of the route covered, in [0, 1]
    pub progress: f64,
    pub elapsed_s: f64,
    pub duration_s: f64,
    pub distance_m: f64,
    /// Great-circle heading in degrees from north
    pub heading_deg: f64,
    pub arrived: bool,
}

impl From<&MotionEntity> for EntitySnapshot {
    fn from(entity: &MotionEntity) -> Self {
        Self {
            id: entity.id(),
            label: entity.label().to_string(),
            hostile: entity.is_hostile(),
            position: entity.current_position(),
            progress: entity.progress(),
            elapsed_s: entity.elapsed_s(),
            duration_s: entity.duration_s(),
            distance_m: entity.distance_m(),
            heading_deg: entity.heading_deg(),
            arrived: entity.is_arrived(),
        }
    }
}

/// A point moving from `start` to `end` at constant ground speed.
///
/// Start, end, distance, duration and route are fixed at construction; only
/// the elapsed time changes afterwards, always within `[0, duration_s]`.
#[derive(Debug, Clone)]
pub struct MotionEntity {
    id: EntityId,
    label: String,
    start: GeoPoint,
    end: GeoPoint,
    speed_mps: f64,
    hostile: bool,
    distance_m: f64,
    duration_s: f64,
    elapsed_s: f64,
    degenerate_angle_rad: f64,
    route: Vec<GeoPoint>,
    current: GeoPoint,
}

impl MotionEntity {
    pub fn new(id: EntityId, request: CreateEntityRequest, params: &MotionParameters) -> Self {
        let CreateEntityRequest { start, end, hostile, label } = request;

        let distance_m = haversine_meters(&start, &end);
        let duration_s = (distance_m / params.speed_mps).max(params.min_duration_s);
        let route = sample_great_circle_with_threshold(
            &start,
            &end,
            params.route_segments,
            params.degenerate_angle_rad,
        );

        Self {
            id,
            label,
            start,
            end,
            speed_mps: params.speed_mps,
            hostile,
            distance_m,
            duration_s,
            elapsed_s: 0.0,
            degenerate_angle_rad: params.degenerate_angle_rad,
            route,
            current: start,
        }
    }

    /// Move forward by `dt_s` seconds. Non-positive or NaN deltas are ignored.
    ///
    /// Returns true when elapsed time changed.
    pub fn advance(&mut self, dt_s: f64) -> bool {
        if !(dt_s > 0.0) || self.is_arrived() {
            return false;
        }

        self.elapsed_s = (self.elapsed_s + dt_s).min(self.duration_s);
        self.current = self.position_at(self.progress());
        true
    }

    /// Return to the start point with zero elapsed time
    pub fn restart(&mut self) {
        self.elapsed_s = 0.0;
        self.current = self.start;
    }

    /// Position at progress `t` in [0, 1] along the route
    pub fn position_at(&self, t: f64) -> GeoPoint {
        slerp_with_threshold(&self.start, &self.end, t, self.degenerate_angle_rad)
    }

    /// Fraction of the route covered, in [0, 1]
    pub fn progress(&self) -> f64 {
        (self.elapsed_s / self.duration_s).clamp(0.0, 1.0)
    }

    pub fn is_arrived(&self) -> bool {
        self.elapsed_s >= self.duration_s
    }

    pub fn remaining_s(&self) -> f64 {
        self.duration_s - self.elapsed_s
    }

    /// Heading along the great circle at the current position (degrees from north)
    pub fn heading_deg(&self) -> f64 {
        if self.is_arrived() {
            // Keep the final approach heading instead of pointing at ourselves.
            let previous = self.position_at(1.0 - 1.0 / self.route.len().max(2) as f64);
            initial_bearing_deg(&previous, &self.end)
        } else {
            initial_bearing_deg(&self.current, &self.end)
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start(&self) -> GeoPoint {
        self.start
    }

    pub fn end(&self) -> GeoPoint {
        self.end
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn is_hostile(&self) -> bool {
        self.hostile
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn route(&self) -> &[GeoPoint] {
        &self.route
    }

    pub fn current_position(&self) -> GeoPoint {
        self.current
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot::from(self)
    }
}
