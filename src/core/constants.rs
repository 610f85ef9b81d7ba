//! Physical constants and simulation defaults

/// Mean Earth radius used by the spherical model (m)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Speed of sound in air at sea level (m/s)
pub const SPEED_OF_SOUND_SEA_LEVEL: f64 = 340.29;

/// Default ground speed for every entity: Mach 3 at sea level (≈1020.87 m/s)
pub const MACH_3_MS: f64 = SPEED_OF_SOUND_SEA_LEVEL * 3.0;

/// Number of segments used to sample a route polyline
pub const DEFAULT_ROUTE_SEGMENTS: usize = 64;

/// Nominal tick interval for hosts driving the scheduler (~60 Hz)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

/// Angular separation below which two points count as the same (radians)
pub const DEGENERATE_ANGLE_RAD: f64 = 1e-9;

/// Lower bound on an entity's travel time (seconds)
pub const MIN_DURATION_S: f64 = 0.001;

/// Label given to entities created through placement clicks
pub const DEFAULT_ENTITY_LABEL: &str = "Runtime";

/// Commands that may wait in a simulation's queue before senders are refused
pub const COMMAND_QUEUE_CAPACITY: usize = 256;
