//! Great-Circle Motion Simulator
//!
//! Entities travel at constant ground speed along the great circle between
//! two clicked points. The host drives time with explicit ticks and renders
//! whatever the simulator pushes into its [`MapSink`].

pub mod core;
pub mod algorithms;
pub mod simulation;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{EntityId, GeoPoint, EARTH_MEAN_RADIUS_M, MACH_3_MS};
pub use algorithms::geodesic::{haversine_meters, sample_great_circle, slerp};
pub use simulation::{
    AnimationScheduler, CreateEntityRequest, MotionEntity, MotionParameters, PlacementEvent,
    PlacementOutcome, PlacementState, PlacementStateMachine, StopReason, TickReport,
};
pub use validation::{CoordinatePolicy, CoordinateValidator, SimError, SimResult};
pub use utils::{ArrivalPolicy, ConfigError, ConfigurationManager, MapViewConfig, SimulationConfig};
pub use api::{
    CallbackSink, ClickOutcome, CommandSender, EntitySnapshot, MapSink, NullSink, RecordingSink,
    Simulation, SimulationCommand, SinkEvent, StatusMessage,
};
