//! Motion entities, the tick scheduler, click placement and the map sink interface

pub mod entity;
pub mod placement;
pub mod scheduler;
pub mod sink;

pub use entity::{CreateEntityRequest, EntitySnapshot, MotionEntity, MotionParameters};
pub use placement::{
    PlacementEvent, PlacementOutcome, PlacementState, PlacementStateMachine, StatusMessage,
};
pub use scheduler::{AnimationScheduler, StopReason, TickReport};
pub use sink::{MapSink, NullSink};
