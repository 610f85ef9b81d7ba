//! Host-facing API
//!
//! The [`Simulation`] facade, stock [`MapSink`] implementations, the
//! cross-thread command queue and output formatters.

pub mod callback;
pub mod command;
pub mod formatting;
pub mod recording;
pub mod simulation;

pub use callback::{CallbackHandle, CallbackSink, EventCallback, PositionCallback};
pub use command::{CommandOutcome, CommandSender, SimulationCommand};
pub use formatting::{CsvFormatter, EntitySnapshot, JsonFormatter, TextFormatter};
pub use recording::{RecordingSink, SinkEvent};
pub use simulation::{ClickOutcome, Simulation};
pub use crate::simulation::{MapSink, NullSink, StatusMessage};
