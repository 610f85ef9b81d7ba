//! Input validation and error reporting

pub mod coordinates;
pub mod error;

pub use coordinates::{CoordinatePolicy, CoordinateValidator};
pub use error::{SimError, SimResult};
