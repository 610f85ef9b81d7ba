//! Core types and constants for the great-circle motion simulator

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
