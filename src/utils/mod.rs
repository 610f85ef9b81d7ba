//! Configuration handling

pub mod config;

pub use config::{
    ArrivalPolicy, ConfigError, ConfigurationManager, MapViewConfig, MotionConfig,
    PlacementConfig, SimulationConfig, TimingConfig,
};
