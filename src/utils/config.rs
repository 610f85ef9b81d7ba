use crate::core::{
    GeoPoint, DEFAULT_ENTITY_LABEL, DEFAULT_ROUTE_SEGMENTS, DEFAULT_TICK_INTERVAL_MS,
    DEGENERATE_ANGLE_RAD, MACH_3_MS, MIN_DURATION_S,
};
use crate::validation::coordinates::CoordinatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on route sampling density
pub const MAX_ROUTE_SEGMENTS: usize = 4096;

/// Simulation-wide configuration, fixed for the lifetime of a [`crate::Simulation`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Entity motion parameters
    pub motion: MotionConfig,
    /// Tick cadence and scheduler behaviour
    pub timing: TimingConfig,
    /// Placement session settings
    pub placement: PlacementConfig,
    /// Initial map view handed to the sink
    pub view: MapViewConfig,
}

/// Entity motion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Ground speed applied to every entity (m/s)
    pub speed_mps: f64,
    /// Segments per route polyline
    pub route_segments: usize,
    /// Arcs shorter than this are treated as a single point (radians)
    pub degenerate_angle_rad: f64,
    /// Floor on travel time (seconds)
    pub min_duration_s: f64,
    /// Behaviour once an entity reaches its end point
    pub arrival_policy: ArrivalPolicy,
}

/// Behaviour of an entity that has reached its end point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalPolicy {
    /// Stay at the end point
    #[default]
    Freeze,
    /// Start over from the start point
    Loop,
}

/// Tick cadence and scheduler behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Nominal interval between host ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Stop the scheduler once nothing is in flight
    pub stop_when_idle: bool,
}

/// Placement session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Label given to entities created by clicks
    pub default_label: String,
    /// Range handling for clicked and spawned coordinates
    pub coordinate_policy: CoordinatePolicy,
}

/// Map view requested from the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    /// Map center
    pub center: GeoPoint,
    /// Zoom level
    pub zoom: f64,
    /// Minimum zoom level
    pub min_zoom: f64,
    /// Maximum zoom level
    pub max_zoom: f64,
    /// Whether the user may drag the map outside placement mode
    pub draggable: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_mps: MACH_3_MS,
            route_segments: DEFAULT_ROUTE_SEGMENTS,
            degenerate_angle_rad: DEGENERATE_ANGLE_RAD,
            min_duration_s: MIN_DURATION_S,
            arrival_policy: ArrivalPolicy::Freeze,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            stop_when_idle: false,
        }
    }
}

impl MapViewConfig {
    /// Check center range and zoom bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_view(self)
    }
}

impl TimingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_label: DEFAULT_ENTITY_LABEL.to_string(),
            coordinate_policy: CoordinatePolicy::Normalize,
        }
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        // Seoul
        Self {
            center: GeoPoint::new(37.5665, 126.9780),
            zoom: 7.0,
            min_zoom: 2.0,
            max_zoom: 18.0,
            draggable: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("I/O error: {message}")]
    Io { message: String },
    /// JSON serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<ConfigError>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// First error, if any, as a `Result`
    pub fn into_result(self) -> Result<(), ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Loads, validates and stores a [`SimulationConfig`]
pub struct ConfigurationManager {
    config: SimulationConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn into_config(self) -> SimulationConfig {
        self.config
    }

    /// Replace the whole configuration after validation
    pub fn update_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        Self::validate_config(&config).into_result()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from a JSON file. Missing sections take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SimulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
                message: format!("failed to parse config file '{}': {}", path_str, e),
            })?;

        let validation = Self::validate_config(&config);
        for warning in &validation.warnings {
            tracing::warn!(path = %path_str, "{}", warning);
        }
        validation.into_result()?;

        tracing::info!(path = %path_str, "configuration loaded");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::Serialization {
                message: format!("failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::Io {
                message: "no file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last load or save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Update entity speed, returning the previous value
    pub fn set_speed_mps(&mut self, speed_mps: f64) -> Result<f64, ConfigError> {
        validate_speed(speed_mps)?;
        let old_value = self.config.motion.speed_mps;
        self.config.motion.speed_mps = speed_mps;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Update route sampling density, returning the previous value
    pub fn set_route_segments(&mut self, segments: usize) -> Result<usize, ConfigError> {
        validate_route_segments(segments)?;
        let old_value = self.config.motion.route_segments;
        self.config.motion.route_segments = segments;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Select the arrival policy, returning the previous one
    pub fn set_arrival_policy(&mut self, policy: ArrivalPolicy) -> ArrivalPolicy {
        let old_value = self.config.motion.arrival_policy;
        self.config.motion.arrival_policy = policy;
        self.is_modified = true;
        old_value
    }

    /// Replace the map view, returning the previous one
    pub fn set_view(&mut self, view: MapViewConfig) -> Result<MapViewConfig, ConfigError> {
        validate_view(&view)?;
        self.is_modified = true;
        Ok(std::mem::replace(&mut self.config.view, view))
    }

    /// Validate a full configuration
    pub fn validate_config(config: &SimulationConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let motion = &config.motion;

        if let Err(e) = validate_speed(motion.speed_mps) {
            errors.push(e);
        }
        if let Err(e) = validate_route_segments(motion.route_segments) {
            errors.push(e);
        }

        if !(motion.degenerate_angle_rad > 0.0 && motion.degenerate_angle_rad < 0.1) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "degenerate_angle_rad".to_string(),
                value: motion.degenerate_angle_rad.to_string(),
                reason: "threshold must be in (0, 0.1) radians".to_string(),
            });
        }

        if !(motion.min_duration_s > 0.0 && motion.min_duration_s.is_finite()) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "min_duration_s".to_string(),
                value: motion.min_duration_s.to_string(),
                reason: "duration floor must be positive".to_string(),
            });
        }

        let tick = config.timing.tick_interval_ms;
        if !(1..=1000).contains(&tick) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "tick_interval_ms".to_string(),
                value: tick.to_string(),
                reason: "tick interval must be between 1 and 1000 ms".to_string(),
            });
        } else if tick > 100 {
            warnings.push(format!("tick interval {} ms will animate visibly coarse", tick));
        }

        if let Err(e) = validate_view(&config.view) {
            errors.push(e);
        }

        if config.placement.default_label.trim().is_empty() {
            warnings.push("default entity label is empty".to_string());
        }

        if motion.route_segments > 1024 {
            warnings.push(format!(
                "{} route segments per entity is expensive to render",
                motion.route_segments
            ));
        }

        ValidationResult::from_parts(errors, warnings)
    }
}

fn validate_speed(speed_mps: f64) -> Result<(), ConfigError> {
    if speed_mps.is_finite() && speed_mps > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            parameter: "speed_mps".to_string(),
            value: speed_mps.to_string(),
            reason: "speed must be positive and finite".to_string(),
        })
    }
}

fn validate_route_segments(segments: usize) -> Result<(), ConfigError> {
    if (1..=MAX_ROUTE_SEGMENTS).contains(&segments) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            parameter: "route_segments".to_string(),
            value: segments.to_string(),
            reason: format!("segment count must be between 1 and {}", MAX_ROUTE_SEGMENTS),
        })
    }
}

fn validate_view(view: &MapViewConfig) -> Result<(), ConfigError> {
    if !view.center.is_in_range() {
        return Err(ConfigError::InvalidParameter {
            parameter: "view.center".to_string(),
            value: view.center.to_string(),
            reason: "center must be a valid latitude/longitude".to_string(),
        });
    }

    if !(view.min_zoom.is_finite() && view.max_zoom.is_finite() && view.min_zoom <= view.max_zoom) {
        return Err(ConfigError::InvalidParameter {
            parameter: "view.min_zoom/max_zoom".to_string(),
            value: format!("{}..{}", view.min_zoom, view.max_zoom),
            reason: "zoom bounds must be finite and ordered".to_string(),
        });
    }

    if !(view.min_zoom..=view.max_zoom).contains(&view.zoom) {
        return Err(ConfigError::InvalidParameter {
            parameter: "view.zoom".to_string(),
            value: view.zoom.to_string(),
            reason: format!("zoom must be between {} and {}", view.min_zoom, view.max_zoom),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("geoflight_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!((config.motion.speed_mps - 1020.87).abs() < 1e-9);
        assert_eq!(config.motion.route_segments, 64);
        assert_eq!(config.timing.tick_interval_ms, 16);
        assert_eq!(config.motion.degenerate_angle_rad, 1e-9);
        assert_eq!(config.motion.arrival_policy, ArrivalPolicy::Freeze);
        assert_eq!(config.placement.coordinate_policy, CoordinatePolicy::Normalize);
        assert!(ConfigurationManager::validate_config(&config).is_valid);
    }

    #[test]
    fn test_invalid_config_collects_errors() {
        let mut config = SimulationConfig::default();
        config.motion.speed_mps = 0.0;
        config.motion.route_segments = 0;
        config.timing.tick_interval_ms = 0;
        config.view.zoom = 30.0;

        let result = ConfigurationManager::validate_config(&config);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_runtime_speed_adjustment() {
        let mut manager = ConfigurationManager::new();

        let old = manager.set_speed_mps(340.29).unwrap();
        assert!((old - 1020.87).abs() < 1e-9);
        assert_eq!(manager.config().motion.speed_mps, 340.29);
        assert!(manager.is_modified());

        assert!(manager.set_speed_mps(-1.0).is_err());
        assert!(manager.set_speed_mps(f64::NAN).is_err());
        assert_eq!(manager.config().motion.speed_mps, 340.29);
    }

    #[test]
    fn test_route_segments_bounds() {
        let mut manager = ConfigurationManager::new();
        assert_eq!(manager.set_route_segments(128).unwrap(), 64);
        assert!(manager.set_route_segments(0).is_err());
        assert!(manager.set_route_segments(MAX_ROUTE_SEGMENTS + 1).is_err());
        assert_eq!(manager.config().motion.route_segments, 128);
    }

    #[test]
    fn test_set_view() {
        let mut manager = ConfigurationManager::new();
        let view = MapViewConfig {
            center: GeoPoint::new(35.1796, 129.0756),
            zoom: 10.0,
            ..MapViewConfig::default()
        };

        let old = manager.set_view(view.clone()).unwrap();
        assert_eq!(old, MapViewConfig::default());
        assert_eq!(manager.config().view, view);

        let bad = MapViewConfig { zoom: 1.0, ..MapViewConfig::default() };
        assert!(manager.set_view(bad).is_err());
    }

    #[test]
    fn test_arrival_policy_toggle() {
        let mut manager = ConfigurationManager::new();
        assert_eq!(manager.set_arrival_policy(ArrivalPolicy::Loop), ArrivalPolicy::Freeze);
        assert_eq!(manager.config().motion.arrival_policy, ArrivalPolicy::Loop);
    }

    #[test]
    fn test_config_file_round_trip() {
        let path = temp_path("round_trip");
        let mut manager = ConfigurationManager::new();
        manager.set_speed_mps(500.0).unwrap();
        manager.set_arrival_policy(ArrivalPolicy::Loop);
        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config(), manager.config());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "motion": { "speed_mps": 250.0 } }"#).unwrap();

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config().motion.speed_mps, 250.0);
        assert_eq!(loaded.config().motion.route_segments, DEFAULT_ROUTE_SEGMENTS);
        assert_eq!(loaded.config().view, MapViewConfig::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_invalid_config_file_rejected() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "motion": { "speed_mps": -5.0 } }"#).unwrap();
        assert!(matches!(
            ConfigurationManager::from_file(&path),
            Err(ConfigError::InvalidParameter { .. })
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ConfigurationManager::from_file(&path),
            Err(ConfigError::Serialization { .. })
        ));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_tick_interval() {
        let timing = TimingConfig {
            tick_interval_ms: 40,
            ..TimingConfig::default()
        };
        assert_eq!(timing.tick_interval(), Duration::from_millis(40));
        assert_eq!(TimingConfig::default().tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_update_config() {
        let mut manager = ConfigurationManager::new();

        let mut config = SimulationConfig::default();
        config.motion.speed_mps = 250.0;
        assert!(manager.update_config(config).is_ok());
        assert_eq!(manager.config().motion.speed_mps, 250.0);
        assert!(manager.is_modified());

        let mut bad = SimulationConfig::default();
        bad.timing.tick_interval_ms = 0;
        assert!(manager.update_config(bad).is_err());
        assert_eq!(manager.config().motion.speed_mps, 250.0);
    }
}
