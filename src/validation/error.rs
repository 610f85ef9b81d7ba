//! Error types surfaced by the simulator API

use crate::core::GeoPoint;
use crate::utils::config::ConfigError;
use thiserror::Error;

/// Errors returned by the simulation facade.
///
/// The motion core itself never fails: degenerate arcs, zero-length routes and
/// non-positive tick deltas all degrade to a defined no-op. Only inputs that
/// cross the API boundary can be refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A coordinate was refused by the active coordinate policy
    #[error("invalid coordinate {point}: {reason}")]
    InvalidCoordinate { point: GeoPoint, reason: String },

    /// Configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A placement click arrived while placement mode was off
    #[error("placement mode is not active")]
    PlacementInactive,

    /// The command channel has no remaining senders or receiver
    #[error("command queue closed")]
    CommandQueueClosed,

    /// The command queue already holds `capacity` unapplied commands
    #[error("command queue full ({capacity} pending)")]
    CommandQueueFull { capacity: usize },

    /// Every entity id has been handed out
    #[error("entity ids exhausted")]
    EntityIdsExhausted,
}

/// Result type for simulator operations
pub type SimResult<T> = Result<T, SimError>;
