//! Sink that records every message, for tests and trace output

use crate::core::{EntityId, GeoPoint};
use crate::simulation::placement::StatusMessage;
use crate::simulation::sink::MapSink;
use crate::utils::config::MapViewConfig;
use serde::Serialize;

/// One message received by a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    MarkerPlaced {
        id: EntityId,
        position: GeoPoint,
        hostile: bool,
        label: String,
    },
    RoutePlaced {
        id: EntityId,
        points: Vec<GeoPoint>,
        hostile: bool,
    },
    PositionUpdated {
        id: EntityId,
        position: GeoPoint,
    },
    Cleared,
    PlacementModeChanged {
        active: bool,
    },
    ViewChanged {
        view: MapViewConfig,
    },
    StatusChanged {
        status: StatusMessage,
    },
}

/// Records sink traffic in arrival order
#[derive(Debug)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
    record_updates: bool,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            record_updates: true,
        }
    }

    /// Record creation, clear and mode events but skip per-tick position updates
    pub fn without_position_updates() -> Self {
        Self {
            events: Vec::new(),
            record_updates: false,
        }
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Position updates received for `id`, oldest first
    pub fn updates_for(&self, id: EntityId) -> Vec<GeoPoint> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::PositionUpdated { id: event_id, position } if *event_id == id => {
                    Some(*position)
                }
                _ => None,
            })
            .collect()
    }

    /// Total number of position updates received
    pub fn update_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SinkEvent::PositionUpdated { .. }))
            .count()
    }

    /// One JSON object per recorded event, newline separated
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let lines = self
            .events
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    pub fn last_status(&self) -> Option<StatusMessage> {
        self.events.iter().rev().find_map(|event| match event {
            SinkEvent::StatusChanged { status } => Some(*status),
            _ => None,
        })
    }
}

impl MapSink for RecordingSink {
    fn place_marker(&mut self, id: EntityId, position: GeoPoint, hostile: bool, label: &str) {
        self.events.push(SinkEvent::MarkerPlaced {
            id,
            position,
            hostile,
            label: label.to_string(),
        });
    }

    fn place_route(&mut self, id: EntityId, points: &[GeoPoint], hostile: bool) {
        self.events.push(SinkEvent::RoutePlaced {
            id,
            points: points.to_vec(),
            hostile,
        });
    }

    fn update_position(&mut self, id: EntityId, position: GeoPoint) {
        if self.record_updates {
            self.events.push(SinkEvent::PositionUpdated { id, position });
        }
    }

    fn clear_all(&mut self) {
        self.events.push(SinkEvent::Cleared);
    }

    fn placement_mode_changed(&mut self, active: bool) {
        self.events.push(SinkEvent::PlacementModeChanged { active });
    }

    fn view_changed(&mut self, view: &MapViewConfig) {
        self.events.push(SinkEvent::ViewChanged { view: view.clone() });
    }

    fn status_changed(&mut self, status: StatusMessage) {
        self.events.push(SinkEvent::StatusChanged { status });
    }
}
