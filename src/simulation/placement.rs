//! Two-click placement of new entities
//!
//! While placement mode is active, the first click captures the start point
//! and the hostility flag, and the second click completes a
//! [`CreateEntityRequest`]. The machine then waits for a fresh start point; the
//! previous end point is never reused.

use crate::core::{GeoPoint, DEFAULT_ENTITY_LABEL};
use crate::simulation::entity::CreateEntityRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Where the machine is inside an active placement session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementState {
    AwaitingStart,
    AwaitingEnd {
        pending_start: GeoPoint,
        pending_hostile: bool,
    },
}

/// Result of feeding one click to the machine
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    /// Placement mode is off
    Ignored,
    /// The click became the start point of the next entity
    StartCaptured(GeoPoint),
    /// Both points are known
    Completed(CreateEntityRequest),
}

/// Placement mode transition, forwarded to the host for cursor and drag-lock handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementEvent {
    Entered,
    Exited,
}

impl PlacementEvent {
    pub fn is_active(&self) -> bool {
        matches!(self, PlacementEvent::Entered)
    }
}

/// Status line shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMessage {
    /// Waiting, placement mode off
    Idle,
    /// Placement mode on, next click is the start point
    ClickStart,
    /// Placement mode on, next click is the end point
    ClickEnd,
    /// All entities were removed
    Cleared,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusMessage::Idle => "Status: idle",
            StatusMessage::ClickStart => "Placement mode: click the start point",
            StatusMessage::ClickEnd => "Placement mode: click the end point",
            StatusMessage::Cleared => "Status: all entities cleared",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct PlacementStateMachine {
    active: bool,
    state: PlacementState,
    label: String,
}

impl Default for PlacementStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_ENTITY_LABEL)
    }
}

impl PlacementStateMachine {
    /// Machine that stamps `label` on every completed request
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            active: false,
            state: PlacementState::AwaitingStart,
            label: label.into(),
        }
    }

    pub fn enter(&mut self) -> PlacementEvent {
        self.active = true;
        self.state = PlacementState::AwaitingStart;
        debug!("placement mode entered");
        PlacementEvent::Entered
    }

    /// Leave placement mode, discarding a captured start point
    pub fn exit(&mut self) -> PlacementEvent {
        if let PlacementState::AwaitingEnd { pending_start, .. } = self.state {
            debug!(%pending_start, "pending start point discarded");
        }
        self.active = false;
        self.state = PlacementState::AwaitingStart;
        debug!("placement mode exited");
        PlacementEvent::Exited
    }

    pub fn on_point_clicked(&mut self, point: GeoPoint, hostile: bool) -> PlacementOutcome {
        if !self.active {
            return PlacementOutcome::Ignored;
        }

        match self.state {
            PlacementState::AwaitingStart => {
                self.state = PlacementState::AwaitingEnd {
                    pending_start: point,
                    pending_hostile: hostile,
                };
                debug!(start = %point, hostile, "start point captured");
                PlacementOutcome::StartCaptured(point)
            }
            PlacementState::AwaitingEnd {
                pending_start,
                pending_hostile,
            } => {
                self.state = PlacementState::AwaitingStart;
                debug!(start = %pending_start, end = %point, "placement completed");
                PlacementOutcome::Completed(CreateEntityRequest {
                    start: pending_start,
                    end: point,
                    hostile: pending_hostile,
                    label: self.label.clone(),
                })
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Status line for the current state
    pub fn prompt(&self) -> StatusMessage {
        match (self.active, self.state) {
            (false, _) => StatusMessage::Idle,
            (true, PlacementState::AwaitingStart) => StatusMessage::ClickStart,
            (true, PlacementState::AwaitingEnd { .. }) => StatusMessage::ClickEnd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_clicks_are_ignored() {
        let mut machine = PlacementStateMachine::default();
        assert_eq!(
            machine.on_point_clicked(GeoPoint::new(1.0, 1.0), false),
            PlacementOutcome::Ignored
        );
        assert_eq!(machine.prompt(), StatusMessage::Idle);
    }

    #[test]
    fn test_two_clicks_complete_a_request() {
        let p1 = GeoPoint::new(37.5, 127.0);
        let p2 = GeoPoint::new(35.1, 129.0);
        let p3 = GeoPoint::new(33.5, 126.5);
        let mut machine = PlacementStateMachine::default();

        assert_eq!(machine.enter(), PlacementEvent::Entered);
        assert_eq!(machine.prompt(), StatusMessage::ClickStart);

        assert_eq!(machine.on_point_clicked(p1, true), PlacementOutcome::StartCaptured(p1));
        assert_eq!(machine.prompt(), StatusMessage::ClickEnd);

        let outcome = machine.on_point_clicked(p2, true);
        assert_eq!(
            outcome,
            PlacementOutcome::Completed(CreateEntityRequest {
                start: p1,
                end: p2,
                hostile: true,
                label: DEFAULT_ENTITY_LABEL.to_string(),
            })
        );

        // A third click opens a new pair instead of chaining from p2.
        assert_eq!(machine.on_point_clicked(p3, true), PlacementOutcome::StartCaptured(p3));
        assert_eq!(
            machine.state(),
            PlacementState::AwaitingEnd {
                pending_start: p3,
                pending_hostile: true
            }
        );
    }

    #[test]
    fn test_hostility_is_taken_from_first_click() {
        let mut machine = PlacementStateMachine::new("Bandit");
        machine.enter();
        machine.on_point_clicked(GeoPoint::new(0.0, 0.0), true);

        match machine.on_point_clicked(GeoPoint::new(0.0, 10.0), false) {
            PlacementOutcome::Completed(request) => {
                assert!(request.hostile);
                assert_eq!(request.label, "Bandit");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_exit_discards_pending_start() {
        let mut machine = PlacementStateMachine::default();
        machine.enter();
        machine.on_point_clicked(GeoPoint::new(0.0, 0.0), false);

        assert_eq!(machine.exit(), PlacementEvent::Exited);
        assert!(!machine.is_active());
        assert_eq!(machine.state(), PlacementState::AwaitingStart);

        machine.enter();
        let q = GeoPoint::new(5.0, 5.0);
        assert_eq!(machine.on_point_clicked(q, false), PlacementOutcome::StartCaptured(q));
    }

    #[test]
    fn test_reenter_resets_session() {
        let mut machine = PlacementStateMachine::default();
        machine.enter();
        machine.on_point_clicked(GeoPoint::new(0.0, 0.0), false);
        machine.enter();
        assert_eq!(machine.prompt(), StatusMessage::ClickStart);
    }

    #[test]
    fn test_label_change_applies_to_next_request() {
        let mut machine = PlacementStateMachine::default();
        assert_eq!(machine.label(), DEFAULT_ENTITY_LABEL);

        machine.enter();
        machine.on_point_clicked(GeoPoint::new(0.0, 0.0), false);
        machine.set_label("Interceptor");
        assert_eq!(machine.label(), "Interceptor");

        match machine.on_point_clicked(GeoPoint::new(1.0, 1.0), false) {
            PlacementOutcome::Completed(request) => assert_eq!(request.label, "Interceptor"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_status_message_text() {
        assert_eq!(StatusMessage::ClickEnd.to_string(), "Placement mode: click the end point");
        assert_eq!(
            serde_json::to_string(&StatusMessage::ClickStart).unwrap(),
            "\"click_start\""
        );
    }
}
