//! Callback-based sink for event-driven hosts
//!
//! Hosts that already have their own event plumbing register closures instead
//! of implementing [`MapSink`] by hand. Each registration returns a handle that
//! can later be used to remove it.

use crate::api::recording::SinkEvent;
use crate::core::{EntityId, GeoPoint};
use crate::simulation::placement::StatusMessage;
use crate::simulation::sink::MapSink;
use crate::utils::config::MapViewConfig;
use std::collections::BTreeMap;

/// Callback invoked for every position update
pub type PositionCallback = Box<dyn FnMut(EntityId, GeoPoint) + Send>;

/// Callback invoked for every other sink message
pub type EventCallback = Box<dyn FnMut(&SinkEvent) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// [`MapSink`] that fans messages out to registered closures.
///
/// Position updates go to position callbacks only; they are the hot path and
/// are not wrapped into a [`SinkEvent`]. Everything else goes to event
/// callbacks. Callbacks run in registration order.
#[derive(Default)]
pub struct CallbackSink {
    callback_counter: u32,
    position_callbacks: BTreeMap<CallbackHandle, PositionCallback>,
    event_callbacks: BTreeMap<CallbackHandle, EventCallback>,
}

impl CallbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_position_callback(&mut self, callback: PositionCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.position_callbacks.insert(handle, callback);
        handle
    }

    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.event_callbacks.insert(handle, callback);
        handle
    }

    /// Remove a callback. Returns false for unknown handles.
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.position_callbacks.remove(&handle).is_some()
            || self.event_callbacks.remove(&handle).is_some()
    }

    pub fn callback_count(&self) -> usize {
        self.position_callbacks.len() + self.event_callbacks.len()
    }

    fn next_handle(&mut self) -> CallbackHandle {
        self.callback_counter += 1;
        CallbackHandle(self.callback_counter)
    }

    fn trigger_event(&mut self, event: SinkEvent) {
        for callback in self.event_callbacks.values_mut() {
            callback(&event);
        }
    }
}

impl MapSink for CallbackSink {
    fn place_marker(&mut self, id: EntityId, position: GeoPoint, hostile: bool, label: &str) {
        self.trigger_event(SinkEvent::MarkerPlaced {
            id,
            position,
            hostile,
            label: label.to_string(),
        });
    }

    fn place_route(&mut self, id: EntityId, points: &[GeoPoint], hostile: bool) {
        self.trigger_event(SinkEvent::RoutePlaced {
            id,
            points: points.to_vec(),
            hostile,
        });
    }

    fn update_position(&mut self, id: EntityId, position: GeoPoint) {
        for callback in self.position_callbacks.values_mut() {
            callback(id, position);
        }
    }

    fn clear_all(&mut self) {
        self.trigger_event(SinkEvent::Cleared);
    }

    fn placement_mode_changed(&mut self, active: bool) {
        self.trigger_event(SinkEvent::PlacementModeChanged { active });
    }

    fn view_changed(&mut self, view: &MapViewConfig) {
        self.trigger_event(SinkEvent::ViewChanged { view: view.clone() });
    }

    fn status_changed(&mut self, status: StatusMessage) {
        self.trigger_event(SinkEvent::StatusChanged { status });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_position_callbacks() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let mut sink = CallbackSink::new();

        let store = Arc::clone(&received);
        sink.register_position_callback(Box::new(move |id, position| {
            store.lock().unwrap().push((id, position));
        }));

        sink.update_position(EntityId::new(1), GeoPoint::new(1.0, 1.0));
        sink.update_position(EntityId::new(2), GeoPoint::new(2.0, 2.0));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[1], (EntityId::new(2), GeoPoint::new(2.0, 2.0)));
    }

    #[test]
    fn test_event_callbacks_skip_position_updates() {
        let count = Arc::new(Mutex::new(0usize));
        let mut sink = CallbackSink::new();

        let counter = Arc::clone(&count);
        sink.register_event_callback(Box::new(move |_| {
            *counter.lock().unwrap() += 1;
        }));

        sink.place_marker(EntityId::new(1), GeoPoint::new(0.0, 0.0), false, "Runtime");
        sink.update_position(EntityId::new(1), GeoPoint::new(0.0, 1.0));
        sink.clear_all();

        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_unregister() {
        let mut sink = CallbackSink::new();
        let a = sink.register_position_callback(Box::new(|_, _| {}));
        let b = sink.register_event_callback(Box::new(|_| {}));

        assert_ne!(a, b);
        assert_eq!(sink.callback_count(), 2);
        assert!(sink.unregister_callback(a));
        assert!(!sink.unregister_callback(a));
        assert!(sink.unregister_callback(b));
        assert_eq!(sink.callback_count(), 0);
    }
}
