//! Renderer-facing interface
//!
//! The simulator owns no drawing. Every visible change is pushed to a
//! [`MapSink`] as an explicit message: entity created (marker + route),
//! position updated, everything cleared. Hosts implement the trait on top of
//! their map widget.

use crate::core::{EntityId, GeoPoint};
use crate::simulation::placement::StatusMessage;
use crate::utils::config::MapViewConfig;

/// Receiver of marker, route and position updates
pub trait MapSink {
    /// A new entity appeared at `position`
    fn place_marker(&mut self, id: EntityId, position: GeoPoint, hostile: bool, label: &str);

    /// The sampled great-circle route of a new entity
    fn place_route(&mut self, id: EntityId, points: &[GeoPoint], hostile: bool);

    /// Current position of an active entity, sent once per tick
    fn update_position(&mut self, id: EntityId, position: GeoPoint);

    /// Every marker and route must be removed
    fn clear_all(&mut self);

    /// Placement mode switched on or off. Hosts typically swap the cursor and
    /// lock map dragging while it is on.
    fn placement_mode_changed(&mut self, _active: bool) {}

    /// The requested map view changed
    fn view_changed(&mut self, _view: &MapViewConfig) {}

    /// User-facing status line changed
    fn status_changed(&mut self, _status: StatusMessage) {}
}

impl<S: MapSink + ?Sized> MapSink for &mut S {
    fn place_marker(&mut self, id: EntityId, position: GeoPoint, hostile: bool, label: &str) {
        (**self).place_marker(id, position, hostile, label)
    }

    fn place_route(&mut self, id: EntityId, points: &[GeoPoint], hostile: bool) {
        (**self).place_route(id, points, hostile)
    }

    fn update_position(&mut self, id: EntityId, position: GeoPoint) {
        (**self).update_position(id, position)
    }

    fn clear_all(&mut self) {
        (**self).clear_all()
    }

    fn placement_mode_changed(&mut self, active: bool) {
        (**self).placement_mode_changed(active)
    }

    fn view_changed(&mut self, view: &MapViewConfig) {
        (**self).view_changed(view)
    }

    fn status_changed(&mut self, status: StatusMessage) {
        (**self).status_changed(status)
    }
}

impl<S: MapSink + ?Sized> MapSink for Box<S> {
    fn place_marker(&mut self, id: EntityId, position: GeoPoint, hostile: bool, label: &str) {
        (**self).place_marker(id, position, hostile, label)
    }

    fn place_route(&mut self, id: EntityId, points: &[GeoPoint], hostile: bool) {
        (**self).place_route(id, points, hostile)
    }

    fn update_position(&mut self, id: EntityId, position: GeoPoint) {
        (**self).update_position(id, position)
    }

    fn clear_all(&mut self) {
        (**self).clear_all()
    }

    fn placement_mode_changed(&mut self, active: bool) {
        (**self).placement_mode_changed(active)
    }

    fn view_changed(&mut self, view: &MapViewConfig) {
        (**self).view_changed(view)
    }

    fn status_changed(&mut self, status: StatusMessage) {
        (**self).status_changed(status)
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MapSink for NullSink {
    fn place_marker(&mut self, _id: EntityId, _position: GeoPoint, _hostile: bool, _label: &str) {}
    fn place_route(&mut self, _id: EntityId, _points: &[GeoPoint], _hostile: bool) {}
    fn update_position(&mut self, _id: EntityId, _position: GeoPoint) {}
    fn clear_all(&mut self) {}
}
