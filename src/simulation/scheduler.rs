//! Tick-driven advancement of every live entity
//!
//! The scheduler never owns a timer. The host calls [`AnimationScheduler::tick`]
//! with monotonically non-decreasing timestamps at whatever cadence it likes;
//! the scheduler turns consecutive timestamps into a time delta and pushes one
//! position update per entity into the sink.

use crate::core::EntityId;
use crate::simulation::entity::MotionEntity;
use crate::simulation::sink::MapSink;
use crate::utils::config::{ArrivalPolicy, SimulationConfig};
use std::time::Instant;
use tracing::{info, trace};

/// Why the scheduler is not running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was called, or the scheduler was never started
    Requested,
    /// Every entity arrived and idle stopping is enabled
    Idle,
}

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Time delta applied to every entity, 0 when the tick was skipped
    pub dt_s: f64,
    /// Entities whose position was pushed to the sink
    pub advanced: usize,
    /// Entities that reached their end point during this tick
    pub arrived: Vec<EntityId>,
    /// Entities still moving after this tick
    pub in_flight: usize,
    /// Set when the scheduler stopped itself at the end of this tick
    pub stopped: Option<StopReason>,
}

impl TickReport {
    pub fn is_skipped(&self) -> bool {
        self.advanced == 0 && self.dt_s <= 0.0
    }
}

/// Ordered set of active entities plus the tick clock
#[derive(Debug)]
pub struct AnimationScheduler {
    entities: Vec<MotionEntity>,
    last_tick: Option<Instant>,
    running: bool,
    arrival_policy: ArrivalPolicy,
    stop_when_idle: bool,
    stop_reason: Option<StopReason>,
    tick_count: u64,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(ArrivalPolicy::default(), false)
    }
}

impl AnimationScheduler {
    pub fn new(arrival_policy: ArrivalPolicy, stop_when_idle: bool) -> Self {
        Self {
            entities: Vec::new(),
            last_tick: None,
            running: false,
            arrival_policy,
            stop_when_idle,
            stop_reason: Some(StopReason::Requested),
            tick_count: 0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.motion.arrival_policy, config.timing.stop_when_idle)
    }

    /// Begin ticking. The next tick measures no elapsed time.
    pub fn start(&mut self) {
        if !self.running {
            info!(entities = self.entities.len(), "scheduler started");
        }
        self.running = true;
        self.last_tick = None;
        self.stop_reason = None;
    }

    /// Halt ticking. Entity state is kept as is.
    pub fn stop(&mut self) {
        if self.running {
            info!(ticks = self.tick_count, "scheduler stopped");
        }
        self.running = false;
        self.stop_reason = Some(StopReason::Requested);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn arrival_policy(&self) -> ArrivalPolicy {
        self.arrival_policy
    }

    pub fn set_arrival_policy(&mut self, policy: ArrivalPolicy) {
        self.arrival_policy = policy;
    }

    /// Ticks processed while running, skipped ticks included
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Append an entity. A scheduler that stopped itself for idleness resumes.
    pub fn add(&mut self, entity: MotionEntity) {
        trace!(id = %entity.id(), "entity scheduled");
        self.entities.push(entity);
        self.resume_if_idle();
    }

    /// Restart a scheduler that stopped because nothing was moving
    pub fn resume_if_idle(&mut self) -> bool {
        if !self.running && self.stop_reason == Some(StopReason::Idle) {
            self.start();
            return true;
        }
        false
    }

    /// Advance every entity by the time since the previous tick.
    ///
    /// No-op while stopped. The first tick after `start()` and any tick with a
    /// non-positive delta push nothing to the sink.
    pub fn tick<S: MapSink + ?Sized>(&mut self, now: Instant, sink: &mut S) -> TickReport {
        if !self.running {
            return TickReport::default();
        }

        self.tick_count += 1;
        let dt_s = match self.last_tick.replace(now) {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };

        if dt_s <= 0.0 {
            trace!(tick = self.tick_count, "non-positive time delta, tick skipped");
            return TickReport {
                in_flight: self.in_flight(),
                ..TickReport::default()
            };
        }

        let mut report = TickReport {
            dt_s,
            ..TickReport::default()
        };

        for entity in &mut self.entities {
            let was_arrived = entity.is_arrived();
            entity.advance(dt_s);
            sink.update_position(entity.id(), entity.current_position());
            report.advanced += 1;

            if !was_arrived && entity.is_arrived() {
                info!(id = %entity.id(), label = entity.label(), "entity arrived");
                report.arrived.push(entity.id());
                if self.arrival_policy == ArrivalPolicy::Loop {
                    entity.restart();
                }
            }
        }

        report.in_flight = self.in_flight();
        trace!(
            tick = self.tick_count,
            dt_s,
            advanced = report.advanced,
            in_flight = report.in_flight,
            "tick"
        );

        if self.stop_when_idle && report.in_flight == 0 {
            self.running = false;
            self.stop_reason = Some(StopReason::Idle);
            report.stopped = Some(StopReason::Idle);
            info!(ticks = self.tick_count, "no entity in flight, scheduler idle");
        }

        report
    }

    /// Drop every entity and tell the sink to remove everything.
    /// The running state is left untouched.
    pub fn clear<S: MapSink + ?Sized>(&mut self, sink: &mut S) {
        let removed = self.entities.len();
        self.entities.clear();
        sink.clear_all();
        info!(removed, "entities cleared");
    }

    pub fn entities(&self) -> &[MotionEntity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&MotionEntity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.entities.iter().filter(|entity| !entity.is_arrived()).count()
    }

    pub fn any_in_flight(&self) -> bool {
        self.entities.iter().any(|entity| !entity.is_arrived())
    }
}
