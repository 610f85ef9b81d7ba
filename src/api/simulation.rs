//! Simulation facade
//!
//! Owns the scheduler, the placement state machine and the sink, and is the
//! only place where coordinate policy, entity ids and status changes are
//! handled. Hosts drive it with explicit calls: clicks, `tick(now)`, `clear()`.

use crate::api::command::{CommandOutcome, CommandQueue, CommandSender, SimulationCommand};
use crate::core::{EntityId, GeoPoint};
use crate::simulation::entity::{
    CreateEntityRequest, EntitySnapshot, MotionEntity, MotionParameters,
};
use crate::simulation::placement::{
    PlacementOutcome, PlacementState, PlacementStateMachine, StatusMessage,
};
use crate::simulation::scheduler::{AnimationScheduler, TickReport};
use crate::simulation::sink::MapSink;
use crate::utils::config::{ConfigurationManager, MapViewConfig, SimulationConfig};
use crate::validation::coordinates::CoordinateValidator;
use crate::validation::error::{SimError, SimResult};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Placement mode is off
    Ignored,
    /// Start point recorded, waiting for the end point
    StartCaptured(GeoPoint),
    /// Second click: the entity now exists
    Spawned(EntityId),
}

pub struct Simulation<S: MapSink> {
    config: SimulationConfig,
    params: MotionParameters,
    scheduler: AnimationScheduler,
    placement: PlacementStateMachine,
    sink: S,
    /// `None` once every id has been handed out
    next_id: Option<u32>,
    status: StatusMessage,
    commands: CommandQueue,
}

impl<S: MapSink> Simulation<S> {
    /// Validate `config` and build a stopped simulation around `sink`.
    ///
    /// The sink receives the initial map view.
    pub fn new(config: SimulationConfig, sink: S) -> SimResult<Self> {
        let validation = ConfigurationManager::validate_config(&config);
        for warning in &validation.warnings {
            warn!(%warning, "configuration warning");
        }
        validation.into_result()?;

        let mut simulation = Self {
            params: MotionParameters::from(&config.motion),
            scheduler: AnimationScheduler::from_config(&config),
            placement: PlacementStateMachine::new(config.placement.default_label.clone()),
            config,
            sink,
            next_id: Some(1),
            status: StatusMessage::Idle,
            commands: CommandQueue::new(),
        };
        simulation.sink.view_changed(&simulation.config.view);

        info!(
            speed_mps = simulation.params.speed_mps,
            route_segments = simulation.params.route_segments,
            "simulation created"
        );
        Ok(simulation)
    }

    pub fn enter_placement_mode(&mut self) {
        let event = self.placement.enter();
        self.sink.placement_mode_changed(event.is_active());
        info!("placement mode on");
        self.update_status(self.placement.prompt());
    }

    pub fn exit_placement_mode(&mut self) {
        let event = self.placement.exit();
        self.sink.placement_mode_changed(event.is_active());
        info!("placement mode off");
        self.update_status(self.placement.prompt());
    }

    /// Feed a map click to the placement state machine.
    ///
    /// The point goes through the coordinate policy first; a refused point
    /// leaves the placement state unchanged.
    pub fn point_clicked(&mut self, point: GeoPoint, hostile: bool) -> SimResult<ClickOutcome> {
        if !self.placement.is_active() {
            debug!(%point, "click ignored outside placement mode");
            return Ok(ClickOutcome::Ignored);
        }

        let point = CoordinateValidator::apply(self.config.placement.coordinate_policy, point)?;

        let outcome = match self.placement.on_point_clicked(point, hostile) {
            PlacementOutcome::Ignored => Ok(ClickOutcome::Ignored),
            PlacementOutcome::StartCaptured(start) => Ok(ClickOutcome::StartCaptured(start)),
            PlacementOutcome::Completed(request) => {
                self.create(request).map(ClickOutcome::Spawned)
            }
        };
        self.update_status(self.placement.prompt());
        outcome
    }

    /// Create an entity directly, bypassing placement mode
    pub fn spawn(
        &mut self,
        start: GeoPoint,
        end: GeoPoint,
        hostile: bool,
        label: impl Into<String>,
    ) -> SimResult<EntityId> {
        let policy = self.config.placement.coordinate_policy;
        let request = CreateEntityRequest {
            start: CoordinateValidator::apply(policy, start)?,
            end: CoordinateValidator::apply(policy, end)?,
            hostile,
            label: label.into(),
        };
        self.create(request)
    }

    fn create(&mut self, request: CreateEntityRequest) -> SimResult<EntityId> {
        let raw = self.next_id.ok_or(SimError::EntityIdsExhausted)?;
        self.next_id = raw.checked_add(1);
        let id = EntityId::new(raw);

        let entity = MotionEntity::new(id, request, &self.params);
        self.sink
            .place_marker(id, entity.start(), entity.is_hostile(), entity.label());
        self.sink.place_route(id, entity.route(), entity.is_hostile());

        info!(
            %id,
            label = entity.label(),
            hostile = entity.is_hostile(),
            start = %entity.start(),
            end = %entity.end(),
            distance_km = entity.distance_m() / 1000.0,
            duration_s = entity.duration_s(),
            "entity created"
        );

        self.scheduler.add(entity);
        Ok(id)
    }

    /// Advance every entity to `now`
    pub fn tick(&mut self, now: Instant) -> TickReport {
        self.scheduler.tick(now, &mut self.sink)
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Remove every entity and tell the sink to clear the map
    pub fn clear(&mut self) {
        self.scheduler.clear(&mut self.sink);
        self.update_status(StatusMessage::Cleared);
    }

    /// Validate and apply a new map view
    pub fn reconfigure_view(&mut self, view: MapViewConfig) -> SimResult<()> {
        view.validate()?;
        debug!(center = %view.center, zoom = view.zoom, "map view reconfigured");
        self.config.view = view;
        self.sink.view_changed(&self.config.view);
        Ok(())
    }

    pub fn status(&self) -> StatusMessage {
        self.status
    }

    fn update_status(&mut self, status: StatusMessage) {
        if self.status != status {
            self.status = status;
            self.sink.status_changed(status);
        }
    }

    pub fn is_placement_active(&self) -> bool {
        self.placement.is_active()
    }

    pub fn placement_state(&self) -> PlacementState {
        self.placement.state()
    }

    pub fn entities(&self) -> &[MotionEntity] {
        self.scheduler.entities()
    }

    pub fn entity(&self, id: EntityId) -> Option<&MotionEntity> {
        self.scheduler.get(id)
    }

    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.scheduler.entities().iter().map(EntitySnapshot::from).collect()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Handle for queueing commands from other threads
    pub fn command_sender(&self) -> CommandSender {
        self.commands.sender()
    }

    /// Apply one command.
    ///
    /// Unlike [`Simulation::point_clicked`], a queued click outside placement
    /// mode is an error: the sender cannot observe the mode it raced with.
    pub fn apply(&mut self, command: SimulationCommand) -> SimResult<CommandOutcome> {
        match command {
            SimulationCommand::EnterPlacementMode => self.enter_placement_mode(),
            SimulationCommand::ExitPlacementMode => self.exit_placement_mode(),
            SimulationCommand::PointClicked { point, hostile } => {
                if !self.placement.is_active() {
                    return Err(SimError::PlacementInactive);
                }
                return self.point_clicked(point, hostile).map(CommandOutcome::Click);
            }
            SimulationCommand::Spawn(request) => {
                let CreateEntityRequest { start, end, hostile, label } = request;
                return self.spawn(start, end, hostile, label).map(CommandOutcome::Spawned);
            }
            SimulationCommand::Start => self.start(),
            SimulationCommand::Stop => self.stop(),
            SimulationCommand::Clear => self.clear(),
            SimulationCommand::ReconfigureView(view) => self.reconfigure_view(view)?,
            SimulationCommand::Tick(now) => return Ok(CommandOutcome::Ticked(self.tick(now))),
        }
        Ok(CommandOutcome::Done)
    }

    /// Apply every queued command in arrival order. Never blocks.
    ///
    /// A failing command does not stop the rest of the queue.
    pub fn drain_commands(&mut self) -> Vec<SimResult<CommandOutcome>> {
        self.commands
            .pending()
            .into_iter()
            .map(|command| {
                let result = self.apply(command);
                if let Err(e) = &result {
                    warn!(error = %e, "queued command failed");
                }
                result
            })
            .collect()
    }
}
