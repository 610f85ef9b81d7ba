//! Cross-thread command queue
//!
//! A [`Simulation`](crate::api::simulation::Simulation) is single-owner. Hosts
//! whose input handlers run on other threads send [`SimulationCommand`]s
//! through a [`CommandSender`]; the owning thread applies them in arrival order
//! with `drain_commands`. The queue is bounded; senders are refused rather
//! than blocked once it is full.

use crate::api::simulation::ClickOutcome;
use crate::core::{EntityId, GeoPoint, COMMAND_QUEUE_CAPACITY};
use crate::simulation::entity::CreateEntityRequest;
use crate::simulation::scheduler::TickReport;
use crate::utils::config::MapViewConfig;
use crate::validation::error::{SimError, SimResult};
use std::sync::mpsc;
use std::time::Instant;

/// Operation queued for the simulation owner
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationCommand {
    EnterPlacementMode,
    ExitPlacementMode,
    PointClicked { point: GeoPoint, hostile: bool },
    Spawn(CreateEntityRequest),
    Start,
    Stop,
    Clear,
    ReconfigureView(MapViewConfig),
    Tick(Instant),
}

/// Result of applying one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Click(ClickOutcome),
    Spawned(EntityId),
    Ticked(TickReport),
}

/// Clonable handle for enqueueing commands from any thread
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::SyncSender<SimulationCommand>,
    capacity: usize,
}

impl CommandSender {
    /// Enqueue a command without blocking.
    ///
    /// Fails when the queue is full or the simulation has been dropped.
    pub fn send(&self, command: SimulationCommand) -> SimResult<()> {
        self.tx.try_send(command).map_err(|e| match e {
            mpsc::TrySendError::Full(_) => SimError::CommandQueueFull {
                capacity: self.capacity,
            },
            mpsc::TrySendError::Disconnected(_) => SimError::CommandQueueClosed,
        })
    }

    pub fn point_clicked(&self, point: GeoPoint, hostile: bool) -> SimResult<()> {
        self.send(SimulationCommand::PointClicked { point, hostile })
    }

    pub fn spawn(&self, request: CreateEntityRequest) -> SimResult<()> {
        self.send(SimulationCommand::Spawn(request))
    }

    pub fn clear(&self) -> SimResult<()> {
        self.send(SimulationCommand::Clear)
    }
}

/// Receiving half, owned by the simulation
#[derive(Debug)]
pub(crate) struct CommandQueue {
    tx: mpsc::SyncSender<SimulationCommand>,
    rx: mpsc::Receiver<SimulationCommand>,
    capacity: usize,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        Self::with_capacity(COMMAND_QUEUE_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::sync_channel(capacity);
        Self { tx, rx, capacity }
    }

    pub(crate) fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
            capacity: self.capacity,
        }
    }

    /// Everything queued so far, oldest first. Never blocks.
    pub(crate) fn pending(&self) -> Vec<SimulationCommand> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_queue_refuses_commands() {
        let queue = CommandQueue::with_capacity(2);
        let sender = queue.sender();

        assert!(sender.send(SimulationCommand::Start).is_ok());
        assert!(sender.clear().is_ok());
        assert_eq!(
            sender.send(SimulationCommand::Stop),
            Err(SimError::CommandQueueFull { capacity: 2 })
        );

        assert_eq!(
            queue.pending(),
            vec![SimulationCommand::Start, SimulationCommand::Clear]
        );
        assert!(sender.send(SimulationCommand::Stop).is_ok());
    }

    #[test]
    fn test_closed_queue() {
        let queue = CommandQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert_eq!(sender.clear(), Err(SimError::CommandQueueClosed));
    }
}
