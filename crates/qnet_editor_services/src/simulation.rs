// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulation backend client seam.
//!
//! A run is started from a complete topology document and streams
//! events back over a bounded channel. The channel keeps the editor
//! decoupled from backend pacing: a slow UI applies backpressure
//! instead of dropping events.

use crate::event::SimulationEvent;
use crate::ServiceError;
use async_trait::async_trait;
use qnet_editor_document::WorldDocument;
use tokio::sync::mpsc;

/// Channel capacity for a run's event stream
const EVENT_BUFFER: usize = 256;

/// Client for a simulation backend
#[async_trait]
pub trait SimulationClient: Send + Sync {
    /// Submit a topology and begin a run, returning its event stream
    async fn start_run(&self, world: &WorldDocument) -> Result<RunHandle, ServiceError>;
}

/// A live simulation run's event stream
pub struct RunHandle {
    rx: mpsc::Receiver<SimulationEvent>,
}

impl RunHandle {
    /// Pair a new handle with the sender the backend feeds
    pub fn channel() -> (mpsc::Sender<SimulationEvent>, Self) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        (tx, Self { rx })
    }

    /// Receive the next event; `None` once the run has finished
    pub async fn next_event(&mut self) -> Option<SimulationEvent> {
        self.rx.recv().await
    }

    /// Drain every remaining event in arrival order
    pub async fn collect_events(mut self) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }
}

/// In-process backend that replays a fixed script of events.
///
/// Rejects empty worlds the way the real backend does, so client code
/// exercises the error path without a network.
pub struct ScriptedSimulation {
    script: Vec<SimulationEvent>,
}

impl ScriptedSimulation {
    /// Backend that will replay `script` for every run
    pub fn new(script: Vec<SimulationEvent>) -> Self {
        Self { script }
    }
}

#[async_trait]
impl SimulationClient for ScriptedSimulation {
    async fn start_run(&self, world: &WorldDocument) -> Result<RunHandle, ServiceError> {
        if world.host_names().next().is_none() {
            return Err(ServiceError::Rejected("topology has no hosts".into()));
        }
        tracing::info!(world = %world.name, events = self.script.len(), "starting scripted run");

        let (tx, handle) = RunHandle::channel();
        let script = self.script.clone();
        tokio::spawn(async move {
            for event in script {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(handle)
    }
}
