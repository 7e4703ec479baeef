//! The incremental controller.
//!
//! A single task owns the [`ProjectModel`] and consumes [`ControllerEvent`]s.
//! Each change is applied to the model as soon as it arrives. Generations run
//! in a spawned task over an immutable snapshot, one at a time: changes that
//! arrive while one is in flight are folded into exactly one follow-up run.
//!
//! ```text
//!          startup / event
//!   Idle ------------------> Generating ----ok----> Idle
//!    ^                         |    ^
//!    |                       failed |  events while generating set
//!    |                         v    |  `pending`; one follow-up run
//!    +----- event / regenerate Error
//! ```

use std::future;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::cache::WriteOutcome;
use crate::generation::{GenerationError, GenerationReport, Generator};
use crate::project::ProjectModel;
use crate::{debug_event, log_event};

use super::event::{ChangeEvent, ControllerEvent};

const EVENT_BUFFER: usize = 1024;

type Generation = JoinHandle<Result<GenerationReport, GenerationError>>;

/// Channel pair feeding a [`Controller`].
pub fn event_channel() -> (mpsc::Sender<ControllerEvent>, mpsc::Receiver<ControllerEvent>) {
    mpsc::channel(EVENT_BUFFER)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    Generating,
    /// The last generation failed. The previous output stays authoritative;
    /// the next event retries.
    Error,
}

/// Observable controller progress.
#[derive(Debug, Clone, Default)]
pub struct ControllerStatus {
    pub state: ControllerState,
    /// Completed generations, successful or not.
    pub generations: u64,
    pub failures: u64,
    /// Model revision of the last successful generation.
    pub last_revision: Option<u64>,
    pub last_error: Option<String>,
}

pub struct Controller {
    model: ProjectModel,
    generator: Generator,
    events: mpsc::Receiver<ControllerEvent>,
    pending: bool,
    status: watch::Sender<ControllerStatus>,
}

impl Controller {
    pub fn new(model: ProjectModel, generator: Generator, events: mpsc::Receiver<ControllerEvent>) -> Self {
        let (status, _) = watch::channel(ControllerStatus::default());
        Self {
            model,
            generator,
            events,
            pending: false,
            status,
        }
    }

    pub fn model(&self) -> &ProjectModel {
        &self.model
    }

    pub fn state(&self) -> ControllerState {
        self.status.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerStatus> {
        self.status.subscribe()
    }

    /// Run one generation inline. Used for the startup generation, whose
    /// failure the caller may treat as fatal.
    pub async fn generate(&mut self) -> Result<GenerationReport, GenerationError> {
        self.set_state(ControllerState::Generating);
        let result = self.generator.run(self.model.snapshot()).await;
        self.finish(&result);
        result
    }

    /// Consume events until [`ControllerEvent::Shutdown`] or until every
    /// sender is gone. An in-flight generation is awaited before returning.
    pub async fn run(mut self) {
        let mut in_flight: Option<Generation> = None;

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else { break };
                    let regenerate = match event {
                        ControllerEvent::Shutdown => break,
                        ControllerEvent::Regenerate => true,
                        ControllerEvent::Change(change) => self.apply(&change),
                    };
                    if !regenerate {
                        continue;
                    }
                    if in_flight.is_some() {
                        if !self.pending {
                            debug_event!("controller", "follow-up scheduled");
                        }
                        self.pending = true;
                    } else {
                        in_flight = Some(self.spawn_generation());
                    }
                }

                joined = join(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    let result = joined.map_err(GenerationError::from).and_then(|r| r);
                    self.finish(&result);
                    if std::mem::take(&mut self.pending) {
                        in_flight = Some(self.spawn_generation());
                    }
                }
            }
        }

        if let Some(handle) = in_flight {
            let result = handle.await.map_err(GenerationError::from).and_then(|r| r);
            self.finish(&result);
        }
        log_event!("controller", "stopped");
    }

    /// Apply one change to the model. Returns whether a generation should
    /// follow.
    fn apply(&mut self, change: &ChangeEvent) -> bool {
        let before = self.model.revision();
        match change {
            ChangeEvent::Add(path) => {
                self.model.add_file(path);
            }
            ChangeEvent::Change(path) => {
                if self.model.refresh_file(path).is_none() {
                    self.model.add_file(path);
                }
            }
            ChangeEvent::Unlink(path) => {
                if !self.model.remove_file(path) {
                    self.model.remove_tree(path);
                }
            }
        }

        let changed = self.model.revision() != before;
        debug_event!(
            "controller",
            "applied",
            "{change} ({})",
            if changed { "changed" } else { "no change" }
        );
        // a failed generation is retried by any event
        changed || self.state() == ControllerState::Error
    }

    fn spawn_generation(&mut self) -> Generation {
        self.set_state(ControllerState::Generating);
        let snapshot = self.model.snapshot();
        let generator = self.generator.clone();
        tokio::spawn(async move { generator.run(snapshot).await })
    }

    fn set_state(&self, state: ControllerState) {
        self.status.send_modify(|status| status.state = state);
    }

    fn finish(&self, result: &Result<GenerationReport, GenerationError>) {
        match result {
            Ok(report) => {
                let outcome = match report.outcome {
                    WriteOutcome::Written { modules } => format!("wrote {modules} modules"),
                    WriteOutcome::Unchanged => "output unchanged".to_string(),
                };
                log_event!(
                    "controller",
                    "generated",
                    "revision {}, {outcome} in {:.2}s",
                    report.revision,
                    report.elapsed.as_secs_f64()
                );
            }
            Err(e) => tracing::error!("[controller] generation failed: {e}"),
        }

        self.status.send_modify(|status| {
            status.generations += 1;
            match result {
                Ok(report) => {
                    status.state = ControllerState::Idle;
                    status.last_revision = Some(report.revision);
                    status.last_error = None;
                }
                Err(e) => {
                    status.state = ControllerState::Error;
                    status.failures += 1;
                    status.last_error = Some(e.to_string());
                }
            }
        });
    }
}

async fn join(in_flight: &mut Option<Generation>) -> Result<Result<GenerationReport, GenerationError>, tokio::task::JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => future::pending().await,
    }
}
