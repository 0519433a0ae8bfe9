// lib/src/runtime.rs

//! Single-task event loop around the board. User commands, collaborator
//! responses and drag timeouts all arrive on one channel and are applied in
//! arrival order, so the board is never touched concurrently. Collaborator
//! calls and timers run on spawned tasks that report back through the same
//! channel.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use models::{ListId, NewPatient, OrderingMode, Patient, PatientId, PatientPatch, WorklistResult};

use crate::board::{Board, Ticket};
use crate::collaborator::PatientService;
use crate::config::BoardConfig;
use crate::intake::ChatIntake;

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    ToggleMode,
    SetMode(OrderingMode),
    StartDrag { list: ListId, index: usize },
    Hover { list: ListId, index: usize },
    Drop { list: ListId, index: usize },
    ReleaseDrag,
    CancelDrag,
    Complete(PatientId),
    Reactivate(PatientId),
    Update { id: PatientId, patch: PatientPatch },
    Create(NewPatient),
    Chat(String),
    Dismiss(u64),
    DismissAll,
}

/// A collaborator call that has come back.
#[derive(Debug)]
pub enum Completion {
    Loaded { ticket: Ticket, result: WorklistResult<Vec<Patient>> },
    Created { ticket: Ticket, result: WorklistResult<Patient> },
    Updated { ticket: Ticket, result: WorklistResult<Patient> },
    Generated { result: WorklistResult<Patient> },
}

#[derive(Debug)]
pub enum BoardEvent {
    Command(UserCommand),
    Completion(Completion),
    DragTimeout { generation: u64 },
    Shutdown,
}

pub struct BoardRuntime {
    board: Board,
    intake: ChatIntake,
    service: Arc<dyn PatientService>,
    drag_cancel_timeout: Duration,
    tx: UnboundedSender<BoardEvent>,
    rx: UnboundedReceiver<BoardEvent>,
}

impl BoardRuntime {
    pub fn new(service: Arc<dyn PatientService>, config: &BoardConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        BoardRuntime {
            board: Board::new(config.initial_mode),
            intake: ChatIntake::new(Arc::clone(&service)),
            service,
            drag_cancel_timeout: config.drag_cancel_timeout(),
            tx,
            rx,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_processing_chat(&self) -> bool {
        self.intake.is_processing()
    }

    /// Handle for feeding events in from other tasks.
    pub fn sender(&self) -> UnboundedSender<BoardEvent> {
        self.tx.clone()
    }

    /// Fetches the collaborator's patient list. The board shows a loading
    /// state until the response is handled.
    pub fn start_initial_load(&mut self) {
        let ticket = self.board.begin_load();
        let service = Arc::clone(&self.service);
        self.spawn_completion(async move {
            let result = service.list_patients().await;
            Completion::Loaded { ticket, result }
        });
    }

    /// The runtime holds a sender itself, so this only returns `None` if
    /// the receiver was closed.
    pub async fn next_event(&mut self) -> Option<BoardEvent> {
        self.rx.recv().await
    }

    /// Runs until `Shutdown`, calling `on_change` after every handled event.
    pub async fn run<F>(&mut self, mut on_change: F)
    where
        F: FnMut(&Board),
    {
        while let Some(event) = self.next_event().await {
            if !self.handle(event) {
                break;
            }
            on_change(&self.board);
        }
        info!("Board runtime stopped");
    }

    /// Applies one event. Returns `false` once the loop should stop.
    pub fn handle(&mut self, event: BoardEvent) -> bool {
        match event {
            BoardEvent::Command(command) => self.handle_command(command),
            BoardEvent::Completion(completion) => self.handle_completion(completion),
            BoardEvent::DragTimeout { generation } => {
                self.board.expire_drag(generation);
            }
            BoardEvent::Shutdown => return false,
        }
        true
    }

    fn handle_command(&mut self, command: UserCommand) {
        debug!("Handling {:?}", command);
        // Failures are already recorded as notices by the board.
        match command {
            UserCommand::ToggleMode => {
                self.board.toggle_mode();
            }
            UserCommand::SetMode(mode) => self.board.set_mode(mode),
            UserCommand::StartDrag { list, index } => {
                let _ = self.board.start_drag(list, index);
            }
            UserCommand::Hover { list, index } => {
                self.board.hover(list, index);
            }
            UserCommand::Drop { list, index } => {
                let _ = self.board.drop_on(list, index);
            }
            UserCommand::ReleaseDrag => {
                if let Some(generation) = self.board.release_drag() {
                    self.arm_drag_timeout(generation);
                }
            }
            UserCommand::CancelDrag => {
                self.board.cancel_drag();
            }
            UserCommand::Complete(id) => {
                let _ = self.board.complete(&id);
            }
            UserCommand::Reactivate(id) => {
                let _ = self.board.reactivate(&id);
            }
            UserCommand::Update { id, patch } => {
                if let Ok(ticket) = self.board.begin_update(&id, &patch) {
                    let service = Arc::clone(&self.service);
                    self.spawn_completion(async move {
                        let result = service.update_patient(id, patch).await;
                        Completion::Updated { ticket, result }
                    });
                }
            }
            UserCommand::Create(patient) => {
                if let Ok(ticket) = self.board.begin_create(&patient) {
                    let service = Arc::clone(&self.service);
                    self.spawn_completion(async move {
                        let result = service.create_patient(patient).await;
                        Completion::Created { ticket, result }
                    });
                }
            }
            UserCommand::Chat(text) => match self.intake.begin(&text) {
                Ok(description) => {
                    let request = self.intake.request(description);
                    self.spawn_completion(async move {
                        Completion::Generated {
                            result: request.await,
                        }
                    });
                }
                Err(err) => {
                    self.board.report(&err);
                }
            },
            UserCommand::Dismiss(id) => {
                self.board.dismiss(id);
            }
            UserCommand::DismissAll => {
                self.board.dismiss_all();
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded { ticket, result } => {
                let _ = self.board.finish_load(ticket, result);
            }
            Completion::Created { ticket, result } => {
                let _ = self.board.finish_create(ticket, result);
            }
            Completion::Updated { ticket, result } => {
                let _ = self.board.finish_update(ticket, result);
            }
            Completion::Generated { result } => {
                if let Err(err) = self.intake.finish(self.board.store_mut(), result) {
                    self.board.report(&err);
                }
            }
        }
    }

    fn arm_drag_timeout(&self, generation: u64) {
        let tx = self.tx.clone();
        let delay = self.drag_cancel_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(BoardEvent::DragTimeout { generation });
        });
    }

    fn spawn_completion<F>(&self, call: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = call.await;
            if tx.send(BoardEvent::Completion(completion)).is_err() {
                error!("Board runtime is gone; dropping collaborator response");
            }
        });
    }
}
