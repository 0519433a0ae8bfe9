// lib/src/engine/drag_session.rs

//! State machine for one in-flight pointer drag.
//!
//! `Idle -> Dragging -> Hovering (re-hover) -> Resolved -> Idle`, plus
//! `* -> Idle` on cancel. At most one session exists; starting a new one
//! cancels whatever was still pending. The controller never touches the
//! store: a drop yields a `DragCommand` that the board dispatches.

use log::{debug, info};

use models::{ListId, OrderingMode, PatientId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStatus {
    Idle,
    Dragging,
    Hovering,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverTarget {
    pub list: ListId,
    pub index: usize,
}

/// Provenance is explicit: the list and position the gesture started from,
/// and the patient that was under the pointer at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub generation: u64,
    pub source_list: ListId,
    pub source_index: usize,
    pub patient_id: PatientId,
    pub hover: Option<HoverTarget>,
    pub status: DragStatus,
    /// A drag-end arrived and no drop has followed yet.
    pub released: bool,
}

/// What a drop asks the store to do.
#[derive(Debug, Clone, PartialEq)]
pub enum DragCommand {
    Reorder { patient_id: PatientId, dest_index: usize },
    Complete { patient_id: PatientId },
    Reactivate { patient_id: PatientId },
}

/// A hover is a legal candidate when it is a reorder inside the active list
/// in manual mode, or any move across lists (a status transition, which is
/// mode-independent).
pub fn is_legal_target(source: ListId, target: ListId, mode: OrderingMode) -> bool {
    match (source, target) {
        (ListId::Active, ListId::Active) => mode == OrderingMode::Manual,
        (ListId::Active, ListId::Completed) | (ListId::Completed, ListId::Active) => true,
        (ListId::Completed, ListId::Completed) => false,
    }
}

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
    next_generation: u64,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> DragStatus {
        self.session.as_ref().map_or(DragStatus::Idle, |s| s.status)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Opens a session and returns its generation. A session that is still
    /// alive is cancelled first.
    pub fn start(&mut self, source_list: ListId, source_index: usize, patient_id: PatientId) -> u64 {
        if let Some(stale) = self.session.take() {
            info!(
                "Cancelling drag session {} of patient {} before starting a new one",
                stale.generation, stale.patient_id
            );
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        debug!(
            "Drag {} started on {} #{} (patient {})",
            generation, source_list, source_index, patient_id
        );
        self.session = Some(DragSession {
            generation,
            source_list,
            source_index,
            patient_id,
            hover: None,
            status: DragStatus::Dragging,
            released: false,
        });
        generation
    }

    /// Records the hover target if it is legal. Returns whether it was taken.
    pub fn hover(&mut self, target_list: ListId, target_index: usize, mode: OrderingMode) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.status == DragStatus::Resolved
            || !is_legal_target(session.source_list, target_list, mode)
        {
            return false;
        }
        session.hover = Some(HoverTarget {
            list: target_list,
            index: target_index,
        });
        session.status = DragStatus::Hovering;
        true
    }

    /// Resolves the session. Returns the command to dispatch, or `None` when
    /// there is nothing to do: no live session, a session that already
    /// resolved, or a completed-to-completed drop. Call `settle` once the
    /// command has been dispatched.
    pub fn drop_on(&mut self, target_list: ListId, target_index: usize) -> Option<DragCommand> {
        let session = self.session.as_mut()?;
        if session.status == DragStatus::Resolved {
            debug!("Ignoring repeated drop for drag {}", session.generation);
            return None;
        }
        session.status = DragStatus::Resolved;
        session.released = false;
        let patient_id = session.patient_id;
        match (session.source_list, target_list) {
            (ListId::Active, ListId::Active) => Some(DragCommand::Reorder {
                patient_id,
                dest_index: target_index,
            }),
            (ListId::Active, ListId::Completed) => Some(DragCommand::Complete { patient_id }),
            (ListId::Completed, ListId::Active) => Some(DragCommand::Reactivate { patient_id }),
            (ListId::Completed, ListId::Completed) => None,
        }
    }

    /// Returns a resolved session to `Idle`.
    pub fn settle(&mut self) {
        if self.status() == DragStatus::Resolved {
            self.session = None;
        }
    }

    /// Drag-end. When no drop has resolved the session yet, marks it released
    /// and returns its generation so the caller can arm the cancel timeout.
    pub fn release(&mut self) -> Option<u64> {
        let session = self.session.as_mut()?;
        if session.status == DragStatus::Resolved {
            return None;
        }
        session.released = true;
        Some(session.generation)
    }

    /// Forces the session back to `Idle` without dispatching anything.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                debug!("Drag {} cancelled", session.generation);
                true
            }
            None => false,
        }
    }

    /// Cancels the session only if it is still the one `generation` refers
    /// to and it is still waiting for a drop after a drag-end.
    pub fn expire(&mut self, generation: u64) -> bool {
        let stale = matches!(
            self.session.as_ref(),
            Some(s) if s.generation == generation && s.released && s.status != DragStatus::Resolved
        );
        if stale {
            info!("Drag {} timed out after drag-end without drop", generation);
            self.session = None;
        }
        stale
    }
}
