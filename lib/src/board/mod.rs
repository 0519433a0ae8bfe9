// lib/src/board/mod.rs

//! The worklist as the user sees it: the store, the drag controller, the
//! notices raised by failed operations and the collaborator requests that
//! are still out. Everything here is synchronous; the runtime drives it from
//! a single task and feeds collaborator responses back in.

pub mod notices;
pub mod pending;

use log::{debug, info, warn};

use models::{
    ListId, NewPatient, OrderingMode, Patient, PatientId, PatientPatch, WorklistError, WorklistResult,
};

use crate::engine::{storage_index_of_display, DragCommand, DragController, DragStatus, PatientStore, Residency};

pub use notices::{Notice, Notices, Severity};
pub use pending::{PendingRequest, PendingRequests, Ticket};

/// What became of a collaborator response once it reached the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    /// The board moved on since the request left; the response was dropped.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub added: usize,
    pub duplicates: usize,
}

#[derive(Debug, Default)]
pub struct Board {
    store: PatientStore,
    drag: DragController,
    pending: PendingRequests,
    notices: Notices,
}

impl Board {
    pub fn new(mode: OrderingMode) -> Self {
        Board {
            store: PatientStore::new(mode),
            ..Default::default()
        }
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PatientStore {
        &mut self.store
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn mode(&self) -> OrderingMode {
        self.store.mode()
    }

    pub fn set_mode(&mut self, mode: OrderingMode) {
        self.store.set_mode(mode);
    }

    pub fn toggle_mode(&mut self) -> OrderingMode {
        self.store.toggle_mode()
    }

    pub fn display_order(&self) -> Vec<&Patient> {
        self.store.display_order()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.has_load()
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Records `err` as a notice and returns its id.
    pub fn report(&mut self, err: &WorklistError) -> u64 {
        self.notices.report(err)
    }

    pub fn dismiss(&mut self, notice_id: u64) -> bool {
        self.notices.dismiss(notice_id)
    }

    pub fn dismiss_all(&mut self) -> usize {
        self.notices.dismiss_all()
    }

    fn surface<T>(&mut self, result: WorklistResult<T>) -> WorklistResult<T> {
        if let Err(err) = &result {
            self.notices.report(err);
        }
        result
    }

    // ---- status transitions ------------------------------------------------

    pub fn complete(&mut self, id: &PatientId) -> WorklistResult<()> {
        let result = self.store.complete(id).map(|_| ());
        self.surface(result)
    }

    pub fn reactivate(&mut self, id: &PatientId) -> WorklistResult<()> {
        let result = self.store.reactivate(id).map(|_| ());
        self.surface(result)
    }

    pub fn reorder(&mut self, source_index: usize, dest_index: usize) -> WorklistResult<()> {
        let result = self.store.reorder_active(source_index, dest_index);
        self.surface(result)
    }

    // ---- drag --------------------------------------------------------------

    /// Starts a drag on the patient shown at `index` of `list`. Active
    /// positions are display positions. Any session still alive is cancelled
    /// first; an empty position leaves the controller idle.
    pub fn start_drag(&mut self, list: ListId, index: usize) -> WorklistResult<u64> {
        self.drag.cancel();
        let source_index = match list {
            ListId::Active => storage_index_of_display(self.store.active(), self.store.mode(), index),
            ListId::Completed => (index < self.store.completed().len()).then_some(index),
        };
        let picked = source_index.map(|source_index| {
            let patient_id = match list {
                ListId::Active => self.store.active()[source_index].id,
                ListId::Completed => self.store.completed()[source_index].id,
            };
            (source_index, patient_id)
        });
        let result = match picked {
            Some((source_index, patient_id)) => Ok(self.drag.start(list, source_index, patient_id)),
            None => Err(WorklistError::NotFound(format!(
                "no patient at {} position {}",
                list, index
            ))),
        };
        self.surface(result)
    }

    /// Hover over `index` of `list`. Returns whether the target was taken as
    /// a drop candidate.
    pub fn hover(&mut self, list: ListId, index: usize) -> bool {
        let within_active = list == ListId::Active
            && self.drag.session().map(|s| s.source_list) == Some(ListId::Active);
        if within_active && index >= self.store.active().len() {
            debug!("Hover position {} is past the end of the active list", index);
            return false;
        }
        self.drag.hover(list, index, self.store.mode())
    }

    /// Drops the dragged patient onto `index` of `list` and applies the
    /// resulting command. `Ok(None)` means the drop had no effect: no live
    /// session, a repeated drop, or a completed-to-completed move.
    pub fn drop_on(&mut self, list: ListId, index: usize) -> WorklistResult<Option<DragCommand>> {
        let Some(command) = self.drag.drop_on(list, index) else {
            self.drag.settle();
            return Ok(None);
        };
        let result = self.dispatch(&command).map(|_| Some(command));
        self.drag.settle();
        self.surface(result)
    }

    fn dispatch(&mut self, command: &DragCommand) -> WorklistResult<()> {
        match command {
            DragCommand::Reorder { patient_id, dest_index } => {
                // Storage may have shifted since the drag began; move the
                // patient from wherever it is now.
                let source_index = self
                    .store
                    .active()
                    .iter()
                    .position(|p| &p.id == patient_id)
                    .ok_or_else(|| {
                        WorklistError::NotFound(format!("dragged patient {} is no longer active", patient_id))
                    })?;
                self.store.reorder_active(source_index, *dest_index)
            }
            DragCommand::Complete { patient_id } => self.store.complete(patient_id).map(|_| ()),
            DragCommand::Reactivate { patient_id } => self.store.reactivate(patient_id).map(|_| ()),
        }
    }

    /// Drag-end. Returns the generation to arm the cancel timeout with.
    pub fn release_drag(&mut self) -> Option<u64> {
        self.drag.release()
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn expire_drag(&mut self, generation: u64) -> bool {
        self.drag.expire(generation)
    }

    pub fn drag_status(&self) -> DragStatus {
        self.drag.status()
    }

    // ---- collaborator round trips ------------------------------------------

    /// Registers an initial load. Nothing changes locally until it finishes.
    pub fn begin_load(&mut self) -> Ticket {
        self.pending.insert(PendingRequest::Load)
    }

    /// Appends every loaded patient that is not on the board yet. Duplicates
    /// are skipped and raise a single notice.
    pub fn finish_load(&mut self, ticket: Ticket, result: WorklistResult<Vec<Patient>>) -> WorklistResult<LoadSummary> {
        if !matches!(self.pending.take(ticket), Some(PendingRequest::Load)) {
            warn!("Load response {} does not match a pending load", ticket);
            return Ok(LoadSummary { added: 0, duplicates: 0 });
        }
        let patients = self.surface(result)?;
        let mut summary = LoadSummary { added: 0, duplicates: 0 };
        for patient in patients {
            match self.store.add_active(patient) {
                Ok(()) => summary.added += 1,
                Err(WorklistError::DuplicateId(id)) => {
                    debug!("Skipping already listed patient {}", id);
                    summary.duplicates += 1;
                }
                Err(err) => return self.surface(Err(err)),
            }
        }
        if summary.duplicates > 0 {
            self.notices.push(
                Severity::Warning,
                format!("{} loaded patient(s) were already listed and were skipped", summary.duplicates),
            );
        }
        info!("Loaded {} patient(s)", summary.added);
        Ok(summary)
    }

    /// Validates a manual intake and registers the request.
    pub fn begin_create(&mut self, patient: &NewPatient) -> WorklistResult<Ticket> {
        if patient.name.trim().is_empty() {
            return self.surface(Err(WorklistError::InvalidInput("patient name must not be empty".to_string())));
        }
        Ok(self.pending.insert(PendingRequest::Create))
    }

    /// Appends the patient the collaborator created.
    pub fn finish_create(&mut self, ticket: Ticket, result: WorklistResult<Patient>) -> WorklistResult<PatientId> {
        if !matches!(self.pending.take(ticket), Some(PendingRequest::Create)) {
            warn!("Create response {} does not match a pending create", ticket);
            return Err(WorklistError::InvalidTransition(format!("no pending create for {}", ticket)));
        }
        let patient = self.surface(result)?;
        let id = patient.id;
        let added = self.store.add_active(patient);
        self.surface(added)?;
        info!("Created patient {}", id);
        Ok(id)
    }

    /// Registers an edit of an active patient. The store is not touched
    /// until the collaborator confirms.
    pub fn begin_update(&mut self, id: &PatientId, patch: &PatientPatch) -> WorklistResult<Ticket> {
        let result = self.check_update(id, patch);
        let expected = self.surface(result)?;
        Ok(self.pending.insert(PendingRequest::Update {
            patient_id: *id,
            expected,
        }))
    }

    fn check_update(&self, id: &PatientId, patch: &PatientPatch) -> WorklistResult<Residency> {
        if patch.is_empty() {
            return Err(WorklistError::InvalidInput(format!("nothing to update for patient {}", id)));
        }
        match self.store.residency(id) {
            Some(residency) if residency.list == ListId::Active => Ok(residency),
            _ => Err(WorklistError::NotFound(format!("patient {} is not active", id))),
        }
    }

    /// Applies the collaborator's version of the patient if the patient is
    /// still where it was when the request left. A patient that was completed
    /// (or completed and reactivated) in the meantime keeps its local state.
    pub fn finish_update(&mut self, ticket: Ticket, result: WorklistResult<Patient>) -> WorklistResult<ResponseOutcome> {
        let Some(PendingRequest::Update { patient_id, expected }) = self.pending.take(ticket) else {
            warn!("Update response {} does not match a pending update", ticket);
            return Ok(ResponseOutcome::Discarded);
        };
        let patient = self.surface(result)?;
        if patient.id != patient_id {
            return self.surface(Err(WorklistError::collaborator(format!(
                "update of patient {} answered with patient {}",
                patient_id, patient.id
            ))));
        }
        if self.store.residency(&patient_id) != Some(expected) {
            info!("Discarding stale update response for patient {}", patient_id);
            return Ok(ResponseOutcome::Discarded);
        }
        let patch = PatientPatch::from(&patient);
        let applied = self.store.update_active(&patient_id, &patch).map(|_| ResponseOutcome::Applied);
        self.surface(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: &str) -> PatientId {
        PatientId::new(id.to_string()).unwrap()
    }

    fn patient(id: &str, score: f64) -> Patient {
        Patient::new(pid(id), id, score)
    }

    fn board(mode: OrderingMode) -> Board {
        let mut board = Board::new(mode);
        for (id, score) in [("A", 9.0), ("B", 5.0), ("C", 9.0)] {
            board.store_mut().add_active(patient(id, score)).unwrap();
        }
        board
    }

    fn active_ids(board: &Board) -> Vec<String> {
        board.store().active().iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn start_drag_uses_display_positions() {
        let mut board = board(OrderingMode::Automatic);
        board.start_drag(ListId::Active, 1).unwrap();
        let session = board.drag().session().unwrap();
        assert_eq!(session.patient_id, pid("C"));
        assert_eq!(session.source_index, 2);
    }

    #[test]
    fn start_drag_out_of_range_raises_notice() {
        let mut board = board(OrderingMode::Manual);
        let err = board.start_drag(ListId::Completed, 0).unwrap_err();
        assert!(matches!(err, WorklistError::NotFound(_)));
        assert_eq!(board.drag_status(), DragStatus::Idle);
        assert_eq!(board.notices().len(), 1);
    }

    #[test]
    fn start_drag_past_active_end_leaves_controller_idle() {
        let mut board = board(OrderingMode::Automatic);
        let err = board.start_drag(ListId::Active, 3).unwrap_err();
        assert!(matches!(err, WorklistError::NotFound(_)));
        assert!(board.drag().session().is_none());
        assert_eq!(board.drag_status(), DragStatus::Idle);
    }

    #[test]
    fn cancel_leaves_store_untouched() {
        let mut board = board(OrderingMode::Manual);
        board.start_drag(ListId::Active, 0).unwrap();
        assert!(board.hover(ListId::Active, 2));
        assert!(board.cancel_drag());

        assert_eq!(board.drag_status(), DragStatus::Idle);
        assert!(board.drag().session().is_none());
        assert_eq!(active_ids(&board), vec!["A", "B", "C"]);
        assert_eq!(board.drop_on(ListId::Active, 2).unwrap(), None);
        assert_eq!(active_ids(&board), vec!["A", "B", "C"]);
        assert!(board.store().completed().is_empty());
    }

    #[test]
    fn hover_past_end_is_ignored() {
        let mut board = board(OrderingMode::Manual);
        board.start_drag(ListId::Active, 0).unwrap();
        assert!(!board.hover(ListId::Active, 3));
        assert!(board.hover(ListId::Active, 2));
    }

    #[test]
    fn drop_reorders_by_current_position() {
        let mut board = board(OrderingMode::Manual);
        board.start_drag(ListId::Active, 2).unwrap();
        // Someone else completes A before the drop lands.
        board.complete(&pid("A")).unwrap();
        board.drop_on(ListId::Active, 0).unwrap();
        assert_eq!(active_ids(&board), vec!["C", "B"]);
        assert_eq!(board.drag_status(), DragStatus::Idle);
    }

    #[test]
    fn drop_of_vanished_patient_is_a_noop() {
        let mut board = board(OrderingMode::Manual);
        board.start_drag(ListId::Active, 0).unwrap();
        board.complete(&pid("A")).unwrap();
        let err = board.drop_on(ListId::Active, 1).unwrap_err();
        assert!(matches!(err, WorklistError::NotFound(_)));
        assert_eq!(active_ids(&board), vec!["B", "C"]);
        assert!(board.drag().is_idle());
    }

    #[test]
    fn reorder_drop_in_automatic_mode_is_rejected() {
        let mut board = board(OrderingMode::Automatic);
        board.start_drag(ListId::Active, 0).unwrap();
        assert!(!board.hover(ListId::Active, 1));
        let err = board.drop_on(ListId::Active, 1).unwrap_err();
        assert!(matches!(err, WorklistError::InvalidTransition(_)));
        assert_eq!(active_ids(&board), vec!["A", "B", "C"]);
    }

    #[test]
    fn load_skips_duplicates() {
        let mut board = board(OrderingMode::Manual);
        let ticket = board.begin_load();
        assert!(board.is_loading());
        let summary = board
            .finish_load(ticket, Ok(vec![patient("B", 1.0), patient("D", 2.0)]))
            .unwrap();
        assert_eq!(summary, LoadSummary { added: 1, duplicates: 1 });
        assert!(!board.is_loading());
        assert_eq!(active_ids(&board), vec!["A", "B", "C", "D"]);
        assert_eq!(board.notices().latest().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn failed_load_leaves_board_empty_with_error() {
        let mut board = Board::new(OrderingMode::Automatic);
        let ticket = board.begin_load();
        let err = board
            .finish_load(ticket, Err(WorklistError::collaborator("connection refused")))
            .unwrap_err();
        assert!(matches!(err, WorklistError::CollaboratorFailure(_)));
        assert!(board.store().is_empty());
        assert!(!board.is_loading());
        assert_eq!(board.notices().latest().unwrap().severity, Severity::Error);
    }

    #[test]
    fn update_applies_only_on_response() {
        let mut board = board(OrderingMode::Manual);
        let patch = PatientPatch {
            name: Some("Alice".into()),
            ..Default::default()
        };
        let ticket = board.begin_update(&pid("A"), &patch).unwrap();
        assert_eq!(board.store().get(&pid("A")).unwrap().name, "A");

        let mut confirmed = patient("A", 9.0);
        confirmed.name = "Alice".into();
        assert_eq!(board.finish_update(ticket, Ok(confirmed)), Ok(ResponseOutcome::Applied));
        assert_eq!(board.store().get(&pid("A")).unwrap().name, "Alice");
        assert_eq!(active_ids(&board), vec!["A", "B", "C"]);
    }

    #[test]
    fn update_response_after_complete_is_discarded() {
        let mut board = board(OrderingMode::Manual);
        let patch = PatientPatch {
            priority_score: Some(1.0),
            ..Default::default()
        };
        let ticket = board.begin_update(&pid("B"), &patch).unwrap();
        board.complete(&pid("B")).unwrap();
        board.reactivate(&pid("B")).unwrap();

        let mut confirmed = patient("B", 1.0);
        confirmed.name = "server copy".into();
        assert_eq!(board.finish_update(ticket, Ok(confirmed)), Ok(ResponseOutcome::Discarded));
        let local = board.store().get(&pid("B")).unwrap();
        assert_eq!(local.name, "B");
        assert_eq!(local.priority_score, 5.0);
    }

    #[test]
    fn update_of_completed_patient_is_refused() {
        let mut board = board(OrderingMode::Manual);
        board.complete(&pid("C")).unwrap();
        let patch = PatientPatch {
            age: Some(40),
            ..Default::default()
        };
        assert!(matches!(board.begin_update(&pid("C"), &patch), Err(WorklistError::NotFound(_))));
        assert!(matches!(
            board.begin_update(&pid("A"), &PatientPatch::default()),
            Err(WorklistError::InvalidInput(_))
        ));
        assert_eq!(board.pending_requests(), 0);
    }

    #[test]
    fn failed_update_keeps_local_record() {
        let mut board = board(OrderingMode::Manual);
        let patch = PatientPatch {
            gender: Some("F".into()),
            ..Default::default()
        };
        let ticket = board.begin_update(&pid("A"), &patch).unwrap();
        assert!(board.finish_update(ticket, Err(WorklistError::collaborator("500"))).is_err());
        assert_eq!(board.store().get(&pid("A")).unwrap().gender, "");
    }

    #[test]
    fn create_appends_confirmed_patient() {
        let mut board = board(OrderingMode::Manual);
        let request = NewPatient {
            name: "Dana".into(),
            ..Default::default()
        };
        let ticket = board.begin_create(&request).unwrap();
        let id = board.finish_create(ticket, Ok(patient("D", 3.0))).unwrap();
        assert_eq!(id, pid("D"));
        assert_eq!(active_ids(&board), vec!["A", "B", "C", "D"]);

        let blank = NewPatient::default();
        assert!(matches!(board.begin_create(&blank), Err(WorklistError::InvalidInput(_))));
    }
}
