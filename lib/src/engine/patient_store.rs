// lib/src/engine/patient_store.rs

//! Canonical owner of the active and completed lists.
//!
//! Invariants held after every public call:
//! * an id is in exactly one of the two lists, at most once;
//! * `completed_at` is `Some` exactly for patients in the completed list;
//! * active storage order only changes through `add_active` (append),
//!   `reorder_active`, `complete` (removal) and `reactivate` (append).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use models::{ListId, OrderingMode, Patient, PatientId, PatientPatch, WorklistError, WorklistResult};

use crate::engine::ordering::compute_display_order;

/// Where a patient lives and how many list transitions it has been through.
/// Two observations with equal residency saw the patient in the same stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residency {
    pub list: ListId,
    pub epoch: u64,
}

#[derive(Debug, Default)]
pub struct PatientStore {
    active: Vec<Patient>,
    completed: Vec<Patient>, // most recent first
    mode: OrderingMode,
    epochs: HashMap<PatientId, u64>,
}

impl PatientStore {
    pub fn new(mode: OrderingMode) -> Self {
        PatientStore {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> OrderingMode {
        self.mode
    }

    /// Changes the projection only; storage order is left untouched.
    pub fn set_mode(&mut self, mode: OrderingMode) {
        if self.mode != mode {
            debug!("Ordering mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    pub fn toggle_mode(&mut self) -> OrderingMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Active patients in storage order.
    pub fn active(&self) -> &[Patient] {
        &self.active
    }

    /// Completed patients, most recently completed first.
    pub fn completed(&self) -> &[Patient] {
        &self.completed
    }

    pub fn display_order(&self) -> Vec<&Patient> {
        compute_display_order(&self.active, self.mode)
    }

    pub fn list(&self, list: ListId) -> &[Patient] {
        match list {
            ListId::Active => &self.active,
            ListId::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn locate(&self, id: &PatientId) -> Option<ListId> {
        if self.active_position(id).is_some() {
            Some(ListId::Active)
        } else if self.completed_position(id).is_some() {
            Some(ListId::Completed)
        } else {
            None
        }
    }

    pub fn residency(&self, id: &PatientId) -> Option<Residency> {
        let list = self.locate(id)?;
        let epoch = self.epochs.get(id).copied().unwrap_or_default();
        Some(Residency { list, epoch })
    }

    pub fn get(&self, id: &PatientId) -> Option<&Patient> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|p| &p.id == id)
    }

    /// Appends a patient to the end of active storage.
    pub fn add_active(&mut self, mut patient: Patient) -> WorklistResult<()> {
        if self.locate(&patient.id).is_some() {
            return Err(WorklistError::DuplicateId(patient.id));
        }
        if patient.completed_at.take().is_some() {
            warn!("Discarding completion stamp on incoming patient {}", patient.id);
        }
        debug!("Adding patient {} at active position {}", patient.id, self.active.len());
        self.epochs.insert(patient.id, 0);
        self.active.push(patient);
        Ok(())
    }

    /// Applies `patch` to an active patient. Completed records are frozen, so
    /// an id that is only in the completed list is `NotFound` here.
    pub fn update_active(&mut self, id: &PatientId, patch: &PatientPatch) -> WorklistResult<&Patient> {
        let index = self
            .active_position(id)
            .ok_or_else(|| WorklistError::NotFound(format!("patient {} is not active", id)))?;
        let patient = &mut self.active[index];
        patch.apply_to(patient);
        debug!("Updated active patient {}", id);
        Ok(&self.active[index])
    }

    /// Moves the patient at `source_index` so that it ends up at
    /// `dest_index` of the list as it looks after the removal. Only allowed
    /// in manual mode.
    pub fn reorder_active(&mut self, source_index: usize, dest_index: usize) -> WorklistResult<()> {
        if self.mode != OrderingMode::Manual {
            return Err(WorklistError::InvalidTransition(format!(
                "cannot reorder while ordering mode is {}",
                self.mode
            )));
        }
        let len = self.active.len();
        if source_index >= len {
            return Err(WorklistError::NotFound(format!(
                "reorder source index {} out of range for {} active patients",
                source_index, len
            )));
        }
        if dest_index >= len {
            return Err(WorklistError::NotFound(format!(
                "reorder target index {} out of range for {} active patients",
                dest_index, len
            )));
        }
        if source_index == dest_index {
            return Ok(());
        }
        let moved = self.active.remove(source_index);
        debug!("Reordering patient {} from {} to {}", moved.id, source_index, dest_index);
        self.active.insert(dest_index, moved);
        Ok(())
    }

    pub fn complete(&mut self, id: &PatientId) -> WorklistResult<&Patient> {
        self.complete_at(id, Utc::now())
    }

    /// Moves an active patient to the front of the completed list, stamped
    /// with `when`.
    pub fn complete_at(&mut self, id: &PatientId, when: DateTime<Utc>) -> WorklistResult<&Patient> {
        let index = self
            .active_position(id)
            .ok_or_else(|| WorklistError::NotFound(format!("patient {} is not active", id)))?;
        let mut patient = self.active.remove(index);
        patient.completed_at = Some(when);
        self.bump_epoch(id);
        debug!("Completed patient {}", id);
        self.completed.insert(0, patient);
        Ok(&self.completed[0])
    }

    /// Moves a completed patient back to the END of active storage,
    /// whatever the mode, so the rest of a manual arrangement is kept.
    pub fn reactivate(&mut self, id: &PatientId) -> WorklistResult<&Patient> {
        let index = self
            .completed_position(id)
            .ok_or_else(|| WorklistError::NotFound(format!("patient {} is not completed", id)))?;
        let mut patient = self.completed.remove(index);
        patient.completed_at = None;
        self.bump_epoch(id);
        debug!("Reactivated patient {} at active position {}", id, self.active.len());
        self.active.push(patient);
        let last = self.active.len() - 1;
        Ok(&self.active[last])
    }

    fn active_position(&self, id: &PatientId) -> Option<usize> {
        self.active.iter().position(|p| &p.id == id)
    }

    fn completed_position(&self, id: &PatientId) -> Option<usize> {
        self.completed.iter().position(|p| &p.id == id)
    }

    fn bump_epoch(&mut self, id: &PatientId) {
        *self.epochs.entry(*id).or_default() += 1;
    }
}
