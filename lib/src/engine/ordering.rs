// lib/src/engine/ordering.rs

//! Projection of the active list for display. Pure: nothing here mutates
//! storage, so switching modes back and forth always returns to the exact
//! manual arrangement the user left behind.

use models::{OrderingMode, Patient};

/// Returns the active list in the order it should be shown.
///
/// In `Automatic` mode patients are sorted by `priority_score`, highest
/// first. The sort is stable, so patients with equal scores keep their
/// relative storage order (insertion and manual-reorder history). In
/// `Manual` mode storage order is returned as is.
pub fn compute_display_order(active_storage_order: &[Patient], mode: OrderingMode) -> Vec<&Patient> {
    let mut ordered: Vec<&Patient> = active_storage_order.iter().collect();
    if mode == OrderingMode::Automatic {
        // slice::sort_by is stable; total_cmp keeps the comparator total.
        ordered.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    }
    ordered
}

/// Maps a position in the displayed projection back to its storage index.
pub fn storage_index_of_display(
    active_storage_order: &[Patient],
    mode: OrderingMode,
    display_index: usize,
) -> Option<usize> {
    let shown = compute_display_order(active_storage_order, mode);
    let target = shown.get(display_index)?;
    active_storage_order.iter().position(|p| p.id == target.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::PatientId;

    fn patient(id: &str, score: f64) -> Patient {
        Patient::new(PatientId::new(id.to_string()).unwrap(), id, score)
    }

    fn ids(order: &[&Patient]) -> Vec<String> {
        order.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn automatic_mode_breaks_ties_by_storage_order() {
        let storage = vec![patient("A", 9.0), patient("B", 5.0), patient("C", 9.0)];
        let shown = compute_display_order(&storage, OrderingMode::Automatic);
        assert_eq!(ids(&shown), vec!["A", "C", "B"]);
    }

    #[test]
    fn tie_break_ignores_id_and_name() {
        let storage = vec![patient("z", 3.0), patient("a", 3.0), patient("m", 3.0)];
        let shown = compute_display_order(&storage, OrderingMode::Automatic);
        assert_eq!(ids(&shown), vec!["z", "a", "m"]);
    }

    #[test]
    fn manual_mode_returns_storage_order() {
        let storage = vec![patient("A", 1.0), patient("B", 5.0), patient("C", 3.0)];
        let shown = compute_display_order(&storage, OrderingMode::Manual);
        assert_eq!(ids(&shown), vec!["A", "B", "C"]);
    }

    #[test]
    fn projection_does_not_touch_storage() {
        let storage = vec![patient("A", 1.0), patient("B", 5.0)];
        let _ = compute_display_order(&storage, OrderingMode::Automatic);
        let manual = compute_display_order(&storage, OrderingMode::Manual);
        assert_eq!(ids(&manual), vec!["A", "B"]);
    }

    #[test]
    fn maps_display_positions_to_storage() {
        let storage = vec![patient("A", 1.0), patient("B", 5.0), patient("C", 3.0)];
        assert_eq!(storage_index_of_display(&storage, OrderingMode::Automatic, 0), Some(1));
        assert_eq!(storage_index_of_display(&storage, OrderingMode::Automatic, 2), Some(0));
        assert_eq!(storage_index_of_display(&storage, OrderingMode::Manual, 2), Some(2));
        assert_eq!(storage_index_of_display(&storage, OrderingMode::Manual, 3), None);
    }
}
