// server/src/cli/render.rs

// Text rendering of the board. Everything returns a `String` so the
// interactive loop decides when to print.

use std::fmt::Write;

use colored::{ColoredString, Colorize};

use models::{Patient, PriorityClass};
use worklist::board::{Board, Severity};
use worklist::engine::DragStatus;

fn priority_badge(patient: &Patient) -> ColoredString {
    let label = format!("{:>5.1} {:<8}", patient.priority_score, patient.priority_level);
    match patient.priority_class() {
        PriorityClass::Critical => label.red().bold(),
        PriorityClass::High => label.red(),
        PriorityClass::Medium => label.yellow(),
        PriorityClass::Low => label.green(),
        PriorityClass::VeryLow => label.normal(),
    }
}

fn patient_line(index: usize, patient: &Patient) -> String {
    let mut line = format!(
        "  {:>2}. {} {} ({}, {})",
        index,
        priority_badge(patient),
        patient.name.bold(),
        patient.age,
        patient.id
    );
    if !patient.symptoms.is_empty() {
        let _ = write!(line, " - {}", patient.symptoms);
    }
    if !patient.vitals.is_empty() {
        let _ = write!(line, " [{}]", patient.vitals.summary());
    }
    line
}

pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    let store = board.store();

    let _ = writeln!(
        out,
        "{} ({} ordering{})",
        "Active patients".cyan().bold(),
        board.mode(),
        if board.is_loading() { ", loading..." } else { "" }
    );
    let shown = board.display_order();
    if shown.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (index, patient) in shown.iter().enumerate() {
        let _ = writeln!(out, "{}", patient_line(index, patient));
    }

    let _ = writeln!(out, "{}", "Completed".cyan().bold());
    if store.completed().is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (index, patient) in store.completed().iter().enumerate() {
        let when = patient
            .completed_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{} done {}", patient_line(index, patient), when.dimmed());
    }

    if let Some(session) = board.drag().session() {
        let state = match session.status {
            DragStatus::Idle => "idle",
            DragStatus::Dragging if session.released => "released, waiting for drop",
            DragStatus::Dragging => "dragging",
            DragStatus::Hovering => "hovering",
            DragStatus::Resolved => "resolved",
        };
        let target = session
            .hover
            .map(|h| format!(" over {} {}", h.list, h.index))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{} patient {} from {} {} ({}{})",
            "Drag:".magenta(),
            session.patient_id,
            session.source_list,
            session.source_index,
            state,
            target
        );
    }

    if !board.notices().is_empty() {
        let _ = writeln!(
            out,
            "{} notice(s), type 'notices' to read them",
            board.notices().len().to_string().yellow()
        );
    }
    out
}

pub fn render_notices(board: &Board) -> String {
    let mut out = String::new();
    if board.notices().is_empty() {
        let _ = writeln!(out, "No notices.");
        return out;
    }
    for notice in board.notices().iter() {
        let severity = match notice.severity {
            Severity::Info => notice.severity.to_string().normal(),
            Severity::Warning => notice.severity.to_string().yellow(),
            Severity::Error => notice.severity.to_string().red(),
        };
        let _ = writeln!(
            out,
            "  [{}] {} {} {}",
            notice.id,
            notice.raised_at.format("%H:%M:%S"),
            severity,
            notice.message
        );
    }
    out
}

pub fn print_welcome_screen() {
    println!("{}", "Patient Worklist".cyan().bold());
    println!("{}", "Type 'help' for a list of commands.".green());
    println!("{}", "Type 'exit' or 'quit' to leave.".red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{ListId, OrderingMode, PatientId, WorklistError};

    fn board() -> Board {
        let mut board = Board::new(OrderingMode::Automatic);
        for (id, name, score) in [("1", "Ann", 2.0), ("2", "Bob", 8.0)] {
            let mut patient = Patient::new(PatientId::new(id.to_string()).unwrap(), name, score);
            patient.symptoms = "cough".into();
            board.store_mut().add_active(patient).unwrap();
        }
        board
    }

    #[test]
    fn lists_patients_in_display_order() {
        let board = board();
        let text = render_board(&board);
        let bob = text.find("Bob").unwrap();
        let ann = text.find("Ann").unwrap();
        assert!(bob < ann);
        assert!(text.contains("automatic ordering"));
    }

    #[test]
    fn shows_drag_and_notice_hints() {
        let mut board = board();
        board.start_drag(ListId::Active, 0).unwrap();
        board.report(&WorklistError::collaborator("timeout"));
        let text = render_board(&board);
        assert!(text.contains("from active 1"));
        assert!(text.contains("notice(s)"));
        assert!(render_notices(&board).contains("timeout"));
    }
}
