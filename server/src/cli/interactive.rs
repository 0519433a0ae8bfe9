// server/src/cli/interactive.rs

// The interactive loop. A blocking task owns the line editor and forwards
// parsed actions; this task owns the board runtime and is the only place
// the board is read or changed.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc::{self, UnboundedSender};

use worklist::runtime::{BoardEvent, BoardRuntime, UserCommand};
use worklist::{PatientService, WorklistConfig};
use worklist_client::HttpPatientService;

use crate::cli::commands::{parse_line, ParsedLine, ReplAction};
use crate::cli::fields::parse_patch;
use crate::cli::render::{print_welcome_screen, render_board, render_notices};

const PROMPT: &str = "worklist> ";

fn read_lines(actions: UnboundedSender<ReplAction>) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to start line editor")?;
    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match parse_line(&line) {
                    ParsedLine::Empty => {}
                    ParsedLine::Message(message) => println!("{}", message.trim_end()),
                    ParsedLine::Action(ReplAction::Exit) => break,
                    ParsedLine::Action(action) => {
                        if actions.send(action).is_err() {
                            break;
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                warn!("Failed to read line: {}", err);
                break;
            }
        }
    }
    let _ = actions.send(ReplAction::Exit);
    Ok(())
}

/// Applies one typed action. Returns `false` when the terminal should close.
fn apply_action(runtime: &mut BoardRuntime, action: ReplAction) -> bool {
    match action {
        ReplAction::Board(command) => {
            runtime.handle(BoardEvent::Command(command));
            print!("{}", render_board(runtime.board()));
        }
        ReplAction::Update { id, fields } => {
            let current = runtime.board().store().get(&id).map(|p| p.vitals.clone());
            match parse_patch(&fields, current.as_ref()) {
                Ok(patch) => {
                    runtime.handle(BoardEvent::Command(UserCommand::Update { id, patch }));
                }
                Err(err) => println!("error: {}", err),
            }
        }
        ReplAction::ShowList => print!("{}", render_board(runtime.board())),
        ReplAction::ShowMode => println!("Ordering mode: {}", runtime.board().mode()),
        ReplAction::ShowNotices => print!("{}", render_notices(runtime.board())),
        ReplAction::Exit => return false,
    }
    true
}

/// Runs the terminal until `exit` or end of input.
pub async fn run_cli_interactive(config: WorklistConfig) -> Result<()> {
    let service = HttpPatientService::from_config(&config.service)
        .with_context(|| format!("Failed to set up patient service at {}", config.service.base_url))?;
    info!("Using patient service at {}", service.base_url());
    let service: Arc<dyn PatientService> = Arc::new(service);
    let mut runtime = BoardRuntime::new(service, &config.board);

    print_welcome_screen();
    runtime.start_initial_load();
    println!("Loading patients...");

    let (actions_tx, mut actions) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || read_lines(actions_tx));

    loop {
        tokio::select! {
            event = runtime.next_event() => {
                let Some(event) = event else { break };
                if !runtime.handle(event) {
                    break;
                }
                print!("{}", render_board(runtime.board()));
            }
            action = actions.recv() => {
                let Some(action) = action else { break };
                if !apply_action(&mut runtime, action) {
                    break;
                }
            }
        }
    }

    debug!("Waiting for line editor to close");
    reader.await.context("Line editor task failed")??;
    println!("Goodbye!");
    Ok(())
}
