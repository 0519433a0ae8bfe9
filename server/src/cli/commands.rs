// server/src/cli/commands.rs

// Line grammar of the interactive terminal, parsed with `clap` in
// multicall mode so every line is its own command.

use clap::{Parser, Subcommand, ValueEnum};

use models::{ListId, OrderingMode, PatientId, WorklistError, WorklistResult};
use worklist::UserCommand;

use crate::cli::fields::{parse_new_patient, parse_patch};

#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeSetting {
    Auto,
    Manual,
    Toggle,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ReplCommand {
    /// Show the active and completed lists
    #[command(alias = "ls")]
    List,
    /// Show or change the ordering mode
    Mode {
        #[arg(value_enum)]
        setting: Option<ModeSetting>,
    },
    /// Start dragging the patient shown at <index> of <list>
    Drag { list: ListId, index: usize },
    /// Hover the current drag over <index> of <list>
    Hover { list: ListId, index: usize },
    /// Drop the current drag onto <index> of <list>
    Drop { list: ListId, index: usize },
    /// End the drag gesture without dropping
    Release,
    /// Abandon the current drag
    Cancel,
    /// Mark an active patient as completed
    Complete { id: String },
    /// Move a completed patient back to the active list
    Reactivate { id: String },
    /// Edit an active patient: update <id> field=value...
    Update {
        id: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Add a patient: add name=... [age=..] [bp=..] ...
    Add {
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Describe a patient in free text and let the service build the record
    Chat {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show notices
    Notices,
    /// Dismiss one notice by id, or all of them
    Dismiss { target: Option<String> },
    /// Leave the terminal
    #[command(aliases = ["quit", "q"])]
    Exit,
}

/// What the terminal should do with a parsed line.
#[derive(Debug, PartialEq)]
pub enum ReplAction {
    Board(UserCommand),
    /// An edit whose vitals must be merged with the patient's current ones
    /// before it is sent.
    Update { id: PatientId, fields: Vec<String> },
    ShowList,
    ShowMode,
    ShowNotices,
    Exit,
}

fn patient_id(raw: &str) -> WorklistResult<PatientId> {
    PatientId::new(raw.to_string()).map_err(WorklistError::from)
}

impl ReplCommand {
    pub fn into_action(self) -> WorklistResult<ReplAction> {
        let action = match self {
            ReplCommand::List => ReplAction::ShowList,
            ReplCommand::Mode { setting: None } => ReplAction::ShowMode,
            ReplCommand::Mode { setting: Some(ModeSetting::Toggle) } => ReplAction::Board(UserCommand::ToggleMode),
            ReplCommand::Mode { setting: Some(ModeSetting::Auto) } => {
                ReplAction::Board(UserCommand::SetMode(OrderingMode::Automatic))
            }
            ReplCommand::Mode { setting: Some(ModeSetting::Manual) } => {
                ReplAction::Board(UserCommand::SetMode(OrderingMode::Manual))
            }
            ReplCommand::Drag { list, index } => ReplAction::Board(UserCommand::StartDrag { list, index }),
            ReplCommand::Hover { list, index } => ReplAction::Board(UserCommand::Hover { list, index }),
            ReplCommand::Drop { list, index } => ReplAction::Board(UserCommand::Drop { list, index }),
            ReplCommand::Release => ReplAction::Board(UserCommand::ReleaseDrag),
            ReplCommand::Cancel => ReplAction::Board(UserCommand::CancelDrag),
            ReplCommand::Complete { id } => ReplAction::Board(UserCommand::Complete(patient_id(&id)?)),
            ReplCommand::Reactivate { id } => ReplAction::Board(UserCommand::Reactivate(patient_id(&id)?)),
            ReplCommand::Update { id, fields } => {
                // Validate now so typos are reported before anything is sent.
                parse_patch(&fields, None)?;
                ReplAction::Update {
                    id: patient_id(&id)?,
                    fields,
                }
            }
            ReplCommand::Add { fields } => ReplAction::Board(UserCommand::Create(parse_new_patient(&fields)?)),
            ReplCommand::Chat { text } => ReplAction::Board(UserCommand::Chat(text.join(" "))),
            ReplCommand::Notices => ReplAction::ShowNotices,
            ReplCommand::Dismiss { target: None } => ReplAction::Board(UserCommand::DismissAll),
            ReplCommand::Dismiss { target: Some(target) } if target.eq_ignore_ascii_case("all") => {
                ReplAction::Board(UserCommand::DismissAll)
            }
            ReplCommand::Dismiss { target: Some(target) } => {
                let id = target
                    .parse::<u64>()
                    .map_err(|_| WorklistError::InvalidInput(format!("notice id must be a number, got '{}'", target)))?;
                ReplAction::Board(UserCommand::Dismiss(id))
            }
            ReplCommand::Exit => ReplAction::Exit,
        };
        Ok(action)
    }
}

/// Outcome of reading one line.
#[derive(Debug)]
pub enum ParsedLine {
    Empty,
    Action(ReplAction),
    /// Help or a usage error rendered by clap, to be printed as is.
    Message(String),
}

pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Empty;
    }
    let Some(words) = shlex::split(line) else {
        return ParsedLine::Message("error: unbalanced quotes".to_string());
    };
    match ReplLine::try_parse_from(words) {
        Ok(parsed) => match parsed.command.into_action() {
            Ok(action) => ParsedLine::Action(action),
            Err(err) => ParsedLine::Message(format!("error: {}", err)),
        },
        Err(err) => ParsedLine::Message(err.render().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(line: &str) -> ReplAction {
        match parse_line(line) {
            ParsedLine::Action(action) => action,
            other => panic!("'{}' did not parse: {:?}", line, other),
        }
    }

    fn message(line: &str) -> String {
        match parse_line(line) {
            ParsedLine::Message(message) => message,
            other => panic!("'{}' should have produced a message: {:?}", line, other),
        }
    }

    #[test]
    fn parses_drag_gestures() {
        assert_eq!(
            action("drag active 0"),
            ReplAction::Board(UserCommand::StartDrag { list: ListId::Active, index: 0 })
        );
        assert_eq!(
            action("hover c 2"),
            ReplAction::Board(UserCommand::Hover { list: ListId::Completed, index: 2 })
        );
        assert_eq!(action("drop done 0"), ReplAction::Board(UserCommand::Drop { list: ListId::Completed, index: 0 }));
        assert_eq!(action("release"), ReplAction::Board(UserCommand::ReleaseDrag));
    }

    #[test]
    fn parses_mode_settings() {
        assert_eq!(action("mode"), ReplAction::ShowMode);
        assert_eq!(action("mode toggle"), ReplAction::Board(UserCommand::ToggleMode));
        assert_eq!(action("mode manual"), ReplAction::Board(UserCommand::SetMode(OrderingMode::Manual)));
    }

    #[test]
    fn chat_keeps_quoted_text() {
        assert_eq!(
            action("chat \"45 year old, chest pain\" and sweating"),
            ReplAction::Board(UserCommand::Chat("45 year old, chest pain and sweating".to_string()))
        );
    }

    #[test]
    fn add_and_update_validate_fields() {
        match action("add 'name=Ann Lee' age=40") {
            ReplAction::Board(UserCommand::Create(patient)) => assert_eq!(patient.name, "Ann Lee"),
            other => panic!("unexpected {:?}", other),
        }
        match action("update 7 age=41") {
            ReplAction::Update { id, fields } => {
                assert_eq!(id.as_str(), "7");
                assert_eq!(fields, vec!["age=41".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(message("update 7 age=old").contains("age"));
    }

    #[test]
    fn dismiss_variants() {
        assert_eq!(action("dismiss"), ReplAction::Board(UserCommand::DismissAll));
        assert_eq!(action("dismiss all"), ReplAction::Board(UserCommand::DismissAll));
        assert_eq!(action("dismiss 3"), ReplAction::Board(UserCommand::Dismiss(3)));
        assert!(message("dismiss three").contains("notice id"));
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(matches!(parse_line("   "), ParsedLine::Empty));
        assert!(!message("teleport 3").is_empty());
        assert!(!message("drag sideways 1").is_empty());
        assert!(message("chat 'unterminated").contains("quotes"));
        assert_eq!(action("quit"), ReplAction::Exit);
    }
}
