// server/src/cli/mod.rs

// Interactive terminal host for one board: typed lines become the same
// commands a pointer UI would send, and the lists are redrawn after every
// event.

pub mod commands;
pub mod fields;
pub mod interactive;
pub mod render;

pub use commands::{parse_line, ParsedLine, ReplAction, ReplCommand, ReplLine};
pub use interactive::run_cli_interactive;
pub use render::{render_board, render_notices};
