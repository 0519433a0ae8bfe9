// server/src/main.rs

// Entry point of the worklist terminal. Configuration comes only from
// `worklist.toml`; process arguments and environment are not read.

use anyhow::Result;
use worklist::load_worklist_config;
use worklist_server::cli::run_cli_interactive;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_worklist_config(None)?;

    env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .init();

    run_cli_interactive(config).await
}
