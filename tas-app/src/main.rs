//! TAS authentication provider shell
//!
//! Reads one command per line from stdin and answers with one JSON line on
//! stdout. Logs go to stderr.

mod commands;
mod state;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use commands::Command;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tas_core::init_logging();

    let state = AppState::new()?;
    state.initialize().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let (reply, quit) = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => (
                commands::dispatch(&state, &command).await?,
                command == Command::Quit,
            ),
            Some(Err(message)) => {
                tracing::warn!(input = %line.trim(), "Rejected command");
                let reply = serde_json::to_string(&commands::CommandResult::<()>::err(message))?;
                (reply, false)
            }
        };

        stdout.write_all(format!("{reply}\n").as_bytes()).await?;
        stdout.flush().await?;

        if quit {
            break;
        }
    }

    state.shutdown();
    tracing::info!("TAS shell stopped");

    Ok(())
}
