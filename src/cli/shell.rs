// src/cli/shell.rs — Local REPL over the dispatcher
//
// Every stdin line is handled as if it had been posted in `room`, so a
// whole poker night can be run from a terminal.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::bot::dispatcher::Dispatcher;

/// Read commands from stdin until EOF or `quit`.
pub async fn run_shell(mut dispatcher: Dispatcher, room: &str) -> anyhow::Result<()> {
    println!(
        "PokerPal shell (room '{room}'). Try `{} help`; `quit` or Ctrl+D to exit.",
        dispatcher.prefix()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        tracing::info!("[{room}] local: {line}");
        for reply in dispatcher.handle(room, line).await {
            println!("{reply}");
            println!();
        }
    }

    Ok(())
}
