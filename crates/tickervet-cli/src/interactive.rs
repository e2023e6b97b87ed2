//! Interactive prompt loop: screen one ticker per iteration until the user
//! submits an empty line.

use std::io::{self, BufRead, Write};

use tickervet_core::ScreenOrchestrator;

use crate::error::CliError;
use crate::output::text::{self, ansi};

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

pub async fn run(orchestrator: &ScreenOrchestrator) -> Result<(), CliError> {
    tracing::info!("starting interactive loop");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(
            "{}\nEnter Stock Symbol (or press Enter to quit):{} ",
            ansi::CYAN,
            ansi::RESET
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let ticker = line?.trim().to_string();

        if ticker.is_empty() {
            println!("{}Exiting.{}", ansi::CYAN, ansi::RESET);
            break;
        }

        clear_screen();
        screen_and_print(orchestrator, &ticker).await;
    }

    Ok(())
}

async fn screen_and_print(orchestrator: &ScreenOrchestrator, ticker: &str) {
    let result = orchestrator.screen_raw(&ticker.to_ascii_uppercase()).await;

    if result.is_success() {
        let index_value = orchestrator.index_value().await;
        if let Some(screen) =
            result.screen_report(orchestrator.thresholds().min_float_shares, index_value)
        {
            println!("{}", text::summary(&screen));
        }
    } else {
        eprintln!(
            "Error: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}
