mod controller;
mod history;
mod surface;
mod transport;

use std::io::Write;

use catena_config::init_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};

use controller::{ChatController, TurnOutcome, DEFAULT_TURN_TIMEOUT};
use surface::TerminalSurface;
use transport::HttpTurnTransport;

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

fn prompt(prefill: Option<&str>) {
    match prefill {
        Some(text) => print!("> [{text}] "),
        None => print!("> "),
    }
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() {
    init_tracing("warn");

    let base_url =
        std::env::var("CATENA_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());

    let transport =
        HttpTurnTransport::new(&base_url, 30).expect("failed to build gateway transport");
    let mut controller =
        ChatController::new(transport, TerminalSurface::new(), DEFAULT_TURN_TIMEOUT);

    println!("catena console (gateway at {base_url})");
    println!("type a question; /N reuses related question N; empty line sends the prefilled input; /quit exits");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Question text copied in by /N, submitted on the next empty line.
    let mut prefill: Option<String> = None;

    prompt(prefill.as_deref());
    while let Some(line) = lines.next_line().await.expect("stdin read failed") {
        let line = line.trim().to_string();

        if line == "/quit" || line == "/q" {
            break;
        }

        if line.is_empty() {
            if let Some(text) = prefill.take() {
                submit(&mut controller, &text).await;
            }
            prompt(prefill.as_deref());
            continue;
        }

        if let Some(rest) = line.strip_prefix('/') {
            if let Ok(n) = rest.parse::<usize>() {
                match n.checked_sub(1).and_then(|i| controller.reuse_question(i)) {
                    Some(question) => prefill = Some(question),
                    None => println!("no related question /{n}"),
                }
                prompt(prefill.as_deref());
                continue;
            }
        }

        prefill = None;
        submit(&mut controller, &line).await;
        prompt(None);
    }
}

async fn submit<T, S>(controller: &mut ChatController<T, S>, text: &str)
where
    T: transport::TurnTransport,
    S: surface::ChatSurface,
{
    match controller.submit(text).await {
        TurnOutcome::Completed | TurnOutcome::Failed | TurnOutcome::Ignored => {}
        TurnOutcome::Busy => println!("a turn is already in flight"),
    }
}
