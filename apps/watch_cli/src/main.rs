use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ConnectionStatus, PointerId, WatchSession, WsChannel};
use shared::protocol::DEFAULT_TOPIC;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod render;

use command::{parse_command, Command, USAGE};
use render::render_face;

const MOUSE_POINTER: PointerId = 1;
const TAP_POINTER: PointerId = 2;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:4000")]
    server_url: String,
    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let channel = Arc::new(
        WsChannel::connect(&args.server_url, args.topic.as_str())
            .await
            .with_context(|| format!("failed to join {} on {}", args.topic, args.server_url))?,
    );
    let mut status = channel.watch_status();
    let mut session = WatchSession::join(channel);
    let mut display = session.watch();

    println!("{}", render_face(&session.state()));
    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = display.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = display.borrow_and_update().clone();
                println!("{}", render_face(&state));
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                if *status.borrow_and_update() == ConnectionStatus::Disconnected {
                    warn!("controller disconnected; display frozen at last known state");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => apply(&mut session, command),
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }

    info!(topic = session.topic(), "leaving watch session");
    Ok(())
}

fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn apply(session: &mut WatchSession, command: Command) {
    let emitter = session.emitter();
    match command {
        Command::Down { x, y } => {
            emitter.pointer_down(MOUSE_POINTER, x, y);
        }
        Command::Up { x, y } => {
            emitter.pointer_up(MOUSE_POINTER, x, y);
        }
        Command::Tap(button) => {
            let Some((x, y)) = emitter.layout().region(button).map(|region| region.center())
            else {
                return;
            };
            emitter.pointer_down(TAP_POINTER, x, y);
            emitter.pointer_up(TAP_POINTER, x, y);
        }
        Command::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("warn".into())).to_string(), "warn");
    }
}
