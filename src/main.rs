//! Headless slideshow host.
//!
//! Builds an in-memory page, runs the slideshow controller on it and turns
//! stdin lines into pointer events.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use humantime::format_duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use rust_slideshow::config::Configuration;
use rust_slideshow::dom::{Document, Page};
use rust_slideshow::events::{Gesture, PointerEvent};
use rust_slideshow::tasks::controller;

#[derive(Debug, Parser)]
#[command(name = "rust-slideshow", version, about = "Crossfading image slideshow")]
struct Args {
    /// Path to YAML config (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// YAML page description holding the slideshow container
    #[arg(short, long, value_name = "FILE")]
    page: Option<PathBuf>,
    /// Number of generated panels when no page is given
    #[arg(long, value_name = "N", default_value_t = 5)]
    demo_panels: usize,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, PartialEq)]
enum Command {
    Pointer(PointerEvent),
    Quit,
}

fn parse_command(line: &str, cfg: &Configuration) -> Option<Command> {
    let mut words = line.split_whitespace();
    let cmd = match words.next()? {
        "enter" => Command::Pointer(PointerEvent::new(&cfg.container_id, Gesture::Enter)),
        "leave" => Command::Pointer(PointerEvent::new(&cfg.container_id, Gesture::Leave)),
        "left" | "<" => Command::Pointer(PointerEvent::new(&cfg.arrows.left_id, Gesture::Click)),
        "right" | ">" => {
            Command::Pointer(PointerEvent::new(&cfg.arrows.right_id, Gesture::Click))
        }
        "click" => Command::Pointer(PointerEvent::new(words.next()?, Gesture::Click)),
        "quit" | "q" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let Args {
        config,
        page,
        demo_panels,
        verbose,
    } = Args::parse();
    init_tracing(verbose);

    let cfg = match &config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("invalid configuration values")?;
    tracing::info!(
        container = %cfg.container_id,
        fade = %format_duration(cfg.fade),
        auto_advance = %format_duration(cfg.auto_advance),
        "configuration ready"
    );

    let page = match &page {
        Some(path) => Page::from_yaml_file(path)
            .with_context(|| format!("failed to load page from {}", path.display()))?,
        None => Page::gallery(&cfg.container_id, demo_panels),
    };
    let document = Document::from_page(&page);

    let (event_tx, event_rx) = mpsc::channel::<PointerEvent>(16);
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    // stdin lines -> pointer events; EOF or `quit` shuts down
    {
        let cancel = cancel.clone();
        let cfg = cfg.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                let line = tokio::select! {
                    _ = cancel.cancelled() => break,
                    line = lines.next_line() => line,
                };
                match line {
                    Ok(Some(line)) => match parse_command(&line, &cfg) {
                        Some(Command::Pointer(ev)) => {
                            if event_tx.send(ev).await.is_err() {
                                break;
                            }
                        }
                        Some(Command::Quit) => break,
                        None => tracing::warn!(
                            input = line.trim(),
                            "unknown command (enter, leave, left, right, click <id>, quit)"
                        ),
                    },
                    Ok(None) => {
                        tracing::info!("stdin closed; initiating shutdown");
                        break;
                    }
                    Err(err) => {
                        tracing::warn!("stdin watcher failed: {err}");
                        break;
                    }
                }
            }
            cancel.cancel();
        });
    }

    let document = controller::run(document, cfg, event_rx, None, cancel.clone())
        .await
        .context("slideshow controller failed")?;
    tracing::debug!(
        transitions = document.transitions().len(),
        "slideshow finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_target_configured_ids() {
        let cfg = Configuration::default();
        assert_eq!(
            parse_command("left", &cfg),
            Some(Command::Pointer(PointerEvent::new(
                "slideshow-arrow-left",
                Gesture::Click
            )))
        );
        assert_eq!(
            parse_command("  enter ", &cfg),
            Some(Command::Pointer(PointerEvent::new("slideshow", Gesture::Enter)))
        );
        assert_eq!(
            parse_command("click foo", &cfg),
            Some(Command::Pointer(PointerEvent::new("foo", Gesture::Click)))
        );
        assert_eq!(parse_command("q", &cfg), Some(Command::Quit));
        assert_eq!(parse_command("click", &cfg), None);
        assert_eq!(parse_command("", &cfg), None);
        assert_eq!(parse_command("jump", &cfg), None);
    }
}
