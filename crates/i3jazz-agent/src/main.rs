mod config;
mod producer;
mod signals;

use anyhow::Result;
use i3jazz_common::handoff::handoff;
use i3jazz_common::StreamEncoder;
use producer::{Producer, RunState};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  i3jazz [config.toml]    Stream status lines to stdout (built-in layout when omitted)");
    eprintln!("  i3jazz --help           Show this message");
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the bar protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("i3jazz=info".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match std::env::args().nth(1).as_deref() {
        Some("-h" | "--help") => {
            print_usage();
            return Ok(());
        }
        Some(path) => config::AgentConfig::load(path)?,
        None => config::AgentConfig::default(),
    };

    let header = config.header();
    let producer = Producer::new(
        config.build_blocks()?,
        config.interval(),
        config.collector_timeout(),
    );

    tracing::info!(
        interval_secs = config.interval_secs,
        blocks = config.blocks.len(),
        click_events = header.click_events,
        "i3jazz starting"
    );

    let (lines_tx, lines_rx) = handoff();
    let (control_tx, control_rx) = watch::channel(RunState::Running);

    let signal_handle = tokio::spawn(signals::forward(header.clone(), control_tx));
    let producer_handle = tokio::spawn(producer.run(lines_tx, control_rx));

    let mut encoder = StreamEncoder::new(tokio::io::stdout(), header);
    if let Some(limit) = config.write_timeout() {
        encoder = encoder.with_write_timeout(limit);
    }
    let result = encoder.run(lines_rx).await;

    signal_handle.abort();
    producer_handle.abort();

    match result {
        Ok(lines) => {
            tracing::info!(lines, "Stream ended");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Output stream failed");
            Err(e.into())
        }
    }
}
