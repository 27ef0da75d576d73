//! Bot host for dice duel matches.
//!
//! Reads orchestrator messages as JSON lines on stdin and writes replies as JSON
//! lines on stdout. Every (bot, match) pairing runs in its own session task.

mod config;
mod logging;
mod profiles;
mod router;
mod session;

use anyhow::{Context, Error};
use config::{HostConfig, Overrides};
use ctrlc::set_handler;
use pico_args::Arguments;
use profiles::ProfileBook;
use router::{HostEnvelope, SessionRouter};
use session::HostReply;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};

const HELP: &str = "\
Run dice duel bots against a match orchestrator over stdin/stdout

USAGE:
  dd_bots [OPTIONS]

OPTIONS:
  --profiles   PATH        JSON array of bot profiles  [default: env DD_PROFILES]
  --seed       N           Base seed for replayable sessions  [default: env DD_SEED]

FLAGS:
  --no-delay               Reply immediately instead of waiting out response delays
  -h, --help               Print help information

ENVIRONMENT:
  DD_PROFILES              Bot profile file
  DD_CHANNEL_CAPACITY      Inbox capacity per session (default 100)
  DD_APPLY_DELAYS          Wait out response delays (default true)
  DD_SEED                  Base seed
  DD_DEFAULT_TEMPERAMENT   Preset for bots without a profile (default balanced)
  RUST_LOG                 Log filter, written to stderr
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        profiles_path: pargs.opt_value_from_str("--profiles")?,
        seed: pargs.opt_value_from_str("--seed")?,
        no_delay: pargs.contains("--no-delay"),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = HostConfig::from_env(overrides)?;
    config.validate()?;

    let profiles = match &config.profiles_path {
        Some(path) => ProfileBook::load(path, config.default_temperament)
            .with_context(|| format!("Loading profiles from {}", path.display()))?,
        None => ProfileBook::new(config.default_temperament),
    };
    if profiles.is_empty() {
        tracing::info!(
            "No profiles configured, every bot plays the {} preset",
            config.default_temperament
        );
    } else {
        tracing::info!(
            "Loaded {} profile(s), default temperament {}",
            profiles.len(),
            config.default_temperament
        );
    }
    tracing::info!("Response delays {}", if config.apply_delays { "on" } else { "off" });

    let (outbox, replies) = mpsc::channel(config.channel_capacity);
    let writer = tokio::spawn(write_replies(replies));

    let mut router = SessionRouter::new(config, profiles, outbox);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let message: HostEnvelope = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Skipping malformed line: {e}");
                continue;
            }
        };

        if let Err(e) = router.route(message).await {
            tracing::warn!("Dropping message: {e}");
        }
    }

    tracing::info!("Input closed, waiting for {} session(s)", router.session_count());

    // Dropping the router releases the last session handles and the outbox
    drop(router);
    writer.await??;

    Ok(())
}

/// Serialize replies to stdout, one JSON object per line
async fn write_replies(mut replies: mpsc::Receiver<HostReply>) -> Result<(), Error> {
    let mut stdout = tokio::io::stdout();

    while let Some(reply) = replies.recv().await {
        let mut line = serde_json::to_vec(&reply)?;
        line.push(b'\n');
        stdout.write_all(&line).await?;
        stdout.flush().await?;
    }

    Ok(())
}
