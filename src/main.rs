//! `tweetline` command-line entry point.
//!
//! The binary replays a captured user stream through the same session and engine a
//! live client uses, then prints the resulting timeline:
//!
//! ```text
//! tweetline replay capture.jsonl --owner-id 42 --mentions
//! ```
//!
//! A capture is newline-delimited JSON, one stream frame per line. Blank lines are
//! keep-alives. The end of the file is treated as a dropped connection, so the
//! printed timeline ends with a separator just like after a real disconnect.

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tweetline::app::{Notification, Notifier, TimelineSnapshot};
use tweetline::domain::{TimelineItem, User, UserId};
use tweetline::stream::{ReplayTransport, StreamSession};
use tweetline::{initialize, observability, Config, Result, Signal, TimelineKind};

#[derive(Debug, Parser)]
#[command(name = "tweetline", version, about = "Timeline reconciliation core")]
struct Cli {
    /// Configuration file. Defaults to `<config_dir>/tweetline/config.toml`.
    #[arg(long, global = true, env = "TWEETLINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a newline-delimited JSON stream capture and print the timeline.
    Replay {
        /// Capture file, one stream frame per line.
        file: PathBuf,

        /// Treat this user id as the authenticated account.
        #[arg(long)]
        owner_id: Option<UserId>,

        /// Screen name for the owner account.
        #[arg(long, default_value = "me", requires = "owner_id")]
        owner_name: String,

        /// Print the mention timeline instead of home.
        #[arg(long)]
        mentions: bool,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Prints notifications as they are raised.
struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn notify(&self, notification: &Notification) {
        println!("! {}: {}", notification.title(), notification.body());
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env_and_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tweetline: {e}");
            return ExitCode::FAILURE;
        }
    };
    observability::init_tracing(&config);

    let result = match cli.command {
        Command::Replay {
            file,
            owner_id,
            owner_name,
            mentions,
            json,
        } => {
            let owner = owner_id.map(|id| User::new(id, owner_name));
            let kind = if mentions {
                TimelineKind::Mention
            } else {
                TimelineKind::Home
            };
            replay(&config, file, owner, kind, json).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            eprintln!("tweetline: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn replay(
    config: &Config,
    file: PathBuf,
    owner: Option<User>,
    kind: TimelineKind,
    json: bool,
) -> Result<()> {
    tracing::info!(file = %file.display(), ?kind, "replaying capture");

    let (engine, handle) = initialize(config);
    let engine_task = engine.with_notifier(Arc::new(PrintNotifier)).spawn();

    if let Some(owner) = owner {
        handle.send(Signal::SetOwner(owner)).await?;
    }
    handle.send(Signal::SelectTimeline(kind)).await?;

    let session = StreamSession::new(Arc::new(ReplayTransport::new(file)), handle.clone());
    session.connect();
    session.stopped().await;
    session.stop().await;

    let revision = handle.flush().await?;
    tracing::debug!(revision, "replay drained");
    let snapshot = handle.snapshot()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    drop(session);
    drop(handle);
    if let Err(e) = engine_task.await {
        tracing::warn!(error = %e, "engine task ended abnormally");
    }
    Ok(())
}

fn print_snapshot(snapshot: &TimelineSnapshot) {
    println!("{:?} timeline ({} items)", snapshot.kind, snapshot.items.len());
    for item in &snapshot.items {
        match item {
            TimelineItem::Status(status) => {
                let main = status.main_status();
                let via = if status.is_retweet() {
                    format!(" (retweeted by @{})", status.user.screen_name)
                } else {
                    String::new()
                };
                println!(
                    "{:>20}  @{}: {}{via}  [rt {}{} · fav {}{}]",
                    main.id,
                    main.user.screen_name,
                    main.text,
                    main.retweet_count,
                    if main.retweeted { "*" } else { "" },
                    main.favorite_count,
                    if main.favorited { "*" } else { "" },
                );
            }
            TimelineItem::Activity(activity) => {
                println!(
                    "{:>20}  @{} liked: {}",
                    "",
                    activity.actor.screen_name,
                    activity.status.main_status().text
                );
            }
            TimelineItem::Separator => println!("{:>20}  ----", ""),
        }
    }
    if let Some(notice) = &snapshot.notice {
        println!("notice ({:?}): {}", notice.kind, notice.text);
    }
}
