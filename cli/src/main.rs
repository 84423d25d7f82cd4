// SPDX-License-Identifier: MIT OR Apache-2.0

//! WikiRace CLI - Headless driver for playing and inspecting rounds
//!
//! The CLI stands in for the embedded article view: every line read from
//! stdin is one navigation report (the URL of the page now displayed). The
//! first line is the start page itself.

// Initialize logging at the start of the program
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, Naming};
use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};

// Initialize logging functionality first thing in the program
fn init_logging() -> Result<()> {
    // Get log directory
    let log_dir = match std::env::consts::OS {
        "macos" => {
            let mut path = PathBuf::from(std::env::var("HOME")?);
            path.push("Library");
            path.push("Logs");
            path.push("wikirace-cli");
            path
        }
        _ => {
            let mut path = PathBuf::from(".");
            path.push("logs");
            path
        }
    };

    // Ensure log directory exists
    std::fs::create_dir_all(&log_dir)?;

    // Configure and start the logger
    Logger::try_with_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("wikirace-cli")
                .suffix("log"),
        )
        .rotate(
            Criterion::Size(64 * 1024 * 1024), // 64MB per file
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5), // Keep 5 files
        )
        .start()?;

    Ok(())
}

static LOGGER_INIT: std::sync::Once = std::sync::Once::new();

fn ensure_logging_initialized() -> Result<()> {
    let mut result = Ok(());
    LOGGER_INIT.call_once(|| {
        if let Err(e) = init_logging() {
            result = Err(e);
        }
    });

    result
}

mod render;

use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;
use tokio::signal;
use wikirace_core::config::{self, RaceConfig};
use wikirace_core::host::{HostPolicy, CHROME_SUPPRESSION_STYLE};
use wikirace_core::scoring::SubmissionClock;
use wikirace_core::titles::{self, DailyArticles, RoundSetup};
use wikirace_core::{
    article_url, FileScoreStore, Leaderboard, NavigationEvent, NavigationOutcome, Round, RoundError,
    ScoreStore,
};

/// Attempts at storing a score before giving up
const SUBMIT_ATTEMPTS: u32 = 3;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "wikirace-cli", about = "WikiRace command-line interface", version)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Score file, overriding the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable debug logging to the terminal
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a round, reading navigation URLs from stdin
    Play {
        /// Name recorded with the score
        #[arg(short, long)]
        player: String,

        /// Start article title
        #[arg(long, requires = "target")]
        start: Option<String>,

        /// Target article title
        #[arg(long, requires = "start")]
        target: Option<String>,

        /// JSON document with `startArticleTitle` and `targetArticleTitle`
        #[arg(long, conflicts_with_all = ["start", "titles"])]
        daily: Option<PathBuf>,

        /// JSON list of titles to pick a random round from
        #[arg(long, conflicts_with = "start")]
        titles: Option<PathBuf>,
    },
    /// Show the leaderboard
    Leaderboard {
        /// Highlight this player's latest score
        #[arg(short, long)]
        player: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Clean a raw popular-titles list into a title file
    Titles {
        /// JSON list of raw page titles
        input: PathBuf,

        /// Where to write the filtered list
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the article URL for a title
    Url {
        title: String,
    },
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging as the first action in main
    if let Err(e) = ensure_logging_initialized() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    // Parse command-line arguments
    let args = Args::parse();

    // Setup debug logging if requested
    if args.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let mut race_config = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(store) = args.store.clone() {
        race_config.store_path = Some(store);
    }

    match args.command {
        Command::Play {
            player,
            start,
            target,
            daily,
            titles,
        } => {
            let setup = round_setup(&race_config, start, target, daily, titles)?;
            play_round(&race_config, &player, setup, args.debug).await
        }
        Command::Leaderboard { player, json } => {
            let store = open_store(&race_config)?;
            let corpus = store.query_ordered_limit(None)?;
            let board = Leaderboard::from_corpus(corpus, race_config.leaderboard_size, player.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                print!("{}", render::render_leaderboard(&board));
            }
            Ok(())
        }
        Command::Titles { input, output } => {
            let raw = titles::load_titles(&input)
                .with_context(|| format!("Failed to load titles from {}", input.display()))?;
            let filtered = titles::filter_popular_titles(raw, race_config.popular_titles_limit);
            titles::save_titles(&output, &filtered)?;
            println!("Saved {} titles to {}", filtered.len(), output.display());
            Ok(())
        }
        Command::Url { title } => {
            println!("{}", article_url(&race_config.wiki_host, &title));
            Ok(())
        }
    }
}

/// Decide the start and target articles
fn round_setup(
    race_config: &RaceConfig,
    start: Option<String>,
    target: Option<String>,
    daily: Option<PathBuf>,
    titles_path: Option<PathBuf>,
) -> Result<RoundSetup> {
    let host = race_config.wiki_host.as_str();

    if let (Some(start), Some(target)) = (start, target) {
        return Ok(RoundSetup::new(host, start, target));
    }

    if let Some(path) = daily {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read daily articles from {}", path.display()))?;
        let daily: DailyArticles = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse daily articles from {}", path.display()))?;
        return Ok(daily.into_setup(host));
    }

    if let Some(path) = titles_path {
        let list = titles::load_titles(&path)
            .with_context(|| format!("Failed to load titles from {}", path.display()))?;
        return Ok(titles::pick_round(host, &list, &mut rand::thread_rng())?);
    }

    Err(anyhow!("Give --start and --target, --daily, or --titles"))
}

fn open_store(race_config: &RaceConfig) -> Result<FileScoreStore> {
    let path = race_config.resolved_store_path()?;
    FileScoreStore::open(&path).with_context(|| format!("Failed to open score store {}", path.display()))
}

/// Run one round until the target is reached or input ends
async fn play_round(race_config: &RaceConfig, player: &str, setup: RoundSetup, debug: bool) -> Result<()> {
    let policy = race_config.host_policy();
    let mut store = open_store(race_config)?;

    println!("{}  ->  {}", setup.start_title, setup.target_title);
    println!("Start page: {}", setup.start_url);
    if debug {
        println!("DEBUG: Inject before content load: {}", CHROME_SUPPRESSION_STYLE);
    }
    println!("Enter the URL of each page you open (Ctrl+D to give up):");

    let mut round = Round::new(player, setup.session(chrono::Utc::now()));
    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(race_config.tick_interval_ms.max(1)));
    let mut stdin_lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            // Handle Ctrl+C gracefully
            _ = signal::ctrl_c() => {
                println!("\nRound abandoned.");
                tracing::info!(round = %round.id(), "Round abandoned by interrupt");
                return Ok(());
            }

            _ = ticker.tick() => {
                let session = round.session();
                eprintln!("{}", render::render_clock(
                    session.elapsed_seconds(chrono::Utc::now()),
                    session.page_visit_count(),
                ));
            }

            result = stdin_lines.next_line() => {
                let line = match result {
                    Ok(Some(line)) => line.trim().to_string(),
                    Ok(None) => {
                        println!("Round abandoned.");
                        tracing::info!(round = %round.id(), "Round abandoned at end of input");
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Error reading input: {}", e);
                        continue;
                    }
                };
                if line.is_empty() {
                    continue;
                }

                if !allowed(&policy, &line) {
                    println!("Can't leave the encyclopedia: {}", line);
                    continue;
                }

                let outcome = round.observe(&NavigationEvent::new(line), chrono::Utc::now())?;
                if outcome == NavigationOutcome::Matched {
                    break;
                }
            }
        }
    }

    // Stop the clock
    drop(ticker);
    if let Some(snapshot) = round.snapshot() {
        println!("{}", render::render_finish(&setup.target_title, &snapshot));
    }

    finish_round(race_config, &mut round, &mut store).await
}

fn allowed(policy: &HostPolicy, url: &str) -> bool {
    // Bare paths come from the article view itself; `//host` is not one
    (url.starts_with('/') && !url.starts_with("//")) || policy.allows(url)
}

/// Store the score, rank it and print the leaderboard
async fn finish_round(race_config: &RaceConfig, round: &mut Round, store: &mut FileScoreStore) -> Result<()> {
    let corpus = store.query_ordered_limit(None)?;
    let mut clock = SubmissionClock::resume_after(corpus.iter().map(|r| r.submitted_at).max());
    let submitted_at = clock.issue(chrono::Utc::now());

    let mut attempt = 1;
    loop {
        match round.submit(&mut *store, submitted_at) {
            Ok(_) => break,
            Err(RoundError::Store(e)) if attempt < SUBMIT_ATTEMPTS => {
                eprintln!("Failed to save score (attempt {}): {}", attempt, e);
                attempt += 1;
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            }
            Err(e) => return Err(anyhow!("Failed to save score: {}", e)),
        }
    }

    let size = race_config.leaderboard_size;
    let top = store.query_ordered_limit(Some(size))?;
    let admission = round.rank(&top, size)?;
    println!("{}", render::render_admission(&admission, size));

    let corpus = store.query_ordered_limit(None)?;
    let board = Leaderboard::from_corpus(corpus, size, Some(round.player()));
    print!("{}", render::render_leaderboard(&board));
    round.display()?;

    Ok(())
}
