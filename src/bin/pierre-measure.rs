// ABOUTME: Pierre measure CLI for replaying recorded frames, scoring recovery and watching the feed
// ABOUTME: Prints measurement results as JSON on stdout and logs through tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Replay a recorded sit-up session
//! pierre-measure replay situp recordings/situp.jsonl
//!
//! # Score a recovery heart rate, or a ten-second manual pulse count
//! pierre-measure score-recovery --bpm 104
//! pierre-measure score-recovery --beats 17
//!
//! # Poll the heart-rate relay ten times
//! pierre-measure watch-heart-rate --url http://127.0.0.1:3001/api/heart-rate --count 10
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pierre_measure::algorithms::{bpm_from_manual_count, calc_fitness_score};
use pierre_measure::config::MeasureConfig;
use pierre_measure::heart_rate::{HeartRatePoller, HttpHeartRateSource};
use pierre_measure::logging::{LoggingConfig, MeasureLogger};
use pierre_measure::models::FitnessTest;
use pierre_measure::replay;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pierre-measure",
    about = "Pierre pose-based fitness measurement",
    long_about = "Replays recorded pose frames through the sit-up and sit-and-reach orchestrators, scores step-test recovery heart rates, and polls the heart-rate relay."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON config file; environment variables still override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines frame recording and print the result
    Replay {
        /// Test to run: situp or sit-and-reach
        test: String,

        /// Recording path
        file: PathBuf,
    },

    /// Score a step-test recovery heart rate
    ScoreRecovery {
        /// Recovery heart rate in beats per minute
        #[arg(long, conflicts_with = "beats")]
        bpm: Option<f64>,

        /// Beats counted over ten seconds
        #[arg(long)]
        beats: Option<u32>,
    },

    /// Poll the heart-rate relay and print each snapshot
    WatchHeartRate {
        /// Relay endpoint, defaults to the configured one
        #[arg(long)]
        url: Option<String>,

        /// Snapshots to print before exiting
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = match &cli.config {
        Some(path) => MeasureConfig::from_env_over(MeasureConfig::from_json_file(path)?)?,
        None => MeasureConfig::load()?,
    };

    match cli.command {
        Command::Replay { test, file } => run_replay(&test, &file, &config).await,
        Command::ScoreRecovery { bpm, beats } => score_recovery(bpm, beats),
        Command::WatchHeartRate { url, count } => {
            if let Some(url) = url {
                config.heart_rate.url = url;
            }
            watch_heart_rate(&config, count).await
        }
    }
}

async fn run_replay(test: &str, file: &Path, config: &MeasureConfig) -> Result<()> {
    let test: FitnessTest = test.parse()?;
    let records = replay::load_jsonl(file)
        .await
        .with_context(|| format!("loading {}", file.display()))?;
    let summary = replay::replay(test, &records, config)?;

    match &summary.result {
        Some(result) => {
            MeasureLogger::log_session_result(result);
            println!("{}", result.to_json()?);
        }
        None => {
            info!(phase = %summary.final_phase, "recording ended before measuring started");
            println!(
                "{}",
                json!({ "test": test, "frames": summary.frames, "phase": summary.final_phase })
            );
        }
    }
    Ok(())
}

fn score_recovery(bpm: Option<f64>, beats: Option<u32>) -> Result<()> {
    let bpm = match (bpm, beats) {
        (Some(bpm), _) => bpm,
        (None, Some(0)) => bail!("beat count must be positive"),
        (None, Some(beats)) => bpm_from_manual_count(beats),
        (None, None) => bail!("pass --bpm or --beats"),
    };

    let score = calc_fitness_score(Some(bpm));
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "recovery_bpm": bpm, "score": score }))?
    );
    Ok(())
}

async fn watch_heart_rate(config: &MeasureConfig, count: u32) -> Result<()> {
    let source = HttpHeartRateSource::new(config.heart_rate.clone())?;
    info!(url = source.url(), count, "watching heart-rate relay");

    let poller = HeartRatePoller::spawn(
        Arc::new(source),
        config.heart_rate.poll_interval(),
        config.heart_rate.failure_warning_threshold,
    );
    let mut snapshots = poller.subscribe();

    for _ in 0..count {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
        let snapshot = *snapshots.borrow_and_update();
        MeasureLogger::log_heart_rate_status(
            snapshot.bpm,
            snapshot.consecutive_failures,
            snapshot.connectivity_warning,
        );
        println!("{}", serde_json::to_string(&snapshot)?);
    }

    poller.shutdown().await;
    Ok(())
}
