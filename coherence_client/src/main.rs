//! Replay binary.
//!
//! Usage:
//!   cargo run -p coherence_client -- [--config replay.json] [--seed 7]
//!       [--duration 10] [--interpolator linear|spline|none] [--realtime]
//!
//! Moves a simulated binding, sends its samples through a lossy, jittery
//! link and logs what the interpolator displays.

use std::env;

use anyhow::{bail, Context};
use coherence_client::replay::{self, ReplayConfig};
use coherence_shared::interpolator::InterpolatorKind;
use tracing::info;

fn parse_args() -> anyhow::Result<ReplayConfig> {
    let args: Vec<String> = env::args().collect();

    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = &args[i + 1];
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            ReplayConfig::from_json_str(&text).with_context(|| format!("parse {path}"))?
        }
        _ => ReplayConfig::default(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" if i + 1 < args.len() => {
                cfg.seed = args[i + 1].parse().context("--seed")?;
                i += 2;
            }
            "--duration" if i + 1 < args.len() => {
                cfg.duration_secs = args[i + 1].parse().context("--duration")?;
                i += 2;
            }
            "--interpolator" if i + 1 < args.len() => {
                cfg.settings.interpolator = match args[i + 1].as_str() {
                    "none" => InterpolatorKind::None,
                    "linear" => InterpolatorKind::Linear,
                    "spline" => InterpolatorKind::Spline,
                    other => bail!("unknown interpolator {other}"),
                };
                i += 2;
            }
            "--realtime" => {
                cfg.realtime = true;
                i += 1;
            }
            "--fast" => {
                cfg.realtime = false;
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    info!(
        seed = cfg.seed,
        duration = cfg.duration_secs,
        latency = cfg.network.latency,
        jitter = cfg.network.jitter,
        "Starting replay"
    );

    let report = replay::run(&cfg).await?;
    info!(
        ticks = report.ticks,
        sent = report.samples_sent,
        delivered = report.samples_delivered,
        delay = report.final_delay,
        latency = report.final_network_latency,
        max_tick_movement = report.max_tick_movement,
        "Replay finished"
    );

    Ok(())
}
