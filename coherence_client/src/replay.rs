//! Replay of a simulated moving binding.
//!
//! A producer moves a position along a path and samples it at the configured
//! rate; samples travel through a [`SampleFeed`] and are played back by a
//! [`BindingInterpolator`] once per render tick. Optionally the producer pauses
//! and marks the last sample before the pause as stopped.

use std::time::Duration;

use anyhow::Context;
use coherence_shared::{config::InterpolationSettings, math::Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    interp::BindingInterpolator,
    simulator::{NetworkConditions, SampleFeed},
};

/// Interval during which the producer sends nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseWindow {
    pub start: f64,
    pub end: f64,
}

impl PauseWindow {
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

/// Replay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Producer send rate in samples per second.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    /// Render ticks per second.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Replay length in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: f64,
    #[serde(default)]
    pub seed: u64,
    /// Producer speed along x in units per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub pause: Option<PauseWindow>,
    /// Sleep between ticks instead of running as fast as possible.
    #[serde(default)]
    pub realtime: bool,
    #[serde(default)]
    pub network: NetworkConditions,
    #[serde(default)]
    pub settings: InterpolationSettings,
}

fn default_sample_rate() -> f64 {
    coherence_shared::config::DEFAULT_SAMPLE_RATE
}

fn default_tick_hz() -> u32 {
    60
}

fn default_duration() -> f64 {
    5.0
}

fn default_speed() -> f32 {
    2.0
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            tick_hz: default_tick_hz(),
            duration_secs: default_duration(),
            seed: 0,
            speed: default_speed(),
            pause: None,
            realtime: false,
            network: NetworkConditions::default(),
            settings: InterpolationSettings::default(),
        }
    }
}

impl ReplayConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Producer position at `time`; motion is frozen during the pause.
    pub fn position_at(&self, time: f64) -> Vec3 {
        let moving_time = match self.pause {
            Some(pause) if time >= pause.end => time - (pause.end - pause.start),
            Some(pause) if time >= pause.start => pause.start,
            _ => time,
        } as f32;
        Vec3::new(self.speed * moving_time, moving_time.sin(), 0.0)
    }
}

/// Summary of a finished replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub ticks: u64,
    pub samples_sent: usize,
    pub samples_delivered: usize,
    pub final_value: Vec3,
    pub final_delay: f64,
    pub final_network_latency: f64,
    pub measured_sample_interval: f64,
    /// Ticks the binding spent stopped.
    pub stopped_ticks: u64,
    /// Largest distance the displayed value moved within one tick.
    pub max_tick_movement: f32,
}

/// Runs a replay to completion.
pub async fn run(cfg: &ReplayConfig) -> anyhow::Result<ReplayReport> {
    let mut interp = BindingInterpolator::<Vec3>::new(cfg.settings, cfg.sample_rate)
        .context("create interpolator")?;
    let mut feed = SampleFeed::<Vec3>::new(cfg.network, cfg.sample_rate, cfg.seed);

    let tick_hz = cfg.tick_hz.max(1);
    let dt = 1.0 / tick_hz as f64;
    let total_ticks = (cfg.duration_secs.max(0.0) * tick_hz as f64).ceil() as u64;
    let mut interval = tokio::time::interval(Duration::from_secs_f64(dt));

    info!(
        interpolator = interp.interpolator_name(),
        sample_rate = cfg.sample_rate,
        tick_hz,
        ticks = total_ticks,
        "Starting replay"
    );

    let mut samples_sent = 0;
    let mut samples_delivered = 0;
    let mut stopped_ticks = 0;
    let mut max_tick_movement = 0.0_f32;
    let mut stop_sent = false;
    let mut value = Vec3::ZERO;

    for tick in 0..=total_ticks {
        if cfg.realtime {
            interval.tick().await;
        }
        let now = tick as f64 * dt;

        samples_sent += feed.produce(now, |time| match cfg.pause {
            Some(pause) if pause.contains(time) => {
                if stop_sent {
                    None
                } else {
                    stop_sent = true;
                    Some((cfg.position_at(time), true))
                }
            }
            _ => {
                stop_sent = false;
                Some((cfg.position_at(time), false))
            }
        });

        for sample in feed.drain_ready(now) {
            interp.append_sample(
                sample.value,
                sample.stopped,
                true,
                sample.sample_time,
                sample.arrival_time,
            );
            samples_delivered += 1;
        }

        let next = interp
            .perform_interpolation(value, now)
            .with_context(|| format!("interpolate at tick {tick}"))?;
        if tick > 0 {
            max_tick_movement = max_tick_movement.max(value.distance_sq(next).sqrt());
        }
        value = next;

        if interp.is_stopped() {
            stopped_ticks += 1;
        }

        if tick % tick_hz as u64 == 0 {
            info!(
                tick,
                x = value.x,
                y = value.y,
                delay = interp.delay(),
                latency = interp.network_latency(),
                interval = interp.measured_sample_interval(),
                stopped = interp.is_stopped(),
                "Replay"
            );
        } else {
            debug!(tick, x = value.x, buffered = interp.buffer().len(), "Tick");
        }
    }

    Ok(ReplayReport {
        ticks: total_ticks + 1,
        samples_sent,
        samples_delivered,
        final_value: value,
        final_delay: interp.delay(),
        final_network_latency: interp.network_latency(),
        measured_sample_interval: interp.measured_sample_interval(),
        stopped_ticks,
        max_tick_movement,
    })
}
