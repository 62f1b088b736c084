//! Network condition simulator for testing: latency, jitter and reordering
//! of binding samples.
//!
//! The feed is seeded, so a given configuration always produces the same
//! delivery schedule.

use coherence_shared::config::DEFAULT_SAMPLE_RATE;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Highest accepted send rate in samples per second.
pub const MAX_SAMPLE_RATE: f64 = 1000.0;

/// Delivery characteristics of the simulated link, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkConditions {
    /// Base one-way latency.
    #[serde(default)]
    pub latency: f64,
    /// Extra random delay in `[0, jitter)`.
    #[serde(default)]
    pub jitter: f64,
    /// Chance in `[0, 1]` that a sample is held back long enough to be reordered.
    #[serde(default)]
    pub out_of_order_chance: f64,
    /// Chance in `[0, 1]` that a sample is dropped.
    #[serde(default)]
    pub packet_loss: f64,
}

/// A sample as seen by the receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveredSample<T> {
    pub value: T,
    pub stopped: bool,
    /// Producer clock when the sample was taken.
    pub sample_time: f64,
    /// Receiver clock when the sample arrived.
    pub arrival_time: f64,
}

/// Produces samples at a fixed rate and delivers them through simulated conditions.
#[derive(Debug)]
pub struct SampleFeed<T> {
    conditions: NetworkConditions,
    send_interval: f64,
    next_send_time: f64,
    rng: StdRng,
    in_flight: Vec<DeliveredSample<T>>,
}

impl<T: Copy> SampleFeed<T> {
    /// Rates outside `(0, MAX_SAMPLE_RATE]` fall back to [`DEFAULT_SAMPLE_RATE`].
    pub fn new(conditions: NetworkConditions, sample_rate: f64, seed: u64) -> Self {
        let valid = sample_rate.is_finite() && sample_rate > 0.0 && sample_rate <= MAX_SAMPLE_RATE;
        let sample_rate = if valid {
            sample_rate
        } else {
            warn!(sample_rate, "Invalid sample rate, using default");
            DEFAULT_SAMPLE_RATE
        };

        Self {
            conditions,
            send_interval: 1.0 / sample_rate,
            next_send_time: 0.0,
            rng: StdRng::seed_from_u64(seed),
            in_flight: Vec::new(),
        }
    }

    pub fn conditions(&self) -> &NetworkConditions {
        &self.conditions
    }

    /// Samples still travelling.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Takes every sample due up to `now` from `source` and sends it.
    ///
    /// `source` returns `None` to skip a send slot, e.g. while paused.
    /// Returns how many samples were sent.
    pub fn produce(&mut self, now: f64, mut source: impl FnMut(f64) -> Option<(T, bool)>) -> usize {
        let mut sent = 0;
        while self.next_send_time <= now {
            let sample_time = self.next_send_time;
            self.next_send_time += self.send_interval;
            if let Some((value, stopped)) = source(sample_time) {
                self.send(value, stopped, sample_time);
                sent += 1;
            }
        }
        sent
    }

    /// Sends one sample taken at `sample_time`.
    pub fn send(&mut self, value: T, stopped: bool, sample_time: f64) {
        let conditions = self.conditions;
        if conditions.packet_loss > 0.0 && self.rng.gen::<f64>() < conditions.packet_loss {
            return;
        }

        let jitter = if conditions.jitter > 0.0 {
            self.rng.gen_range(0.0..conditions.jitter)
        } else {
            0.0
        };

        let held_back = if conditions.out_of_order_chance > 0.0
            && self.rng.gen::<f64>() < conditions.out_of_order_chance
        {
            self.rng.gen_range(self.send_interval..self.send_interval * 3.0)
        } else {
            0.0
        };

        self.in_flight.push(DeliveredSample {
            value,
            stopped,
            sample_time,
            arrival_time: sample_time + conditions.latency + jitter + held_back,
        });
    }

    /// Samples that arrived by `now`, in arrival order.
    pub fn drain_ready(&mut self, now: f64) -> Vec<DeliveredSample<T>> {
        let (mut ready, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|sample| sample.arrival_time <= now);
        self.in_flight = pending;
        ready.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));
        ready
    }
}
