//! Interpolation.
//!
//! The authority sends discrete samples of each binding at its own rate; they
//! arrive late, jittered and sometimes out of order. The client renders at its
//! own rate and plays the samples back with a delay that adapts to the
//! measured send interval and network latency.
//!
//! Per binding the interpolator is:
//! - empty until the first sample arrives,
//! - buffering while samples keep coming,
//! - stopped once playback caught up with a sample marked `stopped`, or ran
//!   too far past the newest sample; only a new sample resumes it,
//! - reset when a sample jumps farther than the teleport distance.

use coherence_shared::{
    config::{InterpolationSettings, DEFAULT_SAMPLE_RATE},
    error::InterpolationError,
    interpolator::{ensure_supported, Interpolator},
    sample::{Sample, SimulationFrame, SIMULATION_FRAMES_PER_SECOND},
    sample_buffer::{AdjacentSamples, SampleBuffer, DEFAULT_INITIAL_CAPACITY},
    smoothing::{check_delta_time, smooth_damp_f64},
    value::BindingValue,
};
use tracing::{debug, warn};

/// How far past the newest bracket, in brackets, playback may extrapolate.
pub const MAX_OVERSHOOT_ALLOWED: f64 = 1.5;

/// Smoothing time of the delay control loop, in seconds.
pub const DELAY_SMOOTH_TIME: f64 = 0.5;

/// The delay changes by at most this many seconds per second, so playback
/// time never runs backwards.
pub const DELAY_MAX_SPEED: f64 = 1.0;

/// Outcome of one interpolation query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationResult<T> {
    /// Samples `v0..v3`; the value lies between `samples[1]` and `samples[2]`.
    pub samples: [Sample<T>; 4],
    /// Blend fraction between `samples[1]` and `samples[2]`.
    pub t: f64,
    pub is_stopped: bool,
    pub value: T,
    pub delay: f64,
    pub network_latency: f64,
    pub measured_sample_interval: f64,
}

/// Turns a stream of samples for one binding into a per-tick value.
pub struct BindingInterpolator<T: BindingValue> {
    settings: InterpolationSettings,
    interpolator: Box<dyn Interpolator<T>>,
    buffer: SampleBuffer<T>,
    sample_rate: f64,

    time: f64,
    delay: f64,
    delay_velocity: f64,
    last_delay_smooth_time: Option<f64>,
    network_latency: f64,
    measured_sample_interval: f64,
    is_stopped: bool,
    smooth_velocity: T::Velocity,
}

impl<T: BindingValue> BindingInterpolator<T> {
    /// Creates an interpolator using the strategy named in `settings`.
    ///
    /// `sample_rate` is the producer's nominal send rate in samples per second.
    pub fn new(settings: InterpolationSettings, sample_rate: f64) -> Result<Self, InterpolationError> {
        let interpolator = settings.interpolator.build::<T>()?;
        Self::with_interpolator(settings, sample_rate, interpolator)
    }

    /// Creates an interpolator with an injected strategy.
    pub fn with_interpolator(
        settings: InterpolationSettings,
        sample_rate: f64,
        interpolator: Box<dyn Interpolator<T>>,
    ) -> Result<Self, InterpolationError> {
        ensure_supported(interpolator.as_ref())?;

        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            warn!(sample_rate, "Invalid sample rate, using default");
            DEFAULT_SAMPLE_RATE
        };

        let mut interp = Self {
            settings,
            interpolator,
            buffer: SampleBuffer::new(DEFAULT_INITIAL_CAPACITY),
            sample_rate,
            time: 0.0,
            delay: 0.0,
            delay_velocity: 0.0,
            last_delay_smooth_time: None,
            network_latency: 0.0,
            measured_sample_interval: 1.0 / sample_rate,
            is_stopped: false,
            smooth_velocity: T::Velocity::default(),
        };
        interp.delay = interp.target_delay();
        Ok(interp)
    }

    pub fn settings(&self) -> &InterpolationSettings {
        &self.settings
    }

    pub fn interpolator_name(&self) -> &'static str {
        self.interpolator.name()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn buffer(&self) -> &SampleBuffer<T> {
        &self.buffer
    }

    /// Delayed playback time of the last step.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn network_latency(&self) -> f64 {
        self.network_latency
    }

    pub fn measured_sample_interval(&self) -> f64 {
        self.measured_sample_interval
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    /// Delay the control loop steers towards.
    pub fn target_delay(&self) -> f64 {
        let latency = &self.settings.latency_settings;
        self.interpolator.number_of_samples_to_stay_behind() as f64 * self.measured_sample_interval
            + self.network_latency * latency.network_latency_factor
            + latency.additional_latency
            + 1.0 / SIMULATION_FRAMES_PER_SECOND
    }

    /// Clears buffered samples and derived timing state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.time = 0.0;
        self.delay_velocity = 0.0;
        self.last_delay_smooth_time = None;
        self.smooth_velocity = T::Velocity::default();
        self.measured_sample_interval = 1.0 / self.sample_rate;
        self.is_stopped = false;
    }

    /// Whether `value` jumped farther than the teleport distance from the newest sample.
    pub fn is_beyond_teleport_distance(&self, value: &T) -> bool {
        let max_distance = self.settings.max_distance;
        if max_distance <= 0.0 {
            return false;
        }
        self.buffer
            .last()
            .is_some_and(|last| T::is_beyond_distance(&last.value, value, max_distance))
    }

    /// Ingests a sample received from the network.
    ///
    /// `sample_time_valid` is false for samples replayed from a cache; those
    /// are buffered but not used to measure latency. `local_time` is the
    /// receiver's clock at arrival.
    pub fn append_sample(
        &mut self,
        value: T,
        stopped: bool,
        sample_time_valid: bool,
        sample_time: f64,
        local_time: f64,
    ) {
        let sample = Sample::new(value, stopped, sample_time);

        if self.settings.is_interpolation_none() {
            self.buffer.set_last(sample);
            return;
        }

        if self.is_beyond_teleport_distance(&value) {
            debug!(
                binding_type = T::TYPE_NAME,
                max_distance = self.settings.max_distance,
                "Teleport detected, resetting interpolation"
            );
            self.reset();
        }

        if let Some(last) = self.buffer.last().copied() {
            if sample_time_valid && sample_time > last.time {
                self.network_latency = (local_time - sample_time).max(0.0);

                // Nothing is moving while stopped, so a longer delay can apply at once.
                let target_delay = self.target_delay();
                if self.is_stopped && target_delay > self.delay {
                    self.delay = target_delay;
                    self.delay_velocity = 0.0;
                }
            }

            if self.is_stopped {
                self.resume_from(last, sample_time);
            }
        }

        self.buffer.push_front(sample);
        if let Some(interval) = self.buffer.try_measure_max_sample_interval() {
            self.measured_sample_interval = interval;
        }
        self.is_stopped = false;
    }

    /// [`BindingInterpolator::append_sample`] with simulation frame timestamps.
    ///
    /// An invalid sample frame falls back to the local frame for ordering.
    pub fn append_sample_at_frame(
        &mut self,
        value: T,
        stopped: bool,
        sample_frame: SimulationFrame,
        local_frame: SimulationFrame,
    ) {
        let local_time = local_frame.to_time();
        let (valid, sample_time) = if sample_frame.is_valid() {
            (true, sample_frame.to_time())
        } else {
            (false, local_time)
        };
        self.append_sample(value, stopped, valid, sample_time, local_time);
    }

    /// Rewrites the stopped sample into a virtual predecessor of a sample at
    /// `sample_time`, one measured interval earlier, so playback resumes with
    /// a regular bracket instead of crossing the whole pause.
    ///
    /// Only the stopped sample survives, so the virtual time may move it
    /// backwards, even before its original time.
    fn resume_from(&mut self, last: Sample<T>, sample_time: f64) {
        while self.buffer.len() > 1 {
            self.buffer.pop_back();
        }

        let virtual_time = sample_time - self.measured_sample_interval;
        debug!(
            stopped_at = last.time,
            virtual_time,
            sample_time,
            "Resuming stopped binding"
        );
        self.buffer
            .set_last(Sample::new(last.value, false, virtual_time));
    }

    /// Returns the value to display at local `time`.
    ///
    /// With no samples `current` is returned unchanged. Fails only when `time`
    /// goes backwards.
    pub fn perform_interpolation(&mut self, current: T, time: f64) -> Result<T, InterpolationError> {
        if self.buffer.is_empty() {
            return Ok(current);
        }

        let delta_time = self.step(time)?;
        let Some(result) = self.get_value_at(self.time) else {
            return Ok(current);
        };
        self.is_stopped = result.is_stopped;

        let smoothing = self.settings.smoothing;
        if self.buffer.len() > 1 && smoothing.is_enabled() {
            if let Some(smoothed) = T::smooth(
                current,
                result.value,
                &mut self.smooth_velocity,
                smoothing.smooth_time,
                smoothing.max_speed,
                delta_time as f32,
            ) {
                return Ok(smoothed);
            }
        }

        Ok(result.value)
    }

    /// Advances the delay control loop to local `time` and moves playback time.
    ///
    /// Returns the elapsed time since the previous step, 0 for the first one.
    pub fn step(&mut self, time: f64) -> Result<f64, InterpolationError> {
        let delta_time = match self.last_delay_smooth_time {
            Some(last) => check_delta_time(time - last)?,
            None => 0.0,
        };
        self.last_delay_smooth_time = Some(time);

        let target_delay = self.target_delay();
        self.delay = smooth_damp_f64(
            self.delay,
            target_delay,
            &mut self.delay_velocity,
            DELAY_SMOOTH_TIME,
            DELAY_MAX_SPEED,
            delta_time,
        );

        self.time = time - self.delay;
        self.buffer.remove_outdated_samples(
            self.time,
            self.interpolator.number_of_samples_to_stay_behind(),
        );

        Ok(delta_time)
    }

    /// Blends buffered samples at playback `time`. `None` when empty.
    pub fn get_value_at(&self, time: f64) -> Option<InterpolationResult<T>> {
        let adjacent = self.buffer.get_adjacent_samples(time)?;
        let (t, is_stopped) = interpolation_percentage(&adjacent, time);

        let index = adjacent.index;
        let v1 = adjacent.first;
        let v2 = adjacent.second;
        let v0 = index
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .copied()
            .unwrap_or(v1);
        let v3 = self.buffer.get(index + 2).copied().unwrap_or(v2);

        let value = if self.buffer.len() == 1 {
            v1.value
        } else {
            self.interpolator
                .interpolate(v0.value, v1.value, v2.value, v3.value, t)
        };

        Some(InterpolationResult {
            samples: [v0, v1, v2, v3],
            t,
            is_stopped,
            value,
            delay: self.delay,
            network_latency: self.network_latency,
            measured_sample_interval: self.measured_sample_interval,
        })
    }

    /// Blend fraction at playback `time` and whether playback has stopped.
    ///
    /// Returns `(-1.0, true)` when no samples are buffered.
    pub fn calculate_interpolation_percentage(&self, time: f64) -> (f64, bool) {
        match self.buffer.get_adjacent_samples(time) {
            Some(adjacent) => interpolation_percentage(&adjacent, time),
            None => (-1.0, true),
        }
    }
}

fn interpolation_percentage<T>(adjacent: &AdjacentSamples<T>, time: f64) -> (f64, bool) {
    let span = adjacent.second.time - adjacent.first.time;
    if span == 0.0 {
        return (0.0, adjacent.is_last);
    }

    let mut t = (time - adjacent.first.time) / span;
    if adjacent.second.stopped {
        t = t.min(1.0);
    }

    let mut is_stopped = adjacent.second.stopped && adjacent.is_last && t == 1.0;

    // The producer went silent without a stop marker; stop extrapolating.
    if t > 1.0 + MAX_OVERSHOOT_ALLOWED {
        t = 1.0;
        is_stopped = true;
    }

    (t, is_stopped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coherence_shared::{
        config::InterpolationSettings,
        interpolator::{InterpolatorKind, LinearInterpolation},
        math::Vec3,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn linear() -> BindingInterpolator<f32> {
        BindingInterpolator::new(InterpolationSettings::default(), 20.0).unwrap()
    }

    /// Appends samples with no usable timestamps so latency stays 0.
    fn with_samples(samples: &[(f32, bool, f64)]) -> BindingInterpolator<f32> {
        let mut interp = linear();
        for &(value, stopped, time) in samples {
            interp.append_sample(value, stopped, false, time, time);
        }
        interp
    }

    #[test]
    fn empty_buffer_passes_current_value_through() {
        let mut interp = linear();
        assert_eq!(interp.perform_interpolation(7.0, 1.0), Ok(7.0));
        assert!(interp.get_value_at(1.0).is_none());
        assert_eq!(interp.calculate_interpolation_percentage(1.0), (-1.0, true));
    }

    #[test]
    fn single_sample_is_returned_verbatim() {
        let settings = InterpolationSettings::default().with_smoothing(0.2, f32::MAX);
        let mut interp = BindingInterpolator::new(settings, 20.0).unwrap();
        interp.append_sample(3.5_f32, false, true, 1.0, 1.1);

        assert_eq!(interp.perform_interpolation(0.0, 2.0), Ok(3.5));
        assert_eq!(interp.perform_interpolation(-4.0, 2.5), Ok(3.5));
    }

    #[test]
    fn percentage_between_samples() {
        let interp = with_samples(&[(0.0, false, 0.0), (1.0, false, 0.1), (2.0, false, 0.2)]);

        let (t, stopped) = interp.calculate_interpolation_percentage(0.15);
        assert!((t - 0.5).abs() < 1e-6);
        assert!(!stopped);

        let result = interp.get_value_at(0.15).unwrap();
        assert!((result.value - 1.5).abs() < 1e-5);
        assert_eq!(result.samples[0].time, 0.0);
        assert_eq!(result.samples[1].time, 0.1);
        assert_eq!(result.samples[2].time, 0.2);
        assert_eq!(result.samples[3].time, 0.2);
    }

    #[test]
    fn single_stopped_sample_is_stopped() {
        let interp = with_samples(&[(5.0, true, 1.0)]);
        assert_eq!(interp.calculate_interpolation_percentage(1.0), (0.0, true));
    }

    #[test]
    fn stopped_sample_clamps_and_stops_at_end() {
        let interp = with_samples(&[(0.0, false, 0.0), (1.0, true, 0.1)]);

        let (t, stopped) = interp.calculate_interpolation_percentage(0.05);
        assert!((t - 0.5).abs() < 1e-9);
        assert!(!stopped);

        assert_eq!(interp.calculate_interpolation_percentage(0.5), (1.0, true));
    }

    #[test]
    fn overshoot_is_clamped() {
        let interp = with_samples(&[(0.0, false, 0.0), (1.0, false, 0.1)]);

        let (t, stopped) = interp.calculate_interpolation_percentage(0.2);
        assert!((t - 2.0).abs() < 1e-9);
        assert!(!stopped);

        assert_eq!(interp.calculate_interpolation_percentage(0.26), (1.0, true));
    }

    #[test]
    fn latency_is_measured_from_valid_newer_samples() {
        let mut interp = linear();
        interp.append_sample(0.0, false, true, 1.0, 1.2);
        assert_eq!(interp.network_latency(), 0.0);

        interp.append_sample(1.0, false, true, 1.1, 1.35);
        assert!(approx(interp.network_latency(), 0.25));

        interp.append_sample(2.0, false, false, 1.2, 2.0);
        assert!(approx(interp.network_latency(), 0.25));

        interp.append_sample(3.0, false, true, 1.3, 1.2);
        assert_eq!(interp.network_latency(), 0.0);
    }

    #[test]
    fn target_delay_formula() {
        let mut settings = InterpolationSettings::default();
        settings.latency_settings.network_latency_factor = 1.1;
        settings.latency_settings.additional_latency = 0.02;

        let mut interp = BindingInterpolator::<f32>::new(settings, 10.0).unwrap();
        interp.append_sample(0.0, false, true, 1.0, 1.0);
        interp.append_sample(1.0, false, true, 1.1, 1.35);

        let expected = 1.0 * 0.1 + 0.25 * 1.1 + 0.02 + 1.0 / 60.0;
        assert!(approx(interp.target_delay(), expected));
    }

    #[test]
    fn delay_changes_at_most_one_second_per_second() {
        let mut interp = linear();
        interp.append_sample(0.0, false, true, 0.0, 0.0);
        interp.append_sample(1.0, false, true, 0.05, 3.0);
        assert!(interp.target_delay() > 3.0);

        interp.step(3.0).unwrap();
        let mut previous = interp.delay();
        for i in 1..=10 {
            interp.step(3.0 + i as f64 * 0.1).unwrap();
            let change = interp.delay() - previous;
            assert!(change > 0.0 && change <= 0.1 + 1e-9, "delay moved {change}");
            previous = interp.delay();
        }
    }

    #[test]
    fn negative_delta_time_is_an_error() {
        let mut interp = with_samples(&[(0.0, false, 0.0), (1.0, false, 0.1)]);
        interp.perform_interpolation(0.0, 1.0).unwrap();
        assert_eq!(
            interp.perform_interpolation(0.0, 0.5),
            Err(InterpolationError::NegativeDeltaTime { delta: -0.5 })
        );
    }

    #[test]
    fn teleport_resets_buffer_and_interval() {
        let settings = InterpolationSettings::default().with_max_distance(1.0);
        let mut interp = BindingInterpolator::new(settings, 20.0).unwrap();
        interp.append_sample(0.0_f32, false, false, 0.0, 0.0);
        interp.append_sample(0.5, false, false, 0.1, 0.1);
        assert!(approx(interp.measured_sample_interval(), 0.1));

        assert!(interp.is_beyond_teleport_distance(&10.0));
        interp.append_sample(10.0, false, false, 0.2, 0.2);
        assert_eq!(interp.buffer().len(), 1);
        assert_eq!(interp.buffer().last().map(|s| s.value), Some(10.0));
        assert!(approx(interp.measured_sample_interval(), 1.0 / 20.0));
    }

    #[test]
    fn teleport_detection_disabled_by_zero_distance() {
        let mut interp = with_samples(&[(0.0, false, 0.0)]);
        assert!(!interp.is_beyond_teleport_distance(&1000.0));
        interp.append_sample(1000.0, false, false, 0.1, 0.1);
        assert_eq!(interp.buffer().len(), 2);
    }

    #[test]
    fn stop_then_resume_bridges_with_measured_interval() {
        let mut interp = linear();
        interp.append_sample(0.0, false, true, 0.0, 0.0);
        interp.append_sample(1.0, true, true, 0.1, 0.1);

        assert_eq!(interp.perform_interpolation(0.0, 1.0), Ok(1.0));
        assert!(interp.is_stopped());
        let delay_while_stopped = interp.delay();

        interp.append_sample(2.0, false, true, 5.0, 5.0);
        assert!(!interp.is_stopped());
        assert!(interp.delay() >= delay_while_stopped);

        let samples: Vec<_> = interp.buffer().iter().copied().collect();
        assert_eq!(samples.len(), 2);
        assert!(approx(samples[0].time, 4.9));
        assert_eq!(samples[0].value, 1.0);
        assert!(!samples[0].stopped);
        assert_eq!(samples[1], Sample::new(2.0, false, 5.0));
        assert!(approx(interp.measured_sample_interval(), 0.1));

        let value = interp.perform_interpolation(1.0, 5.05).unwrap();
        assert!(value > 1.0 && value < 2.0, "value {value}");
        assert!(!interp.is_stopped());
    }

    /// Samples at 0.0, 0.05 and a stopped one at 0.1, played until stopped.
    fn drained_to_stop() -> BindingInterpolator<f32> {
        let mut interp = linear();
        interp.append_sample(0.0, false, true, 0.0, 0.0);
        interp.append_sample(1.0, false, true, 0.05, 0.05);
        interp.append_sample(2.0, true, true, 0.1, 0.1);
        interp.perform_interpolation(0.0, 1.0).unwrap();
        assert!(interp.is_stopped());
        interp
    }

    #[test]
    fn quick_resume_moves_stopped_sample_back_one_interval() {
        let mut interp = drained_to_stop();
        assert!(approx(interp.measured_sample_interval(), 0.05));

        interp.append_sample(3.0, false, true, 0.12, 0.12);

        let samples: Vec<_> = interp.buffer().iter().copied().collect();
        assert_eq!(samples.len(), 2);
        assert!(approx(samples[0].time, 0.07), "virtual at {}", samples[0].time);
        assert_eq!(samples[0].value, 2.0);
        assert!(!samples[0].stopped);
        assert_eq!(samples[1], Sample::new(3.0, false, 0.12));
    }

    #[test]
    fn late_sample_while_stopped_follows_virtual_predecessor() {
        let mut interp = drained_to_stop();

        interp.append_sample(9.0, false, true, 0.08, 0.08);

        let samples: Vec<_> = interp.buffer().iter().copied().collect();
        assert_eq!(samples.len(), 2);
        assert!(approx(samples[0].time, 0.03));
        assert_eq!(samples[0].value, 2.0);
        assert_eq!(samples[1], Sample::new(9.0, false, 0.08));
        assert!(!interp.is_stopped());
    }

    #[test]
    fn delay_snaps_to_larger_target_while_stopped() {
        let mut interp = drained_to_stop();
        let delay_while_stopped = interp.delay();

        interp.append_sample(3.0, false, true, 5.0, 5.3);

        assert!(approx(interp.network_latency(), 0.3));
        assert!(interp.target_delay() > delay_while_stopped);
        assert!((interp.delay() - interp.target_delay()).abs() < 1e-6);
    }

    #[test]
    fn delay_is_eased_while_moving() {
        let mut interp = linear();
        interp.append_sample(0.0, false, true, 0.0, 0.0);
        interp.append_sample(1.0, false, true, 0.05, 0.05);
        interp.perform_interpolation(0.0, 0.1).unwrap();
        assert!(!interp.is_stopped());
        let delay = interp.delay();

        interp.append_sample(2.0, false, true, 0.1, 0.4);

        assert!(approx(interp.network_latency(), 0.3));
        assert!(interp.target_delay() > delay);
        assert_eq!(interp.delay(), delay);
    }

    #[test]
    fn pass_through_keeps_only_newest_sample() {
        let settings = InterpolationSettings::default().with_interpolator(InterpolatorKind::None);
        let mut interp = BindingInterpolator::new(settings, 20.0).unwrap();
        interp.append_sample(Vec3::new(1.0, 0.0, 0.0), false, true, 0.0, 0.0);
        interp.append_sample(Vec3::new(2.0, 0.0, 0.0), false, true, 0.1, 0.5);
        interp.append_sample(Vec3::new(3.0, 0.0, 0.0), false, true, 0.05, 0.6);

        assert_eq!(interp.buffer().len(), 1);
        assert_eq!(interp.network_latency(), 0.0);
        assert_eq!(
            interp.perform_interpolation(Vec3::ZERO, 1.0),
            Ok(Vec3::new(3.0, 0.0, 0.0))
        );
    }

    #[test]
    fn smoothing_trails_the_interpolated_value() {
        let settings = InterpolationSettings::default().with_smoothing(0.1, f32::MAX);
        let mut interp = BindingInterpolator::new(settings, 20.0).unwrap();
        interp.append_sample(0.0_f32, false, false, 0.0, 0.0);
        interp.append_sample(10.0, false, false, 1.0, 1.0);

        assert_eq!(interp.perform_interpolation(0.0, 0.5), Ok(0.0));

        let smoothed = interp.perform_interpolation(0.0, 0.6).unwrap();
        let raw = interp.get_value_at(interp.time()).unwrap().value;
        assert!(smoothed > 0.0 && smoothed < raw, "smoothed {smoothed}, raw {raw}");
    }

    #[test]
    fn frame_timestamps_are_converted() {
        let mut interp = linear();
        interp.append_sample_at_frame(0.0, false, SimulationFrame(0), SimulationFrame(6));
        interp.append_sample_at_frame(1.0, false, SimulationFrame(6), SimulationFrame(18));

        assert!(approx(interp.network_latency(), 0.2));
        assert!(approx(interp.measured_sample_interval(), 0.1));

        interp.append_sample_at_frame(2.0, false, SimulationFrame::INVALID, SimulationFrame(30));
        assert_eq!(interp.buffer().len(), 3);
        assert!(approx(interp.buffer().last().unwrap().time, 0.5));
        assert!(approx(interp.network_latency(), 0.2));
    }

    #[test]
    fn unsupported_strategy_fails_at_construction() {
        let settings = InterpolationSettings::default().with_interpolator(InterpolatorKind::Spline);
        let err = BindingInterpolator::<i32>::new(settings, 20.0).err();
        assert_eq!(
            err,
            Some(InterpolationError::UnsupportedType {
                interpolator: "spline",
                type_name: "i32",
            })
        );
    }

    struct ScalarOnly;

    impl Interpolator<Vec3> for ScalarOnly {
        fn name(&self) -> &'static str {
            "scalar-only"
        }

        fn number_of_samples_to_stay_behind(&self) -> usize {
            1
        }

        fn supports(&self) -> bool {
            false
        }

        fn interpolate(&self, _v0: Vec3, v1: Vec3, _v2: Vec3, _v3: Vec3, _t: f64) -> Vec3 {
            v1
        }
    }

    #[test]
    fn injected_strategies_are_checked() {
        let settings = InterpolationSettings::default();
        let rejected =
            BindingInterpolator::<Vec3>::with_interpolator(settings, 20.0, Box::new(ScalarOnly));
        assert!(rejected.is_err());

        let interp = BindingInterpolator::<Vec3>::with_interpolator(
            settings,
            20.0,
            Box::new(LinearInterpolation::new()),
        )
        .unwrap();
        assert_eq!(interp.interpolator_name(), "linear");
    }

    #[test]
    fn invalid_sample_rate_falls_back_to_default() {
        let interp = BindingInterpolator::<f32>::new(InterpolationSettings::default(), 0.0).unwrap();
        assert_eq!(interp.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert!(approx(interp.measured_sample_interval(), 1.0 / DEFAULT_SAMPLE_RATE));
    }

    #[test]
    fn reset_clears_samples_and_timing() {
        let mut interp = with_samples(&[(0.0, false, 0.0), (1.0, false, 0.2)]);
        interp.perform_interpolation(0.0, 0.5).unwrap();

        interp.reset();
        assert!(interp.buffer().is_empty());
        assert_eq!(interp.time(), 0.0);
        assert!(!interp.is_stopped());
        assert!(approx(interp.measured_sample_interval(), 0.05));

        // The clock restarts after a reset, earlier times are accepted again.
        interp.append_sample(3.0, false, false, 0.0, 0.0);
        assert_eq!(interp.perform_interpolation(0.0, 0.1), Ok(3.0));
    }
}
