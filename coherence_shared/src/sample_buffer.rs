//! Time-ordered ring buffer of binding samples.
//!
//! # Overview
//! The buffer holds the recent history of one binding, oldest first. Samples
//! are strictly increasing in time; a sample that arrives with a timestamp at
//! or before the newest one replaces the newest value in place instead of
//! being appended.
//!
//! The backing ring grows in steps of the initial capacity when full and never
//! shrinks. On growth the logical order is unwrapped so the oldest sample lands
//! at physical index 0.

use tracing::{debug, warn};

use crate::sample::Sample;

/// Default ring size, and the step the ring grows by.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Number of newest samples inspected when measuring the send interval.
pub const MAX_SAMPLES_TO_MEASURE: usize = 5;

/// The two samples that bracket a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacentSamples<T> {
    pub first: Sample<T>,
    pub second: Sample<T>,
    /// Logical index of `first`.
    pub index: usize,
    /// Whether this is the newest bracket in the buffer.
    pub is_last: bool,
}

/// Growable circular buffer of samples ordered by time.
#[derive(Debug, Clone)]
pub struct SampleBuffer<T> {
    slots: Vec<Option<Sample<T>>>,
    /// Physical slot the next pushed sample goes to.
    head: usize,
    /// Physical slot of the oldest sample.
    tail: usize,
    count: usize,
    initial_capacity: usize,
}

impl<T: Copy> Default for SampleBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY)
    }
}

impl<T: Copy> SampleBuffer<T> {
    /// Creates an empty buffer. An initial capacity of 0 is treated as 1.
    pub fn new(initial_capacity: usize) -> Self {
        let initial_capacity = initial_capacity.max(1);
        Self {
            slots: empty_slots(initial_capacity),
            head: 0,
            tail: 0,
            count: 0,
            initial_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Sample at logical `index`, 0 being the oldest.
    pub fn get(&self, index: usize) -> Option<&Sample<T>> {
        if index >= self.count {
            return None;
        }
        self.slots[self.physical(index)].as_ref()
    }

    pub fn first(&self) -> Option<&Sample<T>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&Sample<T>> {
        self.count.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Appends `sample` as the newest entry.
    ///
    /// A sample that is not strictly newer than the current newest one
    /// overwrites its value and stopped flag, keeping the original time.
    pub fn push_front(&mut self, sample: Sample<T>) {
        if let Some(last) = self.last().copied() {
            if sample.time <= last.time {
                debug!(
                    sample_time = sample.time,
                    last_time = last.time,
                    "Out-of-order sample, overwriting newest value"
                );
                self.set_at(
                    self.count - 1,
                    Sample::new(sample.value, sample.stopped, last.time),
                );
                return;
            }
        }

        if self.count == self.capacity() {
            self.grow();
        }

        let head = self.head;
        self.slots[head] = Some(sample);
        self.head = (head + 1) % self.capacity();
        self.count += 1;
    }

    /// Removes and returns the oldest sample.
    pub fn pop_back(&mut self) -> Option<Sample<T>> {
        if self.count == 0 {
            return None;
        }
        let sample = self.slots[self.tail].take();
        self.tail = (self.tail + 1) % self.capacity();
        self.count -= 1;
        sample
    }

    /// Overwrites the newest sample unconditionally, or pushes into an empty buffer.
    pub fn set_last(&mut self, sample: Sample<T>) {
        match self.count {
            0 => self.push_front(sample),
            n => {
                self.set_at(n - 1, sample);
            }
        }
    }

    /// Replaces the sample at logical `index`. Returns false when out of range.
    ///
    /// The caller is responsible for keeping times ordered.
    pub fn set_at(&mut self, index: usize, sample: Sample<T>) -> bool {
        if index >= self.count {
            return false;
        }
        let slot = self.physical(index);
        self.slots[slot] = Some(sample);
        true
    }

    /// Drops every sample but keeps the allocated capacity.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Finds the pair of samples bracketing `time`.
    ///
    /// Returns `None` when the buffer is empty. With a single sample, or when
    /// `time` precedes the oldest sample, both ends of the bracket are the same
    /// sample. At or past the newest sample the newest bracket is returned so
    /// callers can extrapolate.
    pub fn get_adjacent_samples(&self, time: f64) -> Option<AdjacentSamples<T>> {
        match self.count {
            0 => {
                warn!(time, "Adjacent samples requested from an empty buffer");
                None
            }
            1 => {
                let only = self.at(0);
                Some(AdjacentSamples {
                    first: only,
                    second: only,
                    index: 0,
                    is_last: true,
                })
            }
            count => {
                let oldest = self.at(0);
                if time < oldest.time {
                    return Some(AdjacentSamples {
                        first: oldest,
                        second: oldest,
                        index: 0,
                        is_last: false,
                    });
                }

                let index = (0..count - 1)
                    .find(|&i| time < self.at(i + 1).time)
                    .unwrap_or(count - 2);

                Some(AdjacentSamples {
                    first: self.at(index),
                    second: self.at(index + 1),
                    index,
                    is_last: index == count - 2,
                })
            }
        }
    }

    /// Prunes history that playback at `time` no longer needs.
    ///
    /// With `samples_to_stay_behind == 0` only the newest sample survives.
    /// Otherwise at least `samples_to_stay_behind + 1` samples are kept, and
    /// the oldest is dropped only while the sample at index
    /// `samples_to_stay_behind` is not in the future of `time`.
    pub fn remove_outdated_samples(&mut self, time: f64, samples_to_stay_behind: usize) {
        if samples_to_stay_behind == 0 {
            while self.count > 1 {
                self.pop_back();
            }
            return;
        }

        while self.count > samples_to_stay_behind + 1 {
            match self.get(samples_to_stay_behind) {
                Some(sample) if sample.time <= time => {
                    self.pop_back();
                }
                _ => break,
            }
        }
    }

    /// Largest gap between consecutive samples among the newest
    /// [`MAX_SAMPLES_TO_MEASURE`], or `None` when no usable pair exists.
    ///
    /// Scanning stops at a stopped sample, since the gap after a pause is not
    /// a send interval, and at a non-positive or non-finite gap.
    pub fn try_measure_max_sample_interval(&self) -> Option<f64> {
        let oldest = self.count.saturating_sub(MAX_SAMPLES_TO_MEASURE);
        let mut max_interval: Option<f64> = None;

        for i in (oldest + 1..self.count).rev() {
            let previous = self.at(i - 1);
            let next = self.at(i);
            if previous.stopped {
                break;
            }

            let interval = next.time - previous.time;
            if !interval.is_finite() || interval <= 0.0 {
                break;
            }

            max_interval = Some(max_interval.map_or(interval, |max| max.max(interval)));
        }

        max_interval
    }

    /// Iterates samples from oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            index: 0,
        }
    }

    fn physical(&self, index: usize) -> usize {
        (self.tail + index) % self.capacity()
    }

    fn at(&self, index: usize) -> Sample<T> {
        self.slots[self.physical(index)].expect("ring slot within count is occupied")
    }

    fn grow(&mut self) {
        let step = self.initial_capacity;
        let new_capacity = (self.count + 1 + step - 1) / step * step;

        let mut slots = empty_slots(new_capacity);
        for (i, slot) in slots.iter_mut().enumerate().take(self.count) {
            let source = self.physical(i);
            *slot = self.slots[source].take();
        }

        debug!(
            from = self.capacity(),
            to = new_capacity,
            "Growing sample buffer"
        );

        self.slots = slots;
        self.tail = 0;
        self.head = self.count % new_capacity;
    }
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<Sample<T>>> {
    (0..capacity).map(|_| None).collect()
}

/// Oldest-to-newest iterator over a [`SampleBuffer`].
pub struct Iter<'a, T> {
    buffer: &'a SampleBuffer<T>,
    index: usize,
}

impl<'a, T: Copy> Iterator for Iter<'a, T> {
    type Item = &'a Sample<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.buffer.get(self.index)?;
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Copy> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T: Copy> IntoIterator for &'a SampleBuffer<T> {
    type Item = &'a Sample<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
