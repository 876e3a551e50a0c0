use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// One observation of a named metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub timestamp: Instant,
}

impl Sample {
    pub fn new(value: f64, timestamp: Instant) -> Self {
        Self { value, timestamp }
    }
}

/// Bounded, time-ordered history of one metric.
///
/// A fresh series is filled with `capacity` zero samples stamped at creation
/// time, so it is never empty and plots start flat at zero instead of
/// needing a short-history special case.
#[derive(Debug, Clone)]
pub struct Series {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl Series {
    /// Create a zero-seeded series. `capacity` is clamped to at least 1.
    pub fn seeded(capacity: usize, now: Instant) -> Self {
        let capacity = capacity.max(1);
        let samples = std::iter::repeat(Sample::new(0.0, now))
            .take(capacity)
            .collect();

        Self { capacity, samples }
    }

    /// Append `value` unless the previous stored sample is younger than
    /// `sample_period`. Returns whether the value was stored.
    pub fn push_throttled(&mut self, value: f64, now: Instant, sample_period: Duration) -> bool {
        let since_last = now.saturating_duration_since(self.last().timestamp);
        if since_last < sample_period {
            return false;
        }

        self.samples.push_back(Sample::new(value, now));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        true
    }

    /// Most recent stored sample.
    pub fn last(&self) -> &Sample {
        // Seeding keeps at least one sample and pops only happen past capacity
        &self.samples[self.samples.len() - 1]
    }

    pub fn samples(&self) -> &VecDeque<Sample> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored values, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}
