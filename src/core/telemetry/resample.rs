//! Time-window resampling with zero-order hold.
//!
//! Turns an irregular history into `point_count` evenly spaced values
//! covering `[now - window, now]`, ready to hand to a plot.

use std::time::{Duration, Instant};

use super::series::{Sample, Series};

/// Resample `series` over the trailing `window` ending at `now`.
///
/// The window is split into `point_count` buckets of equal width. A bucket
/// takes the value of the first sample lying strictly inside its open
/// interval; an empty bucket repeats the previous bucket's value. The
/// value carried into the first bucket comes from the last sample strictly
/// before the window, or `0.0` when there is none.
///
/// When the newest sample is older than the window the series is stale and
/// the result is `point_count` copies of its last value.
pub fn resample(series: &Series, window: Duration, point_count: usize, now: Instant) -> Vec<f64> {
    // Everything is measured as age before `now`, so a window reaching back
    // past the clock's origin still resamples.
    let age = |sample: &Sample| now.saturating_duration_since(sample.timestamp);

    let last = series.last();
    if age(last) > window {
        return vec![last.value; point_count];
    }

    if point_count == 0 {
        return Vec::new();
    }

    let samples = series.samples();
    let step = window / u32::try_from(point_count).unwrap_or(u32::MAX);

    let (mut cursor, mut carry) = match samples.iter().rposition(|s| age(s) > window) {
        Some(idx) => (idx, samples[idx].value),
        None => (0, 0.0),
    };

    let mut points = Vec::with_capacity(point_count);
    let mut step_start = window;

    for _ in 0..point_count {
        let step_end = step_start.saturating_sub(step);

        // Ages are non-increasing, so anything at or before this bucket's
        // start can never land in a later bucket either.
        while cursor < samples.len() && age(&samples[cursor]) >= step_start {
            cursor += 1;
        }

        if let Some(sample) = samples.get(cursor) {
            if age(sample) > step_end {
                carry = sample.value;
            }
        }

        points.push(carry);
        step_start = step_end;
    }

    points
}
