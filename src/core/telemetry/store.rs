//! Registry of named series, owned by the dashboard loop.

use std::time::{Duration, Instant};

use indexmap::IndexMap;

use super::series::Series;

/// Maps metric names to their bounded histories.
///
/// Iteration follows first-seen order so charts appear, and tests observe
/// series, in a stable order.
#[derive(Debug)]
pub struct SeriesStore {
    max_len: usize,
    sample_period: Duration,
    series: IndexMap<String, Series>,
}

/// What happened to a value handed to [`SeriesStore::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Stored,
    Throttled,
}

impl SeriesStore {
    pub fn new(max_len: usize, sample_period: Duration) -> Self {
        Self {
            max_len: max_len.max(1),
            sample_period,
            series: IndexMap::new(),
        }
    }

    /// Record `value` for `name` observed at `now`.
    ///
    /// An unseen name gets a zero-seeded series first; the throttle then runs
    /// against the seed like any other sample.
    pub fn record(&mut self, name: &str, value: f64, now: Instant) -> RecordOutcome {
        let max_len = self.max_len;
        let series = self.series.entry(name.to_string()).or_insert_with(|| {
            log::debug!("New series '{}'", name);
            Series::seeded(max_len, now)
        });

        if series.push_throttled(value, now, self.sample_period) {
            RecordOutcome::Stored
        } else {
            RecordOutcome::Throttled
        }
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    /// Series in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.series.iter().map(|(name, series)| (name.as_str(), series))
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn sample_period(&self) -> Duration {
        self.sample_period
    }
}
