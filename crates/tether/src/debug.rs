use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sink for instrumentation samples. Never used for control flow.
pub trait DataLogger<T> {
    fn log(&mut self, value: T);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLogger;

impl<T> DataLogger<T> for NoOpLogger {
    fn log(&mut self, _value: T) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<T> {
    /// Seconds since the log was created.
    pub time: f64,
    pub value: T,
}

/// Keeps the samples logged during the last `window`.
#[derive(Debug, Clone)]
pub struct TimingLog<T = f64> {
    started: Instant,
    window: f64,
    entries: VecDeque<Entry<T>>,
}

impl<T> TimingLog<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            started: Instant::now(),
            window: window.as_secs_f64(),
            entries: VecDeque::new(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs_f64(self.window)
    }

    /// Records `value` as logged `time` seconds after creation. Times are
    /// expected to be non-decreasing.
    pub fn log_at(&mut self, time: f64, value: T) {
        self.entries.push_back(Entry { time, value });
        while let Some(front) = self.entries.front() {
            if time - front.time >= self.window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<T>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }
}

impl<T> DataLogger<T> for TimingLog<T> {
    fn log(&mut self, value: T) {
        let time = self.started.elapsed().as_secs_f64();
        self.log_at(time, value);
    }
}

impl TimingLog<f64> {
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: f64 = self.entries.iter().map(|entry| entry.value).sum();
        Some(total / self.entries.len() as f64)
    }

    pub fn max(&self) -> Option<f64> {
        self.entries.iter().map(|entry| entry.value).reduce(f64::max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs() * 1000.0
    }
}
