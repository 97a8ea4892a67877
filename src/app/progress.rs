//! Progress reporting.

use std::time::Instant;

use log::info;

use crate::config::PROGRESS_LOG_EVERY;

/// Receives progress in completed windows. Purely observational.
pub trait ProgressReporter {
    /// Records `units` more completed windows.
    fn advance(&mut self, units: usize);
}

/// Logs window progress for one selector.
///
/// A line is logged every `PROGRESS_LOG_EVERY` windows and when the last
/// window completes.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    total: usize,
    done: usize,
    every: usize,
    start: Instant,
}

impl LogProgress {
    /// Logs every `PROGRESS_LOG_EVERY` windows.
    pub fn new(label: &str, total: usize) -> Self {
        Self::with_interval(label, total, PROGRESS_LOG_EVERY)
    }

    /// Like `new`, logging every `every` windows (at least one).
    pub fn with_interval(label: &str, total: usize, every: usize) -> Self {
        LogProgress {
            label: label.to_string(),
            total,
            done: 0,
            every: every.max(1),
            start: Instant::now(),
        }
    }

    /// Windows completed so far.
    pub fn done(&self) -> usize {
        self.done
    }

    fn should_log(&self, before: usize) -> bool {
        self.done >= self.total || self.done / self.every > before / self.every
    }
}

impl ProgressReporter for LogProgress {
    fn advance(&mut self, units: usize) {
        let before = self.done;
        self.done += units;
        if !self.should_log(before) {
            return;
        }

        let elapsed_secs = self.start.elapsed().as_secs_f64();
        let rate = if elapsed_secs > 0.0 {
            self.done as f64 / elapsed_secs
        } else {
            0.0
        };
        let percent = if self.total > 0 {
            self.done as f64 * 100.0 / self.total as f64
        } else {
            100.0
        };
        info!(
            "[{}] {}/{} windows ({:.1}%) in {:.2} seconds (~{:.2} windows/sec)",
            self.label, self.done, self.total, percent, elapsed_secs, rate
        );
    }
}
