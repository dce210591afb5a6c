//! Hover-path timing.
//!
//! Drag hover ticks fire on every pointer move, so they have a budget
//! ([`HOVER_TICK_BUDGET_MS`]). The timers here report ticks that go over it.
//!
//! ```ignore
//! fn hover(&mut self) {
//!     profile_scope!("hover");
//!     // ... collision + transfer ...
//! }
//! ```
//!
//! With the `profiling` feature, every scope is traced at `trace` level with
//! its nesting depth. Without it, only scopes over their threshold are logged.

use crate::constants::HOVER_TICK_BUDGET_MS;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Number of tick samples kept for the rolling average
const SAMPLE_COUNT: usize = 120;

/// Time a scope against the hover tick budget, or an explicit threshold.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::constants::HOVER_TICK_BUDGET_MS);
    };
    ($name:expr, $threshold_ms:expr) => {
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
    };
}

pub use profile_scope;

// ============================================================================
// Tick Statistics
// ============================================================================

/// Rolling statistics for hover ticks.
#[derive(Debug, Clone)]
pub struct TickStats {
    samples: VecDeque<f64>,
    sum_ms: f64,
    count: u64,
    over_budget: u64,
    max_ms: f64,
}

impl Default for TickStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(SAMPLE_COUNT),
            sum_ms: 0.0,
            count: 0,
            over_budget: 0,
            max_ms: 0.0,
        }
    }
}

impl TickStats {
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= SAMPLE_COUNT {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.max_ms = self.max_ms.max(ms);
        if ms > HOVER_TICK_BUDGET_MS {
            self.over_budget += 1;
        }
    }

    /// Average over the recent window.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }

    /// Share of all ticks that went over budget, in percent.
    pub fn over_budget_percentage(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.over_budget as f64 / self.count as f64) * 100.0
    }

    /// Log a summary when the average tick is over budget.
    pub fn log_summary_if_slow(&self) {
        let avg = self.average();
        if avg > HOVER_TICK_BUDGET_MS {
            warn!(
                avg_tick_ms = format!("{:.2}", avg),
                max_tick_ms = format!("{:.2}", self.max_ms),
                over_budget = format!("{:.1}%", self.over_budget_percentage()),
                "Hover ticks above budget"
            );
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// Logs the duration of a scope on drop.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
    #[cfg(feature = "profiling")]
    depth: usize,
}

#[cfg(feature = "profiling")]
thread_local! {
    static CURRENT_DEPTH: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        #[cfg(feature = "profiling")]
        let depth = CURRENT_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });

        Self {
            name,
            start: Instant::now(),
            threshold_ms,
            #[cfg(feature = "profiling")]
            depth,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        #[cfg(feature = "profiling")]
        {
            CURRENT_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            let indent = "  ".repeat(self.depth);
            trace!("{}[PERF] {}: {:.2}ms", indent, self.name, elapsed_ms);
        }

        if elapsed_ms > self.threshold_ms {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow operation"
            );
        }
    }
}

/// Run `f` and return its result with the elapsed milliseconds.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_secs_f64() * 1000.0)
}
