use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use super::{SystemClock, TimeSource};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-clock-anchored time source that never moves backward.
///
/// The Unix time is sampled once at construction; afterwards a background
/// thread advances a shared counter from a monotonic [`Instant`]. NTP steps or
/// manual clock changes after startup are therefore ignored, at the price of
/// slowly drifting from the system clock on long-lived processes.
///
/// Clones share the same ticker. The thread exits once the last clone is
/// dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    anchor: u64, // unix millis at start
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a new ticker anchored to the current system time.
    ///
    /// # Example
    ///
    /// ```
    /// use ridgen::{MonotonicClock, SystemClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let a = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    /// let b = clock.current_millis();
    ///
    /// // Never goes backward. The exact delta depends on timer alignment.
    /// assert!(b >= a);
    /// ```
    pub fn new() -> Self {
        Self::with_anchor(SystemClock.current_millis())
    }

    /// Starts a new ticker whose zero point reads as `anchor` milliseconds
    /// since the Unix epoch.
    pub fn with_anchor(anchor: u64) -> Self {
        let start = Instant::now();

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Compute the absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                // Align to next tick after the current actual time
                tick = now_ms.saturating_add(1);
            }
        });

        // Freshly created lock, nothing else can have set it.
        let _ = inner._handle.set(handle);

        Self { inner, anchor }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor
            .saturating_add(self.inner.current.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_starts_at_anchor_and_advances() {
        let clock = MonotonicClock::with_anchor(1_000);
        let first = clock.current_millis();
        assert!(first >= 1_000);

        thread::sleep(Duration::from_millis(20));
        let second = clock.current_millis();
        assert!(second > first);
    }

    #[test]
    fn clones_share_the_ticker() {
        let clock = MonotonicClock::with_anchor(0);
        let other = clock.clone();
        thread::sleep(Duration::from_millis(5));
        let a = clock.current_millis();
        let b = other.current_millis();
        assert!(b >= a);
    }
}
