//! Deterministic time sources for tests.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::TimeSource;

/// Always reads the same instant.
pub(crate) struct FixedTime(pub u64);

impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        self.0
    }
}

/// A clock the test moves by hand.
pub(crate) struct ManualTime(AtomicU64);

impl ManualTime {
    pub(crate) fn new(millis: u64) -> Self {
        Self(AtomicU64::new(millis))
    }

    pub(crate) fn set(&self, millis: u64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn current_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Replays a fixed list of readings, one per call, then repeats the last.
pub(crate) struct ScriptedTime {
    values: Vec<u64>,
    index: AtomicUsize,
}

impl ScriptedTime {
    pub(crate) fn new(values: &[u64]) -> Self {
        let values = values.to_vec();
        assert!(!values.is_empty(), "script needs at least one reading");
        Self {
            values,
            index: AtomicUsize::new(0),
        }
    }

    /// Number of readings taken so far.
    pub(crate) fn reads(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

impl TimeSource for ScriptedTime {
    fn current_millis(&self) -> u64 {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.values[i.min(self.values.len() - 1)]
    }
}
