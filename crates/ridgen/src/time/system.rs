use std::time::SystemTime;

use super::{TimeSource, duration_to_millis};

/// The operating system's wall clock.
///
/// Reads [`SystemTime::now`] on every call, so it follows NTP slews and manual
/// adjustments, including steps backward. Generators treat a backward step as
/// a transient condition and wait it out.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as zero, which any real epoch rejects.
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(duration_to_millis)
            .unwrap_or(0)
    }
}
