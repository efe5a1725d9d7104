#[cfg(test)]
pub(crate) mod mock;
mod monotonic;
mod system;

use core::time::Duration;

pub use monotonic::*;
pub use system::*;

/// Default generator epoch: Monday, October 10, 2022 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_665_360_000_000);

/// Unix epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// Generators subtract their configured epoch from this value, so a time
/// source never needs to know about epochs. Swap in a mock for tests.
///
/// # Example
///
/// ```
/// use ridgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

pub(crate) fn duration_to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
