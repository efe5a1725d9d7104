use core::time::Duration;

use crate::code::CodeError;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `ridgen` can emit.
///
/// Transient conditions (sequence exhaustion, a clock that stepped backward)
/// never surface here directly; they are reported as
/// [`IdGenStatus::Pending`] and absorbed by the retry loops until the
/// [`BackoffPolicy`] gives up.
///
/// [`IdGenStatus::Pending`]: crate::IdGenStatus::Pending
/// [`BackoffPolicy`]: crate::BackoffPolicy
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The generator state lock was poisoned by a panicking thread.
    ///
    /// Not produced when the `parking-lot` feature is enabled since those
    /// mutexes do not poison.
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// The caller's cancellation token fired while waiting to retry.
    #[error("id generation cancelled")]
    Cancelled,

    /// The backoff policy ran out of attempts or elapsed time.
    #[error("backoff exhausted after {attempts} retries ({elapsed:?})")]
    BackoffExhausted {
        /// Number of retries performed before giving up.
        attempts: u32,
        /// Time spent since the first attempt.
        elapsed: Duration,
    },

    /// The clock reads earlier than the configured epoch.
    #[error("clock ({now_ms} ms) is before the configured epoch ({epoch_ms} ms)")]
    ClockBeforeEpoch {
        /// Current clock reading in milliseconds since the Unix epoch.
        now_ms: u64,
        /// Configured epoch in milliseconds since the Unix epoch.
        epoch_ms: u64,
    },

    /// The time since epoch no longer fits in the layout's timestamp field.
    #[error("elapsed time {elapsed_ms} ms exceeds the timestamp field (max {max} ms)")]
    TimestampOverflow {
        /// Milliseconds elapsed since the configured epoch.
        elapsed_ms: u64,
        /// Largest timestamp the layout can hold.
        max: u64,
    },

    /// The generator failed its construction-time check and only yields the
    /// sentinel value.
    #[error("id generator is permanently unavailable")]
    GeneratorUnavailable,

    /// A resource tag was rejected.
    #[error("invalid resource tag {tag:?}: {reason}")]
    InvalidTag {
        /// The rejected tag.
        tag: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Invalid generator configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid short-code options.
    #[error(transparent)]
    Code(#[from] CodeError),
}

/// Errors raised while validating a [`GeneratorConfig`].
///
/// [`GeneratorConfig`]: crate::GeneratorConfig
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Machine ID `0` is reserved.
    #[error("machine id must be positive")]
    ZeroMachineId,

    /// The machine ID does not fit in the layout's machine ID field.
    #[error("machine id {machine_id} exceeds the layout maximum of {max}")]
    MachineIdOutOfRange {
        /// The rejected machine ID.
        machine_id: u64,
        /// Largest machine ID the layout can hold.
        max: u64,
    },
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
