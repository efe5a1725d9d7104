use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{GeneratorConfig, IdGenStatus, IdGenerator, Mutex},
    id::{Snowflake, SnowflakeId},
    time::TimeSource,
};

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The "read tick, bump or reset sequence" critical section runs under a
/// single [`Mutex`], so concurrent callers can never observe or hand out the
/// same `(timestamp, sequence)` pair. The critical section is a handful of
/// integer operations, so coarse locking is not a bottleneck.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
///
/// ## See Also
/// - [`AtomicGenerator`]
///
/// [`AtomicGenerator`]: crate::AtomicGenerator
pub struct LockGenerator<ID = SnowflakeId, T = crate::SystemClock>
where
    ID: Snowflake,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<ID>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<ID>,
    config: GeneratorConfig<ID>,
    time: T,
    fatal: Option<Error>,
}

impl<ID, T> LockGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    /// Creates a new generator for `config`, reading time from `time`.
    ///
    /// The clock is checked once against the configured epoch. If it reads
    /// before the epoch (or past the end of the timestamp field) the
    /// generator is marked permanently broken: [`IdGenerator::is_broken`]
    /// turns true and the retry loops only ever return the sentinel `0`.
    ///
    /// # Example
    /// ```
    /// use ridgen::{GeneratorConfig, IdGenStatus, IdGenerator, LockGenerator, SnowflakeId, SystemClock};
    ///
    /// let config = GeneratorConfig::<SnowflakeId>::new(1).unwrap();
    /// let generator = LockGenerator::new(config, SystemClock);
    /// assert!(!generator.is_broken());
    ///
    /// let id = loop {
    ///     match generator.try_poll_id().unwrap() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(id.machine_id(), 1);
    /// ```
    pub fn new(config: GeneratorConfig<ID>, time: T) -> Self {
        Self::from_components(config, 0, 0, time)
    }

    /// Creates a generator preloaded with an explicit last-issued timestamp
    /// and sequence, e.g. to resume after a restart within the same tick.
    pub fn from_components(
        config: GeneratorConfig<ID>,
        timestamp: u64,
        sequence: u64,
        time: T,
    ) -> Self {
        let fatal = config.elapsed(time.current_millis()).err();
        if let Some(_e) = &fatal {
            #[cfg(feature = "tracing")]
            tracing::error!(
                error = %_e,
                machine_id = config.machine_id(),
                "id generator failed its startup clock check; only the sentinel will be issued"
            );
        }

        let id = ID::from_components(timestamp, config.machine_id(), sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(id)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(id),
            config,
            time,
            fatal,
        }
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &GeneratorConfig<ID> {
        &self.config
    }

    /// Attempts to generate the next available ID.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The sequence is exhausted
    ///   for this tick or the clock moved backward; retry in roughly
    ///   `yield_for` milliseconds
    ///
    /// # Errors
    /// - [`Error::GeneratorUnavailable`] if the startup check failed
    /// - [`Error::TimestampOverflow`] once the timestamp field is exhausted
    /// - [`Error::LockPoisoned`] if the lock is poisoned (std mutex only)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        if self.fatal.is_some() {
            return Err(Error::GeneratorUnavailable);
        }

        let now = match self.config.elapsed(self.time.current_millis()) {
            Ok(now) => now,
            Err(Error::ClockBeforeEpoch { now_ms, epoch_ms }) => {
                return Ok(cold_before_epoch(now_ms, epoch_ms));
            }
            Err(e) => return Err(e),
        };

        let mut id = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let current_ts = id.timestamp();
        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(IdGenStatus::Ready { id: *id })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(IdGenStatus::Ready { id: *id })
            }
            Ordering::Less => Ok(cold_clock_behind(now, current_ts)),
        }
    }
}

impl<ID, T> IdGenerator<ID> for LockGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        self.try_poll_id()
    }

    fn fatal_error(&self) -> Option<&Error> {
        self.fatal.as_ref()
    }

    fn machine_id(&self) -> u64 {
        self.config.machine_id()
    }
}

#[cold]
#[inline(never)]
pub(crate) fn cold_clock_behind<ID: Snowflake>(now: u64, current_ts: u64) -> IdGenStatus<ID> {
    #[cfg(feature = "tracing")]
    tracing::debug!(now, current_ts, "clock moved backward");
    IdGenStatus::Pending {
        yield_for: current_ts - now,
    }
}

#[cold]
#[inline(never)]
pub(crate) fn cold_before_epoch<ID: Snowflake>(now_ms: u64, epoch_ms: u64) -> IdGenStatus<ID> {
    #[cfg(feature = "tracing")]
    tracing::debug!(now_ms, epoch_ms, "clock moved behind the epoch");
    IdGenStatus::Pending {
        yield_for: epoch_ms.saturating_sub(now_ms),
    }
}
