use core::{cmp, marker::PhantomData};

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{GeneratorConfig, IdGenStatus, IdGenerator, cold_before_epoch, cold_clock_behind},
    id::{Snowflake, SnowflakeId},
    time::TimeSource,
};

/// A lock-free ID generator suitable for multi-threaded environments.
///
/// The packed ID is the whole generator state, so it lives in a single
/// [`AtomicU64`] and advances with a compare-and-swap loop. A lost race
/// simply re-reads the state and tries again; it is never reported as
/// pending.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access across threads
///
/// ## Recommended When
/// - Throughput matters more than fairness under heavy contention
///
/// ## See Also
/// - [`LockGenerator`]
///
/// [`LockGenerator`]: crate::LockGenerator
pub struct AtomicGenerator<ID = SnowflakeId, T = crate::SystemClock>
where
    ID: Snowflake,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    config: GeneratorConfig<ID>,
    time: T,
    fatal: Option<Error>,
    _id: PhantomData<ID>,
}

impl<ID, T> AtomicGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    /// Creates a new generator for `config`, reading time from `time`.
    ///
    /// Runs the same startup clock check as [`LockGenerator::new`].
    ///
    /// [`LockGenerator::new`]: crate::LockGenerator::new
    pub fn new(config: GeneratorConfig<ID>, time: T) -> Self {
        Self::from_components(config, 0, 0, time)
    }

    /// Creates a generator preloaded with an explicit last-issued timestamp
    /// and sequence.
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

        let initial = ID::from_components(timestamp, config.machine_id(), sequence).to_raw();
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial),
            config,
            time,
            fatal,
            _id: PhantomData,
        }
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &GeneratorConfig<ID> {
        &self.config
    }

    /// Attempts to generate the next available ID.
    ///
    /// Semantics match [`LockGenerator::try_poll_id`], minus lock poisoning.
    ///
    /// # Errors
    /// - [`Error::GeneratorUnavailable`] if the startup check failed
    /// - [`Error::TimestampOverflow`] once the timestamp field is exhausted
    ///
    /// [`LockGenerator::try_poll_id`]: crate::LockGenerator::try_poll_id
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

        let mut current_raw = self.state.load(Ordering::Relaxed);
        loop {
            let current_id = ID::from_raw(current_raw);
            let current_ts = current_id.timestamp();

            let next_id = match now.cmp(&current_ts) {
                cmp::Ordering::Equal => {
                    if current_id.has_sequence_room() {
                        current_id.increment_sequence()
                    } else {
                        return Ok(IdGenStatus::Pending { yield_for: 1 });
                    }
                }
                cmp::Ordering::Greater => current_id.rollover_to_timestamp(now),
                cmp::Ordering::Less => return Ok(cold_clock_behind(now, current_ts)),
            };

            match self.state.compare_exchange_weak(
                current_raw,
                next_id.to_raw(),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(IdGenStatus::Ready { id: next_id }),
                // Another thread won the race; recompute from its state.
                Err(actual) => {
                    current_raw = actual;
                    core::hint::spin_loop();
                }
            }
        }
    }
}

impl<ID, T> IdGenerator<ID> for AtomicGenerator<ID, T>
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
