#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{BackoffPolicy, IdGenStatus},
    id::{SENTINEL_ID, Snowflake},
};

/// A minimal interface for generating Snowflake-style numeric IDs.
///
/// Implementations only need to provide a single, non-blocking attempt
/// ([`IdGenerator::try_poll_id`]) and expose their construction-time health.
/// The retry loops are shared: [`IdGenerator::next_id_blocking`] here, and the
/// cancellable async variant in [`IdGeneratorAsyncExt`].
///
/// [`IdGeneratorAsyncExt`]: crate::IdGeneratorAsyncExt
pub trait IdGenerator<ID>
where
    ID: Snowflake,
{
    /// Attempts to generate the next ID without waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::GeneratorUnavailable`] if the generator is broken
    /// - [`Error::TimestampOverflow`] once the layout's timestamp is exhausted
    /// - [`Error::LockPoisoned`] for lock-based generators
    fn try_poll_id(&self) -> Result<IdGenStatus<ID>>;

    /// The error recorded by the construction-time check, if it failed.
    fn fatal_error(&self) -> Option<&Error>;

    /// The machine ID embedded in every generated ID.
    fn machine_id(&self) -> u64;

    /// Whether the generator is permanently broken.
    ///
    /// A broken generator answers every [`IdGenerator::next_id_blocking`]
    /// call with [`SENTINEL_ID`].
    fn is_broken(&self) -> bool {
        self.fatal_error().is_some()
    }

    /// Generates the next ID, sleeping on the calling thread between retries.
    ///
    /// Returns [`SENTINEL_ID`] without attempting generation if the generator
    /// failed its construction-time check.
    ///
    /// # Errors
    ///
    /// - [`Error::BackoffExhausted`] if `policy` gives up
    /// - Any non-transient error from [`IdGenerator::try_poll_id`]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    fn next_id_blocking(&self, policy: &BackoffPolicy) -> Result<u64> {
        if self.is_broken() {
            return Ok(SENTINEL_ID);
        }

        let mut backoff = policy.start();
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => return Ok(id.to_raw()),
                IdGenStatus::Pending { yield_for } => {
                    let delay = backoff.next_delay().inspect_err(|_e| {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(error = %_e, "giving up on id generation");
                    })?;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        retry = backoff.retries(),
                        yield_for,
                        ?delay,
                        "id generation pending, backing off"
                    );
                    #[cfg(not(feature = "tracing"))]
                    let _ = yield_for;
                    std::thread::sleep(delay);
                }
            }
        }
    }
}

impl<ID, G> IdGenerator<ID> for std::sync::Arc<G>
where
    ID: Snowflake,
    G: IdGenerator<ID> + ?Sized,
{
    fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        (**self).try_poll_id()
    }

    fn fatal_error(&self) -> Option<&Error> {
        (**self).fatal_error()
    }

    fn machine_id(&self) -> u64 {
        (**self).machine_id()
    }
}
