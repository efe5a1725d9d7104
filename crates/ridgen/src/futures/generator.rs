use core::future::Future;

use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, Result},
    futures::{SleepProvider, TokioSleep},
    generator::{BackoffPolicy, IdGenStatus, IdGenerator},
    id::{SENTINEL_ID, Snowflake},
};

/// Extension trait for asynchronously generating IDs.
///
/// When the generator reports [`IdGenStatus::Pending`] the future waits
/// according to the [`BackoffPolicy`] and tries again. Waiting is a timer
/// sleep, never a busy loop, and it races the caller's
/// [`CancellationToken`]: once the token fires the future resolves to
/// [`Error::Cancelled`] without attempting another generation.
///
/// External deadlines compose naturally, e.g. with
/// [`tokio::time::timeout`].
pub trait IdGeneratorAsyncExt<ID>
where
    ID: Snowflake,
{
    /// Returns a future that resolves to the next ID, sleeping with `S`
    /// between attempts.
    ///
    /// Resolves to [`SENTINEL_ID`] without attempting generation if the
    /// generator failed its construction-time check.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if `cancel` fires first
    /// - [`Error::BackoffExhausted`] if `policy` gives up
    /// - Any non-transient error from [`IdGenerator::try_poll_id`]
    fn next_id_with<S>(
        &self,
        policy: &BackoffPolicy,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<u64>> + Send
    where
        S: SleepProvider;

    /// [`IdGeneratorAsyncExt::next_id_with`] using [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// See [`IdGeneratorAsyncExt::next_id_with`].
    fn next_id(
        &self,
        policy: &BackoffPolicy,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<u64>> + Send {
        self.next_id_with::<TokioSleep>(policy, cancel)
    }
}

impl<G, ID> IdGeneratorAsyncExt<ID> for G
where
    G: IdGenerator<ID> + Sync,
    ID: Snowflake + Send,
{
    fn next_id_with<S>(
        &self,
        policy: &BackoffPolicy,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<u64>> + Send
    where
        S: SleepProvider,
    {
        async move {
            if self.is_broken() {
                return Ok(SENTINEL_ID);
            }

            let mut backoff = policy.start();
            loop {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }

                let _yield_for = match self.try_poll_id()? {
                    IdGenStatus::Ready { id } => return Ok(id.to_raw()),
                    IdGenStatus::Pending { yield_for } => yield_for,
                };

                let delay = backoff.next_delay().inspect_err(|_e| {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_e, "giving up on id generation");
                })?;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    retry = backoff.retries(),
                    yield_for = _yield_for,
                    ?delay,
                    "id generation pending, backing off"
                );

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(retry = backoff.retries(), "id generation cancelled");
                        return Err(Error::Cancelled);
                    }
                    () = S::sleep_for(delay) => {}
                }
            }
        }
    }
}
