use core::time::Duration;

use crate::futures::SleepProvider;

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// Skips the timer and yields to the scheduler instead, so the backoff
/// schedule degenerates into a tight polling loop. Elapsed-time limits in the
/// [`BackoffPolicy`] still apply; attempt limits are reached much sooner.
///
/// [`BackoffPolicy`]: crate::BackoffPolicy
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: Duration) {
        tokio::task::yield_now().await;
    }
}
