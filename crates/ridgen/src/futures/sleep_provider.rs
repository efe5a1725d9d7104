use core::{future::Future, time::Duration};

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// This keeps the retry loop independent of the timer used to wait between
/// attempts.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across threads
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
