use core::{num::NonZeroU32, time::Duration};
use std::time::Instant;

use crate::error::{Error, Result};

/// How long and how often ID generation retries after a transient failure.
///
/// The delay before retry `n` (1-based) is `initial * multiplier^(n - 1)`,
/// optionally capped by `max_delay`. Retrying stops with
/// [`Error::BackoffExhausted`] as soon as either `max_attempts` retries were
/// made or `max_elapsed` has passed since the first attempt; both limits are
/// enforced when set.
///
/// [`BackoffPolicy::default`] waits 1 ms, then doubles, for at most 16
/// retries and 5 seconds. [`BackoffPolicy::unbounded`] keeps doubling
/// forever, which can starve a caller under sustained backward clock skew;
/// pair it with a cancellation token or an external deadline.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use ridgen::BackoffPolicy;
///
/// let policy = BackoffPolicy::new(Duration::from_millis(1))
///     .with_max_attempts(3)
///     .with_max_delay(Duration::from_millis(3));
///
/// assert_eq!(policy.delay_for(1), Duration::from_millis(1));
/// assert_eq!(policy.delay_for(2), Duration::from_millis(2));
/// assert_eq!(policy.delay_for(3), Duration::from_millis(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial: Duration,
    multiplier: NonZeroU32,
    max_delay: Option<Duration>,
    max_attempts: Option<u32>,
    max_elapsed: Option<Duration>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL)
            .with_max_attempts(Self::DEFAULT_MAX_ATTEMPTS)
            .with_max_elapsed(Self::DEFAULT_MAX_ELAPSED)
    }
}

impl BackoffPolicy {
    /// Delay before the first retry.
    pub const DEFAULT_INITIAL: Duration = Duration::from_millis(1);

    /// Retry cap used by [`BackoffPolicy::default`].
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

    /// Elapsed-time cap used by [`BackoffPolicy::default`].
    pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(5);

    const DOUBLING: NonZeroU32 = NonZeroU32::new(2).unwrap();

    /// A doubling policy starting at `initial`, with no limits.
    pub const fn new(initial: Duration) -> Self {
        Self {
            initial,
            multiplier: Self::DOUBLING,
            max_delay: None,
            max_attempts: None,
            max_elapsed: None,
        }
    }

    /// 1 ms doubling forever: no delay cap, no attempt cap, no time cap.
    pub const fn unbounded() -> Self {
        Self::new(Self::DEFAULT_INITIAL)
    }

    /// Sets the growth factor between consecutive delays.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: NonZeroU32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Caps every individual delay.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Gives up after this many retries.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Gives up once this much time has passed since the first attempt.
    #[must_use]
    pub const fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }

    /// Delay before the first retry.
    pub const fn initial(&self) -> Duration {
        self.initial
    }

    /// Growth factor between consecutive delays.
    pub const fn multiplier(&self) -> NonZeroU32 {
        self.multiplier
    }

    /// Cap on any single delay, if set.
    pub const fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Retry limit, if set.
    pub const fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Elapsed-time limit, if set.
    pub const fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed
    }

    /// Delay before retry number `retry` (1-based). Saturates instead of
    /// overflowing.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let delay = if self.initial.is_zero() {
            Duration::ZERO
        } else {
            let exp = retry.saturating_sub(1);
            u128::from(self.multiplier.get())
                .checked_pow(exp)
                .and_then(|factor| self.initial.as_nanos().checked_mul(factor))
                .map_or(Duration::MAX, nanos_to_duration)
        };
        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Starts tracking a new retry sequence.
    pub(crate) fn start(&self) -> Backoff<'_> {
        Backoff {
            policy: self,
            retries: 0,
            started: Instant::now(),
        }
    }
}

fn nanos_to_duration(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    match u64::try_from(nanos / NANOS_PER_SEC) {
        // the remainder is below 10^9
        Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}

/// Retry bookkeeping for one ID request.
pub(crate) struct Backoff<'a> {
    policy: &'a BackoffPolicy,
    retries: u32,
    started: Instant,
}

impl Backoff<'_> {
    /// Returns how long to wait before the next retry, or the exhaustion
    /// error once a limit is hit.
    pub(crate) fn next_delay(&mut self) -> Result<Duration> {
        let elapsed = self.started.elapsed();
        let exhausted = Error::BackoffExhausted {
            attempts: self.retries,
            elapsed,
        };

        if self
            .policy
            .max_attempts
            .is_some_and(|max| self.retries >= max)
        {
            return Err(exhausted);
        }

        let mut delay = self.policy.delay_for(self.retries + 1);
        if let Some(max_elapsed) = self.policy.max_elapsed {
            let Some(remaining) = max_elapsed.checked_sub(elapsed).filter(|r| !r.is_zero())
            else {
                return Err(exhausted);
            };
            delay = delay.min(remaining);
        }

        self.retries += 1;
        Ok(delay)
    }

    pub(crate) fn retries(&self) -> u32 {
        self.retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_doubles_from_one_millisecond() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4));
        assert_eq!(policy.delay_for(11), Duration::from_millis(1024));
        assert_eq!(policy.max_attempts(), Some(16));
        assert_eq!(policy.max_elapsed(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let policy = BackoffPolicy::unbounded();
        assert_eq!(policy.delay_for(200), Duration::MAX);

        let capped = policy.with_max_delay(Duration::from_millis(50));
        assert_eq!(capped.delay_for(200), Duration::from_millis(50));
    }

    #[test]
    fn delay_past_u32_factor_does_not_saturate_early() {
        let policy = BackoffPolicy::unbounded();
        assert_eq!(policy.delay_for(33), Duration::from_millis(1 << 32));
        assert_eq!(policy.delay_for(40), Duration::from_millis(1 << 39));
    }

    #[test]
    fn zero_initial_delay_stays_zero() {
        let policy = BackoffPolicy::new(Duration::ZERO);
        for retry in [1, 32, 33, 64, 200, u32::MAX] {
            assert_eq!(policy.delay_for(retry), Duration::ZERO, "retry {retry}");
        }
    }

    #[test]
    fn custom_multiplier() {
        let policy = BackoffPolicy::new(Duration::from_millis(3))
            .with_multiplier(NonZeroU32::new(3).unwrap());
        assert_eq!(policy.delay_for(1), Duration::from_millis(3));
        assert_eq!(policy.delay_for(3), Duration::from_millis(27));
    }

    #[test]
    fn max_attempts_is_enforced() {
        let policy = BackoffPolicy::new(Duration::ZERO).with_max_attempts(2);
        let mut backoff = policy.start();
        assert!(backoff.next_delay().is_ok());
        assert!(backoff.next_delay().is_ok());
        match backoff.next_delay() {
            Err(Error::BackoffExhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(backoff.retries(), 2);
    }

    #[test]
    fn max_elapsed_is_enforced_and_clips_delay() {
        let policy = BackoffPolicy::new(Duration::from_secs(60))
            .with_max_elapsed(Duration::from_millis(20));
        let mut backoff = policy.start();
        let delay = backoff.next_delay().unwrap();
        assert!(delay <= Duration::from_millis(20));

        std::thread::sleep(Duration::from_millis(25));
        assert!(matches!(
            backoff.next_delay(),
            Err(Error::BackoffExhausted { attempts: 1, .. })
        ));
    }

    #[test]
    fn unbounded_never_exhausts() {
        let policy = BackoffPolicy::new(Duration::ZERO);
        let mut backoff = policy.start();
        for _ in 0..1_000 {
            assert_eq!(backoff.next_delay(), Ok(Duration::ZERO));
        }
    }
}
