use crate::id::Snowflake;

/// Represents the result of a single attempt to generate an ID.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means the generator cannot produce an ID right
///   now: either the sequence for the current tick is exhausted, or the clock
///   reads behind the last tick handed out.
///
/// Both pending causes are transient. The retry loops behind
/// [`IdGenerator::next_id_blocking`] and the async extension wait according
/// to a [`BackoffPolicy`] and try again.
///
/// [`IdGenerator::next_id_blocking`]: crate::IdGenerator::next_id_blocking
/// [`BackoffPolicy`]: crate::BackoffPolicy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<ID: Snowflake> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated for now.
    Pending {
        /// Milliseconds until the clock is expected to allow progress.
        yield_for: u64,
    },
}
