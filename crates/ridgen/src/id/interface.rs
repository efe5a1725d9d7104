use core::{fmt, hash::Hash};

/// The numeric value returned when a generator failed its construction-time
/// check.
///
/// No valid layout produces it in practice: it would require a timestamp,
/// machine ID and sequence of zero, and machine ID `0` is rejected by
/// [`GeneratorConfig`].
///
/// [`GeneratorConfig`]: crate::GeneratorConfig
pub const SENTINEL_ID: u64 = 0;

/// A 64-bit Snowflake-style bit layout.
///
/// From most to least significant bit an ID holds a millisecond timestamp
/// (relative to the generator's epoch), a machine ID and an intra-tick
/// sequence counter. Implementations only differ in how many bits each field
/// gets.
///
/// # Example
///
/// ```
/// use ridgen::{Snowflake, SnowflakeId};
///
/// let id = SnowflakeId::from(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.machine_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
pub trait Snowflake:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Width of the timestamp field.
    const TIMESTAMP_BITS: u32;

    /// Width of the machine ID field.
    const MACHINE_ID_BITS: u32;

    /// Width of the sequence field.
    const SEQUENCE_BITS: u32;

    /// Returns the timestamp portion of the ID.
    fn timestamp(&self) -> u64;

    /// Returns the machine ID portion of the ID.
    fn machine_id(&self) -> u64;

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> u64;

    /// Returns the maximum possible value for the timestamp field.
    fn max_timestamp() -> u64 {
        (1 << Self::TIMESTAMP_BITS) - 1
    }

    /// Returns the maximum possible value for the machine ID field.
    fn max_machine_id() -> u64 {
        (1 << Self::MACHINE_ID_BITS) - 1
    }

    /// Returns the maximum possible value for the sequence field.
    fn max_sequence() -> u64 {
        (1 << Self::SEQUENCE_BITS) - 1
    }

    /// Constructs a new ID from its components.
    fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self;

    /// Converts this type into its raw representation.
    fn to_raw(&self) -> u64;

    /// Converts a raw value into this type.
    fn from_raw(raw: u64) -> Self;

    /// Returns true if the current sequence value can be incremented.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.machine_id(), 0)
    }
}
