use core::fmt;

use crate::id::Snowflake;

macro_rules! define_snowflake_id {
    (
        $(#[$meta:meta])*
        $name:ident, reserved = $reserved:literal, timestamp = $ts_bits:literal, machine_id = $mid_bits:literal, sequence = $seq_bits:literal
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            id: u64,
        }

        const _: () = assert!($reserved + $ts_bits + $mid_bits + $seq_bits == 64);

        impl $name {
            /// Bitmask for the timestamp field (after shifting).
            pub const TIMESTAMP_MASK: u64 = (1 << $ts_bits) - 1;

            /// Bitmask for the machine ID field (after shifting).
            pub const MACHINE_ID_MASK: u64 = (1 << $mid_bits) - 1;

            /// Bitmask for the sequence field.
            pub const SEQUENCE_MASK: u64 = (1 << $seq_bits) - 1;

            /// Bit offset of the timestamp field.
            pub const TIMESTAMP_SHIFT: u64 = $mid_bits + $seq_bits;

            /// Bit offset of the machine ID field.
            pub const MACHINE_ID_SHIFT: u64 = $seq_bits;

            /// Bit offset of the sequence field.
            pub const SEQUENCE_SHIFT: u64 = 0;

            /// Packs the components into an ID, masking each to its field.
            pub const fn from(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
                let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
                let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
                let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self {
                    id: timestamp | machine_id | sequence,
                }
            }

            /// Extracts the timestamp from the packed ID.
            pub const fn timestamp(&self) -> u64 {
                (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
            }

            /// Extracts the machine ID from the packed ID.
            pub const fn machine_id(&self) -> u64 {
                (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
            }

            /// Extracts the sequence number from the packed ID.
            pub const fn sequence(&self) -> u64 {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            /// Returns the raw packed value.
            pub const fn to_u64(&self) -> u64 {
                self.id
            }
        }

        impl Snowflake for $name {
            const TIMESTAMP_BITS: u32 = $ts_bits;
            const MACHINE_ID_BITS: u32 = $mid_bits;
            const SEQUENCE_BITS: u32 = $seq_bits;

            fn timestamp(&self) -> u64 {
                self.timestamp()
            }

            fn machine_id(&self) -> u64 {
                self.machine_id()
            }

            fn sequence(&self) -> u64 {
                self.sequence()
            }

            fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
                debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
                debug_assert!(machine_id <= Self::MACHINE_ID_MASK, "machine_id overflow");
                debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
                Self::from(timestamp, machine_id, sequence)
            }

            fn to_raw(&self) -> u64 {
                self.id
            }

            fn from_raw(raw: u64) -> Self {
                Self { id: raw }
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.id
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &self.id)
                    .field("timestamp", &self.timestamp())
                    .field("machine_id", &self.machine_id())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }
    };
}

define_snowflake_id!(
    /// A 64-bit ID using the classic Snowflake layout.
    ///
    /// - 1 bit reserved
    /// - 41 bits timestamp (ms since the generator epoch, ~69 years)
    /// - 10 bits machine ID
    /// - 12 bits sequence (4096 IDs per millisecond per machine)
    ///
    /// ```text
    ///  Bit Index:  63           63 62            22 21             12 11             0
    ///              +--------------+----------------+-----------------+---------------+
    ///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
    ///              +--------------+----------------+-----------------+---------------+
    ///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
    /// ```
    SnowflakeId, reserved = 1, timestamp = 41, machine_id = 10, sequence = 12
);

define_snowflake_id!(
    /// A 64-bit ID for fleets that hand out 16-bit instance numbers.
    ///
    /// - 41 bits timestamp (ms since the generator epoch, ~69 years)
    /// - 16 bits machine ID
    /// - 7 bits sequence (128 IDs per millisecond per machine)
    ///
    /// ```text
    ///  Bit Index:  63             23 22              7 6              0
    ///              +----------------+-----------------+---------------+
    ///  Field:      | timestamp (41) | machine ID (16) | sequence (7)  |
    ///              +----------------+-----------------+---------------+
    ///              |<----- MSB ---------- 64 bits --------- LSB ----->|
    /// ```
    WideMachineId, reserved = 0, timestamp = 41, machine_id = 16, sequence = 7
);
