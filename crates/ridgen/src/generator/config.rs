use core::{marker::PhantomData, time::Duration};

use crate::{
    error::{ConfigError, Error, Result},
    id::{Snowflake, SnowflakeId},
    time::{DEFAULT_EPOCH, duration_to_millis},
};

/// Immutable generator configuration: which machine this process is, and
/// which epoch its timestamps count from.
///
/// The machine ID must be unique per running instance and is validated
/// against the bit width of the chosen layout `ID`. The epoch must never
/// change for the lifetime of a deployment's ID corpus; moving it breaks
/// uniqueness against previously issued IDs.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use ridgen::{ConfigError, GeneratorConfig, SnowflakeId, WideMachineId};
///
/// let config = GeneratorConfig::<SnowflakeId>::new(7)
///     .unwrap()
///     .with_epoch(Duration::from_millis(1_700_000_000_000));
/// assert_eq!(config.machine_id(), 7);
/// assert_eq!(config.epoch_millis(), 1_700_000_000_000);
///
/// // 10 bits of machine ID
/// assert!(matches!(
///     GeneratorConfig::<SnowflakeId>::new(1024),
///     Err(ConfigError::MachineIdOutOfRange { .. })
/// ));
/// // 16 bits of machine ID
/// assert!(GeneratorConfig::<WideMachineId>::new(1024).is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig<ID = SnowflakeId>
where
    ID: Snowflake,
{
    machine_id: u64,
    epoch: Duration,
    _id: PhantomData<fn() -> ID>,
}

impl<ID> GeneratorConfig<ID>
where
    ID: Snowflake,
{
    /// Creates a configuration for `machine_id` using [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroMachineId`] for machine ID `0`
    /// - [`ConfigError::MachineIdOutOfRange`] if it does not fit the layout
    pub fn new(machine_id: u64) -> Result<Self, ConfigError> {
        if machine_id == 0 {
            return Err(ConfigError::ZeroMachineId);
        }
        let max = ID::max_machine_id();
        if machine_id > max {
            return Err(ConfigError::MachineIdOutOfRange { machine_id, max });
        }
        Ok(Self {
            machine_id,
            epoch: DEFAULT_EPOCH,
            _id: PhantomData,
        })
    }

    /// Replaces the epoch, given as a [`Duration`] since 1970-01-01 UTC.
    #[must_use]
    pub const fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    /// The configured machine ID.
    pub const fn machine_id(&self) -> u64 {
        self.machine_id
    }

    /// The configured epoch.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }

    /// The configured epoch in milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> u64 {
        duration_to_millis(self.epoch)
    }

    /// Converts a Unix-millisecond clock reading into a timestamp for this
    /// layout.
    pub(crate) fn elapsed(&self, now_ms: u64) -> Result<u64> {
        let epoch_ms = self.epoch_millis();
        let elapsed_ms = now_ms
            .checked_sub(epoch_ms)
            .ok_or(Error::ClockBeforeEpoch { now_ms, epoch_ms })?;
        let max = ID::max_timestamp();
        if elapsed_ms > max {
            return Err(Error::TimestampOverflow { elapsed_ms, max });
        }
        Ok(elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WideMachineId;

    #[test]
    fn rejects_zero_machine_id() {
        assert_eq!(
            GeneratorConfig::<SnowflakeId>::new(0),
            Err(ConfigError::ZeroMachineId)
        );
    }

    #[test]
    fn rejects_machine_id_wider_than_layout() {
        assert_eq!(
            GeneratorConfig::<SnowflakeId>::new(1024),
            Err(ConfigError::MachineIdOutOfRange {
                machine_id: 1024,
                max: 1023
            })
        );
        assert!(GeneratorConfig::<SnowflakeId>::new(1023).is_ok());
        assert!(GeneratorConfig::<WideMachineId>::new(u64::from(u16::MAX)).is_ok());
        assert!(GeneratorConfig::<WideMachineId>::new(u64::from(u16::MAX) + 1).is_err());
    }

    #[test]
    fn elapsed_is_relative_to_epoch() {
        let config = GeneratorConfig::<SnowflakeId>::new(1)
            .unwrap()
            .with_epoch(Duration::from_millis(1_000));
        assert_eq!(config.elapsed(1_500), Ok(500));
        assert_eq!(config.elapsed(1_000), Ok(0));
        assert_eq!(
            config.elapsed(999),
            Err(Error::ClockBeforeEpoch {
                now_ms: 999,
                epoch_ms: 1_000
            })
        );
    }

    #[test]
    fn elapsed_overflowing_timestamp_field_is_an_error() {
        let config = GeneratorConfig::<SnowflakeId>::new(1)
            .unwrap()
            .with_epoch(crate::UNIX_EPOCH);
        let max = SnowflakeId::max_timestamp();
        assert_eq!(config.elapsed(max), Ok(max));
        assert_eq!(
            config.elapsed(max + 1),
            Err(Error::TimestampOverflow {
                elapsed_ms: max + 1,
                max
            })
        );
    }

    #[test]
    fn default_epoch_is_used() {
        let config = GeneratorConfig::<SnowflakeId>::new(1).unwrap();
        assert_eq!(config.epoch(), DEFAULT_EPOCH);
        assert_eq!(config.epoch_millis(), 1_665_360_000_000);
    }
}
