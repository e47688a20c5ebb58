use crate::{
    GeneratorConfig, SnowflakeId,
    error::{Error, Result},
    id::TIMESTAMP_MASK,
};

/// The immutable part of a generator: who it is and when time starts.
///
/// Read without synchronization on every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) datacenter_id: u64,
    pub(crate) worker_id: u64,
    pub(crate) epoch: u64,
}

impl Identity {
    pub(crate) fn from_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            datacenter_id = config.datacenter_id,
            worker_id = config.worker_id,
            epoch = config.epoch,
            "snowflake generator configured"
        );

        Ok(Self {
            datacenter_id: config.datacenter_id,
            worker_id: config.worker_id,
            epoch: config.epoch,
        })
    }

    /// Milliseconds elapsed since the epoch, if they fit the timestamp field.
    pub(crate) fn delta(&self, now: u64) -> Result<u64> {
        let Some(delta) = now.checked_sub(self.epoch) else {
            return Err(Error::ClockBeforeEpoch {
                now,
                epoch: self.epoch,
            });
        };
        if delta > TIMESTAMP_MASK {
            return Err(Error::TimestampOverflow { delta });
        }
        Ok(delta)
    }

    pub(crate) const fn compose(&self, delta: u64, sequence: u64) -> SnowflakeId {
        SnowflakeId::from_components(delta, self.datacenter_id, self.worker_id, sequence)
    }
}

#[cold]
#[inline(never)]
pub(crate) fn clock_rolled_back(now: u64, last: u64) -> Error {
    let millis = last - now;
    #[cfg(feature = "tracing")]
    tracing::error!(now, last, millis, "clock moved backwards, refusing to issue ids");
    Error::ClockRolledBack { millis }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_relative_to_epoch() {
        let identity = Identity::from_config(&GeneratorConfig::new(1, 2).with_epoch(1_000)).unwrap();
        assert_eq!(identity.delta(1_000), Ok(0));
        assert_eq!(identity.delta(1_250), Ok(250));
    }

    #[test]
    fn delta_before_epoch_fails() {
        let identity = Identity::from_config(&GeneratorConfig::new(1, 2).with_epoch(1_000)).unwrap();
        assert_eq!(
            identity.delta(999),
            Err(Error::ClockBeforeEpoch {
                now: 999,
                epoch: 1_000
            })
        );
    }

    #[test]
    fn delta_past_field_width_fails() {
        let identity = Identity::from_config(&GeneratorConfig::new(0, 0).with_epoch(0)).unwrap();
        assert_eq!(identity.delta(TIMESTAMP_MASK), Ok(TIMESTAMP_MASK));
        assert_eq!(
            identity.delta(TIMESTAMP_MASK + 1),
            Err(Error::TimestampOverflow {
                delta: TIMESTAMP_MASK + 1
            })
        );
    }

    #[test]
    fn compose_carries_identity() {
        let identity = Identity::from_config(&GeneratorConfig::new(9, 21)).unwrap();
        let id = identity.compose(77, 5);
        assert_eq!(id.timestamp(), 77);
        assert_eq!(id.datacenter_id(), 9);
        assert_eq!(id.worker_id(), 21);
        assert_eq!(id.sequence(), 5);
    }
}
