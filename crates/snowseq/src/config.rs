//! Generator configuration.
//!
//! A generator is identified by its `(datacenter_id, worker_id)` pair, which
//! must be unique among all generators running at the same time. Assigning
//! the pair is the operator's job: pass it in code, through a deserialized
//! config file, or through the environment with
//! [`GeneratorConfig::from_env`].

use core::str::FromStr;

use crate::{
    error::{ConfigField, Error, Result},
    id::{MAX_DATACENTER_ID, MAX_WORKER_ID},
    time::DEFAULT_EPOCH,
};

/// Environment variable holding the datacenter ID.
pub const ENV_DATACENTER_ID: &str = "SNOWSEQ_DATACENTER_ID";

/// Environment variable holding the worker ID.
pub const ENV_WORKER_ID: &str = "SNOWSEQ_WORKER_ID";

/// Optional environment variable overriding the epoch (ms since 1970).
pub const ENV_EPOCH: &str = "SNOWSEQ_EPOCH";

/// Identity and epoch of one generator instance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    /// Datacenter ID, `0..=31`.
    pub datacenter_id: u64,
    /// Worker ID within the datacenter, `0..=31`.
    pub worker_id: u64,
    /// Reference point of the timestamp field, in ms since the Unix epoch.
    #[cfg_attr(feature = "serde", serde(default = "default_epoch"))]
    pub epoch: u64,
}

#[cfg(feature = "serde")]
const fn default_epoch() -> u64 {
    DEFAULT_EPOCH
}

impl GeneratorConfig {
    /// Creates a config using [`DEFAULT_EPOCH`].
    pub const fn new(datacenter_id: u64, worker_id: u64) -> Self {
        Self {
            datacenter_id,
            worker_id,
            epoch: DEFAULT_EPOCH,
        }
    }

    /// Overrides the epoch.
    ///
    /// Every generator whose IDs are compared by time must use the same
    /// epoch.
    #[must_use]
    pub const fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Checks that both IDs fit in their 5-bit fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first field out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        check(ConfigField::DatacenterId, self.datacenter_id, MAX_DATACENTER_ID)?;
        check(ConfigField::WorkerId, self.worker_id, MAX_WORKER_ID)?;
        Ok(())
    }

    /// Reads the config from [`ENV_DATACENTER_ID`], [`ENV_WORKER_ID`] and the
    /// optional [`ENV_EPOCH`], then validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] if a required variable is missing or a
    /// value does not parse, and [`Error::InvalidConfiguration`] if an ID is
    /// out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self> {
        let datacenter_id = required(&lookup, ENV_DATACENTER_ID)?;
        let worker_id = required(&lookup, ENV_WORKER_ID)?;
        let epoch = match lookup(ENV_EPOCH) {
            Some(raw) => parse(ENV_EPOCH, &raw)?,
            None => DEFAULT_EPOCH,
        };

        let config = Self::new(datacenter_id, worker_id).with_epoch(epoch);
        config.validate()?;
        Ok(config)
    }
}

fn check(field: ConfigField, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::InvalidConfiguration { field, value, max });
    }
    Ok(())
}

fn required<T: FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    var: &'static str,
) -> Result<T>
where
    T::Err: core::fmt::Display,
{
    let raw = lookup(var).ok_or_else(|| Error::InvalidEnv {
        var,
        reason: "not set".to_string(),
    })?;
    parse(var, &raw)
}

fn parse<T: FromStr>(var: &'static str, raw: &str) -> Result<T>
where
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| Error::InvalidEnv {
        var,
        reason: format!("{raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn boundary_ids_validate() {
        assert!(GeneratorConfig::new(31, 31).validate().is_ok());
        assert!(GeneratorConfig::new(0, 0).validate().is_ok());
    }

    #[test]
    fn one_past_max_is_rejected() {
        assert_eq!(
            GeneratorConfig::new(32, 0).validate(),
            Err(Error::InvalidConfiguration {
                field: ConfigField::DatacenterId,
                value: 32,
                max: 31,
            })
        );
        assert_eq!(
            GeneratorConfig::new(0, 32).validate(),
            Err(Error::InvalidConfiguration {
                field: ConfigField::WorkerId,
                value: 32,
                max: 31,
            })
        );
    }

    #[test]
    fn reads_ids_and_default_epoch() {
        let lookup = env(&[(ENV_DATACENTER_ID, "3"), (ENV_WORKER_ID, " 17 ")]);
        let config = GeneratorConfig::from_lookup(lookup).unwrap();
        assert_eq!(config, GeneratorConfig::new(3, 17));
        assert_eq!(config.epoch, DEFAULT_EPOCH);
    }

    #[test]
    fn reads_epoch_override() {
        let lookup = env(&[
            (ENV_DATACENTER_ID, "1"),
            (ENV_WORKER_ID, "2"),
            (ENV_EPOCH, "1420070400000"),
        ]);
        let config = GeneratorConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.epoch, crate::DISCORD_EPOCH);
    }

    #[test]
    fn missing_variable_is_reported() {
        let lookup = env(&[(ENV_DATACENTER_ID, "1")]);
        let err = GeneratorConfig::from_lookup(lookup).unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { var: ENV_WORKER_ID, .. }));
    }

    #[test]
    fn unparsable_variable_is_reported() {
        let lookup = env(&[(ENV_DATACENTER_ID, "-1"), (ENV_WORKER_ID, "2")]);
        let err = GeneratorConfig::from_lookup(lookup).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEnv {
                var: ENV_DATACENTER_ID,
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_variable_fails_validation() {
        let lookup = env(&[(ENV_DATACENTER_ID, "1"), (ENV_WORKER_ID, "40")]);
        let err = GeneratorConfig::from_lookup(lookup).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfiguration {
                field: ConfigField::WorkerId,
                value: 40,
                ..
            }
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_default_epoch() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"datacenter_id":4,"worker_id":5}"#).unwrap();
        assert_eq!(config, GeneratorConfig::new(4, 5));
    }
}
