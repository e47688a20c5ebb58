use core::fmt;

/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Identifies which configuration value was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// The datacenter identifier (5 bits).
    DatacenterId,
    /// The worker identifier (5 bits).
    WorkerId,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatacenterId => f.write_str("datacenter_id"),
            Self::WorkerId => f.write_str("worker_id"),
        }
    }
}

/// All error variants that `snowseq` can emit.
///
/// None of these are transient. A generator never retries internally: the
/// caller decides whether to wait, alert, or fail the enclosing operation.
/// Exhausting the per-millisecond sequence is *not* an error, it only adds
/// latency.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A datacenter or worker ID does not fit in its bit field.
    ///
    /// Raised at construction time. A generator is never built from an
    /// out-of-range value.
    #[error("invalid configuration: {field} = {value} is out of range 0..={max}")]
    InvalidConfiguration {
        /// The rejected field.
        field: ConfigField,
        /// The value that was supplied.
        value: u64,
        /// The largest accepted value.
        max: u64,
    },

    /// The clock reported a time earlier than the last issued ID.
    ///
    /// The generator refuses to issue an ID that could collide with or sort
    /// before one it already handed out. Calling again before the clock has
    /// caught up fails the same way.
    #[error("clock moved backwards, refusing to generate ids for {millis} milliseconds")]
    ClockRolledBack {
        /// How far behind the last issued timestamp the clock is.
        millis: u64,
    },

    /// The clock reported a time before the generator's epoch.
    #[error("clock reads {now} ms, which is before the epoch at {epoch} ms")]
    ClockBeforeEpoch {
        /// Milliseconds since the Unix epoch, as read from the clock.
        now: u64,
        /// The generator's epoch in milliseconds since the Unix epoch.
        epoch: u64,
    },

    /// The time since the epoch no longer fits in the 41-bit timestamp field.
    #[error("timestamp delta of {delta} ms does not fit in the timestamp field")]
    TimestampOverflow {
        /// Milliseconds elapsed since the epoch.
        delta: u64,
    },

    /// An environment variable needed by [`GeneratorConfig::from_env`] was
    /// missing or unparsable.
    ///
    /// [`GeneratorConfig::from_env`]: crate::GeneratorConfig::from_env
    #[error("environment variable {var}: {reason}")]
    InvalidEnv {
        /// The variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The generator's lock was poisoned by a panicking thread.
    ///
    /// Not available with the `parking-lot` feature, whose mutexes do not
    /// poison.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
