use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    GeneratorConfig, SnowflakeId, SystemClock, TimeSource,
    error::Result,
    generator::{IdGenStatus, Identity, SnowflakeGenerator, clock_rolled_back},
    id::{SEQUENCE_BITS, SEQUENCE_MASK},
};

/// State word before the first ID. Packed words use at most 53 bits, so this
/// value is never produced by [`pack`].
const UNSET: u64 = u64::MAX;

/// Packs the epoch-relative timestamp and sequence of the last issued ID.
const fn pack(delta: u64, sequence: u64) -> u64 {
    (delta << SEQUENCE_BITS) | sequence
}

const fn unpack(word: u64) -> (u64, u64) {
    (word >> SEQUENCE_BITS, word & SEQUENCE_MASK)
}

/// A lock-free Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// `last_timestamp` and `sequence` are packed into one [`AtomicU64`] and
/// advanced with a single compare-and-swap, which keeps the
/// check-then-update step atomic without a lock.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never blocks on a lock
///
/// ## Caveats
/// Contending threads retry on a lost race instead of queuing, so access is
/// not fair.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
#[derive(Debug)]
pub struct AtomicSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    identity: Identity,
    time: T,
}

impl AtomicSnowflakeGenerator<SystemClock> {
    /// Creates a generator on the system clock and [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either ID is above 31.
    ///
    /// # Example
    /// ```
    /// use snowseq::AtomicSnowflakeGenerator;
    ///
    /// let generator = AtomicSnowflakeGenerator::new(2, 5).unwrap();
    /// let first = generator.next_id().unwrap();
    /// let second = generator.next_id().unwrap();
    /// assert!(first < second);
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn new(datacenter_id: u64, worker_id: u64) -> Result<Self> {
        Self::with_clock(datacenter_id, worker_id, SystemClock)
    }
}

impl<T> AtomicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `time`, with [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either ID is above 31.
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn with_clock(datacenter_id: u64, worker_id: u64, time: T) -> Result<Self> {
        Self::from_config(&GeneratorConfig::new(datacenter_id, worker_id), time)
    }

    /// Creates a generator from a full configuration, including its epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config does not
    /// validate.
    ///
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn from_config(config: &GeneratorConfig, time: T) -> Result<Self> {
        let identity = Identity::from_config(config)?;
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(UNSET)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(UNSET),
            identity,
            time,
        })
    }

    /// Issues the next ID, retrying with a spin hint until an attempt wins.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRolledBack`] if the clock reads earlier than the last
    ///   issued ID.
    /// - [`Error::ClockBeforeEpoch`] / [`Error::TimestampOverflow`] if the
    ///   clock is outside the timestamp field's range.
    ///
    /// [`Error::ClockRolledBack`]: crate::Error::ClockRolledBack
    /// [`Error::ClockBeforeEpoch`]: crate::Error::ClockBeforeEpoch
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    pub fn next_id(&self) -> Result<SnowflakeId> {
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { .. } => core::hint::spin_loop(),
            }
        }
    }

    /// Makes one compare-and-swap attempt to issue an ID.
    ///
    /// Returns [`IdGenStatus::Pending`] with `yield_for: 1` when the current
    /// millisecond's sequence is spent, and `yield_for: 0` when another
    /// thread updated the state first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        // Load before reading the clock: the timestamp in `current` was read
        // before it was stored, so `now` can only be behind it if the clock
        // itself went backwards.
        let current = self.state.load(Ordering::Acquire);
        let now = self.time.current_millis();

        let (delta, sequence) = if current == UNSET {
            (self.identity.delta(now)?, 0)
        } else {
            let (last_delta, last_sequence) = unpack(current);
            let last = self.identity.epoch + last_delta;
            match now.cmp(&last) {
                cmp::Ordering::Less => return Err(clock_rolled_back(now, last)),
                cmp::Ordering::Equal => {
                    if last_sequence < SEQUENCE_MASK {
                        (last_delta, last_sequence + 1)
                    } else {
                        return Ok(IdGenStatus::Pending { yield_for: 1 });
                    }
                }
                cmp::Ordering::Greater => (self.identity.delta(now)?, 0),
            }
        };

        if self
            .state
            .compare_exchange(
                current,
                pack(delta, sequence),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            Ok(IdGenStatus::Ready {
                id: self.identity.compose(delta, sequence),
            })
        } else {
            // Another thread won the race. Yield 0 to retry immediately.
            Ok(IdGenStatus::Pending { yield_for: 0 })
        }
    }

    /// The datacenter ID encoded in every issued ID.
    pub const fn datacenter_id(&self) -> u64 {
        self.identity.datacenter_id
    }

    /// The worker ID encoded in every issued ID.
    pub const fn worker_id(&self) -> u64 {
        self.identity.worker_id
    }

    /// The epoch (ms since 1970) that timestamps are measured from.
    pub const fn epoch(&self) -> u64 {
        self.identity.epoch
    }
}

impl<T> SnowflakeGenerator for AtomicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn try_poll_id(&self) -> Result<IdGenStatus> {
        self.try_poll_id()
    }

    fn datacenter_id(&self) -> u64 {
        self.datacenter_id()
    }

    fn worker_id(&self) -> u64 {
        self.worker_id()
    }

    fn epoch(&self) -> u64 {
        self.epoch()
    }
}
