use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    GeneratorConfig, SnowflakeId, SystemClock, TimeSource,
    error::Result,
    generator::{IdGenStatus, Identity, Mutex, MutexGuard, SnowflakeGenerator, clock_rolled_back},
    id::SEQUENCE_MASK,
};

#[derive(Debug, Default)]
struct State {
    /// Millisecond (since 1970) of the last issued ID, `None` before the
    /// first one.
    last_timestamp: Option<u64>,
    sequence: u64,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The mutable state (`sequence`, `last_timestamp`) lives behind a single
/// [`Mutex`], held for the whole of each call, including the spin-wait when
/// the 4096 IDs of a millisecond are spent. Share it across threads with an
/// [`Arc`](std::sync::Arc).
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair: callers queue on the lock rather than retrying
///
/// ## Recommended When
/// - You want the simplest correct generator
/// - Fair access across threads is important
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
///
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
#[derive(Debug)]
pub struct LockSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    identity: Identity,
    time: T,
}

impl LockSnowflakeGenerator<SystemClock> {
    /// Creates a generator on the system clock and [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either ID is above 31.
    ///
    /// # Example
    /// ```
    /// use snowseq::LockSnowflakeGenerator;
    ///
    /// let generator = LockSnowflakeGenerator::new(1, 1).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.datacenter_id(), 1);
    /// assert_eq!(id.worker_id(), 1);
    ///
    /// assert!(LockSnowflakeGenerator::new(32, 0).is_err());
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn new(datacenter_id: u64, worker_id: u64) -> Result<Self> {
        Self::with_clock(datacenter_id, worker_id, SystemClock)
    }
}

impl<T> LockSnowflakeGenerator<T>
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
            state: crossbeam_utils::CachePadded::new(Mutex::new(State::default())),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(State::default()),
            identity,
            time,
        })
    }

    /// Issues the next ID.
    ///
    /// Within one millisecond, IDs take consecutive sequence numbers. When
    /// the sequence would wrap, the call spins (still holding the lock) until
    /// the clock moves to a later millisecond and continues from sequence 0.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRolledBack`] if the clock reads earlier than the last
    ///   issued ID, either on entry or while spinning. No ID is issued and
    ///   the state is left untouched.
    /// - [`Error::ClockBeforeEpoch`] / [`Error::TimestampOverflow`] if the
    ///   clock is outside the timestamp field's range.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the lock.
    ///
    /// [`Error::ClockRolledBack`]: crate::Error::ClockRolledBack
    /// [`Error::ClockBeforeEpoch`]: crate::Error::ClockBeforeEpoch
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock()?;
        let now = self.time.current_millis();

        let (now, sequence) = match state.last_timestamp.map(|last| (last, now.cmp(&last))) {
            Some((last, Ordering::Less)) => return Err(clock_rolled_back(now, last)),
            Some((last, Ordering::Equal)) => {
                let sequence = (state.sequence + 1) & SEQUENCE_MASK;
                if sequence == 0 {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(last, "sequence exhausted, waiting for the next millisecond");
                    (self.til_next_millis(last)?, 0)
                } else {
                    (now, sequence)
                }
            }
            _ => (now, 0),
        };

        let delta = self.identity.delta(now)?;
        state.last_timestamp = Some(now);
        state.sequence = sequence;
        Ok(self.identity.compose(delta, sequence))
    }

    /// Makes one attempt to issue an ID without spinning.
    ///
    /// Returns [`IdGenStatus::Pending`] with `yield_for: 1` when the current
    /// millisecond's sequence is spent. The state is not touched in that
    /// case.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.lock()?;
        let now = self.time.current_millis();

        let sequence = match state.last_timestamp.map(|last| (last, now.cmp(&last))) {
            Some((last, Ordering::Less)) => return Err(clock_rolled_back(now, last)),
            Some((_, Ordering::Equal)) => {
                if state.sequence < SEQUENCE_MASK {
                    state.sequence + 1
                } else {
                    return Ok(IdGenStatus::Pending { yield_for: 1 });
                }
            }
            _ => 0,
        };

        let delta = self.identity.delta(now)?;
        state.last_timestamp = Some(now);
        state.sequence = sequence;
        Ok(IdGenStatus::Ready {
            id: self.identity.compose(delta, sequence),
        })
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

    /// Spins until the clock passes `last`.
    fn til_next_millis(&self, last: u64) -> Result<u64> {
        loop {
            let now = self.time.current_millis();
            match now.cmp(&last) {
                Ordering::Greater => return Ok(now),
                Ordering::Equal => core::hint::spin_loop(),
                Ordering::Less => return Err(clock_rolled_back(now, last)),
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> SnowflakeGenerator for LockSnowflakeGenerator<T>
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
