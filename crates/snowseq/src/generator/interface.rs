use crate::{IdGenStatus, SnowflakeId, error::Result};

/// A source of Snowflake IDs bound to one `(datacenter_id, worker_id)` pair.
///
/// For a single instance, every ID handed out by [`next_id`] or as
/// [`IdGenStatus::Ready`] from [`try_poll_id`] is strictly greater than any
/// ID it issued before, whichever thread made the call.
///
/// [`next_id`]: SnowflakeGenerator::next_id
/// [`try_poll_id`]: SnowflakeGenerator::try_poll_id
pub trait SnowflakeGenerator {
    /// Issues the next ID, spinning for at most about a millisecond when the
    /// current millisecond's sequence is spent.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRolledBack`] if the clock reads earlier than the last
    ///   issued ID.
    /// - [`Error::ClockBeforeEpoch`] or [`Error::TimestampOverflow`] if the
    ///   clock is outside the range the timestamp field can represent.
    /// - [`Error::LockPoisoned`] if a lock-based generator's mutex is poisoned.
    ///
    /// [`Error::ClockRolledBack`]: crate::Error::ClockRolledBack
    /// [`Error::ClockBeforeEpoch`]: crate::Error::ClockBeforeEpoch
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn next_id(&self) -> Result<SnowflakeId>;

    /// Makes one attempt to issue an ID without waiting.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::next_id`].
    fn try_poll_id(&self) -> Result<IdGenStatus>;

    /// The datacenter ID encoded in every issued ID.
    fn datacenter_id(&self) -> u64;

    /// The worker ID encoded in every issued ID.
    fn worker_id(&self) -> u64;

    /// The epoch (ms since 1970) that timestamps are measured from.
    fn epoch(&self) -> u64;
}
