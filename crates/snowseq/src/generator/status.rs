use crate::SnowflakeId;

/// The outcome of a single non-blocking attempt to generate an ID.
///
/// Returned by [`SnowflakeGenerator::try_poll_id`]:
///
/// - [`IdGenStatus::Ready`] carries a freshly issued ID.
/// - [`IdGenStatus::Pending`] means nothing was issued: either the 4096 IDs
///   of the current millisecond are spent, or (lock-free generator only)
///   another thread won the race for the state word.
///
/// # Example
///
/// ```
/// use snowseq::{IdGenStatus, LockSnowflakeGenerator, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         snowseq::DEFAULT_EPOCH + 1
///     }
/// }
///
/// let generator = LockSnowflakeGenerator::with_clock(0, 1, FixedTime).unwrap();
/// match generator.try_poll_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { yield_for } => println!("Back off for {yield_for} ms"),
/// }
/// ```
///
/// [`SnowflakeGenerator::try_poll_id`]: crate::SnowflakeGenerator::try_poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID was generated.
    ///
    /// Wait `yield_for` milliseconds before trying again. `0` means the
    /// attempt lost a race and can be retried immediately.
    Pending {
        /// Milliseconds to wait before the next attempt.
        yield_for: u64,
    },
}
