use core::{future::Future, time::Duration};

use super::SleepProvider;
use crate::{IdGenStatus, SnowflakeGenerator, SnowflakeId, error::Result};

/// Extension trait for generating Snowflake IDs without blocking an async
/// runtime's worker thread.
///
/// Instead of spinning when the current millisecond's sequence is spent, the
/// future waits through the given [`SleepProvider`] and polls again.
pub trait SnowflakeGeneratorAsyncExt {
    /// Returns a future that resolves to the next available Snowflake ID.
    ///
    /// # Errors
    ///
    /// The future resolves to the generator's error if an attempt fails, for
    /// example [`Error::ClockRolledBack`]. Failed attempts are not retried.
    ///
    /// [`Error::ClockRolledBack`]: crate::Error::ClockRolledBack
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>> + Send
    where
        S: SleepProvider;
}

impl<G> SnowflakeGeneratorAsyncExt for G
where
    G: SnowflakeGenerator + Sync,
{
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>> + Send
    where
        S: SleepProvider,
    {
        async move {
            loop {
                let dur = match self.try_poll_id()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
