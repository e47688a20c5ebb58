use core::{future::Future, time::Duration};

use crate::{
    SnowflakeGenerator, SnowflakeId,
    error::Result,
    futures::{SleepProvider, SnowflakeGeneratorAsyncExt},
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        ::tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`TokioSleep`]) is often
/// more efficient due to reduced scheduler churn.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        ::tokio::task::yield_now()
    }
}

/// Extension trait for asynchronously generating Snowflake IDs using the
/// [`tokio`](https://docs.rs/tokio) async runtime.
///
/// Fixes the sleep provider of [`SnowflakeGeneratorAsyncExt`] to
/// [`TokioSleep`].
pub trait SnowflakeGeneratorAsyncTokioExt {
    /// Returns a future that resolves to the next available Snowflake ID using
    /// [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn try_next_id_async(&self) -> impl Future<Output = Result<SnowflakeId>> + Send;
}

impl<G> SnowflakeGeneratorAsyncTokioExt for G
where
    G: SnowflakeGenerator + Sync,
{
    fn try_next_id_async(&self) -> impl Future<Output = Result<SnowflakeId>> + Send {
        <Self as SnowflakeGeneratorAsyncExt>::try_next_id_async::<TokioSleep>(self)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
    };

    use futures::future::try_join_all;

    use super::*;
    use crate::{
        AtomicSnowflakeGenerator, DEFAULT_EPOCH, Error, LockSnowflakeGenerator, TimeSource,
    };

    const TOTAL_IDS: usize = 4096;
    const NUM_GENERATORS: u64 = 8;
    const IDS_PER_GENERATOR: usize = TOTAL_IDS * 8; // Enough to hit Pending several times

    /// Stays on one millisecond for `reads` reads, then moves forward one
    /// millisecond per read.
    struct SlowClock {
        reads: u64,
        seen: AtomicU64,
    }

    impl TimeSource for SlowClock {
        fn current_millis(&self) -> u64 {
            let seen = self.seen.fetch_add(1, Ordering::SeqCst);
            DEFAULT_EPOCH + seen.saturating_sub(self.reads)
        }
    }

    struct BehindClock;

    impl TimeSource for BehindClock {
        fn current_millis(&self) -> u64 {
            DEFAULT_EPOCH - 1
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn lock_can_call_next_id_async() {
        let generator = LockSnowflakeGenerator::new(0, 0).unwrap();
        let first = SnowflakeGeneratorAsyncTokioExt::try_next_id_async(&generator)
            .await
            .unwrap();
        let second = SnowflakeGeneratorAsyncExt::try_next_id_async::<TokioYield>(&generator)
            .await
            .unwrap();
        assert!(first < second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn atomic_can_call_next_id_async() {
        let generator = AtomicSnowflakeGenerator::new(0, 0).unwrap();
        let first = SnowflakeGeneratorAsyncTokioExt::try_next_id_async(&generator)
            .await
            .unwrap();
        let second = SnowflakeGeneratorAsyncExt::try_next_id_async::<TokioYield>(&generator)
            .await
            .unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn waits_out_exhausted_millisecond() {
        let clock = SlowClock {
            reads: TOTAL_IDS as u64 + 1,
            seen: AtomicU64::new(0),
        };
        let generator = LockSnowflakeGenerator::with_clock(1, 1, clock).unwrap();
        for _ in 0..TOTAL_IDS {
            let id = SnowflakeGeneratorAsyncTokioExt::try_next_id_async(&generator)
                .await
                .unwrap();
            assert_eq!(id.timestamp(), 0);
        }
        let id = SnowflakeGeneratorAsyncTokioExt::try_next_id_async(&generator)
            .await
            .unwrap();
        assert_eq!(id.timestamp(), 1);
        assert_eq!(id.sequence(), 0);
    }

    #[tokio::test]
    async fn errors_propagate() {
        let generator = AtomicSnowflakeGenerator::with_clock(1, 1, BehindClock).unwrap();
        let err = SnowflakeGeneratorAsyncTokioExt::try_next_id_async(&generator)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ClockBeforeEpoch { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_lock_sleep() -> Result<()> {
        test_many_unique_ids::<_, TokioSleep>(|worker_id| {
            LockSnowflakeGenerator::new(0, worker_id)
        })
        .await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_lock_yield() -> Result<()> {
        test_many_unique_ids::<_, TokioYield>(|worker_id| {
            LockSnowflakeGenerator::new(0, worker_id)
        })
        .await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_atomic_sleep() -> Result<()> {
        test_many_unique_ids::<_, TokioSleep>(|worker_id| {
            AtomicSnowflakeGenerator::new(0, worker_id)
        })
        .await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_atomic_yield() -> Result<()> {
        test_many_unique_ids::<_, TokioYield>(|worker_id| {
            AtomicSnowflakeGenerator::new(0, worker_id)
        })
        .await
    }

    async fn test_many_unique_ids<G, S>(make_generator: impl Fn(u64) -> Result<G>) -> Result<()>
    where
        G: SnowflakeGenerator + Send + Sync + 'static,
        S: SleepProvider,
    {
        let generators = (0..NUM_GENERATORS)
            .map(|worker_id| make_generator(worker_id).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        let tasks = generators.into_iter().map(|generator| async move {
            let mut ids = Vec::with_capacity(IDS_PER_GENERATOR);
            for _ in 0..IDS_PER_GENERATOR {
                let id = SnowflakeGeneratorAsyncExt::try_next_id_async::<S>(&*generator).await?;
                ids.push(id);
            }
            Ok::<_, Error>(ids)
        });

        let all_ids = try_join_all(tasks).await?;

        let mut seen = HashSet::with_capacity(IDS_PER_GENERATOR * NUM_GENERATORS as usize);
        for ids in all_ids {
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            for id in ids {
                assert!(seen.insert(id), "duplicate ID: {id}");
            }
        }
        assert_eq!(seen.len(), IDS_PER_GENERATOR * NUM_GENERATORS as usize);
        Ok(())
    }
}
