use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The host's wall clock.
///
/// Each call reads `SystemTime::now()`. Wall-clock time can be stepped
/// backwards (NTP corrections, manual changes), which the generators detect
/// and report instead of issuing a duplicate.
///
/// A system clock set before 1970 reads as `0`, which then fails the epoch
/// check of any generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
