/// Twitter epoch: Thursday, November 4, 2010 01:42:54.657 UTC
pub const TWITTER_EPOCH: u64 = 1_288_834_974_657;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: u64 = 0;

/// The epoch every generator uses unless configured otherwise.
///
/// All generators whose IDs are compared by time must share this value. The
/// 41-bit timestamp field measured from it runs out in July 2080.
pub const DEFAULT_EPOCH: u64 = TWITTER_EPOCH;
