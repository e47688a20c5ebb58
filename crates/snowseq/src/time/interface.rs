use std::sync::Arc;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// Generators read the clock once per attempt and compare it against the
/// last issued timestamp, so the source must be able to report time going
/// backwards: that is how clock rollback is detected. Tests plug in mocked
/// sources to drive the generator through every branch.
///
/// # Example
///
/// ```
/// use snowseq::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
