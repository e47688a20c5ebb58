use core::{future::Future, time::Duration};

/// A trait that abstracts over how to wait for a given [`Duration`] in async
/// contexts.
///
/// This keeps the async generation loop independent of the runtime.
pub trait SleepProvider {
    /// The returned future is `Send` so the generation future can move
    /// across worker threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
