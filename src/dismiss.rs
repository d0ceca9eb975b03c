//! Cancellable one-shot timer for the notification auto-dismiss.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Default time a success banner stays up
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(6);

/// A pending one-shot task. Dropping the timer cancels it.
#[derive(Debug)]
pub struct DismissTimer {
    handle: JoinHandle<()>,
}

impl DismissTimer {
    /// Run `on_fire` once `delay` has elapsed, unless cancelled first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(delay: Duration, on_fire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            on_fire.await;
        });

        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn flag() -> (Arc<AtomicBool>, impl Future<Output = ()> + Send + 'static) {
        let fired = Arc::new(AtomicBool::new(false));
        let setter = fired.clone();
        (fired, async move {
            setter.store(true, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (fired, on_fire) = flag();
        let timer = DismissTimer::schedule(DEFAULT_DISMISS_AFTER, on_fire);

        time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));

        time::sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let (fired, on_fire) = flag();
        let timer = DismissTimer::schedule(DEFAULT_DISMISS_AFTER, on_fire);
        timer.cancel();

        time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_firing() {
        let (fired, on_fire) = flag();
        {
            let _timer = DismissTimer::schedule(Duration::from_secs(1), on_fire);
        }

        time::sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
