use std::future::Future;
use std::time::Duration;

/// Spawns a background task on the page's event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Spawns a background task on the ambient tokio runtime, or on a shared background runtime when
/// the caller is not inside one.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    use std::sync::LazyLock;
    use tokio::runtime::{Builder, Handle, Runtime};

    // A current-thread runtime would never be driven from outside, so the fallback owns a worker.
    static BACKGROUND_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("entrolytics-poller")
            .enable_time()
            .build()
            .expect("failed to build background tokio runtime")
    });

    if let Ok(handle) = Handle::try_current() {
        handle.spawn(future);
    } else {
        let _ = BACKGROUND_RUNTIME.spawn(future);
    }
}

/// Asynchronously waits for the provided duration in a platform-compatible way.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    sleep_impl(duration).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep_impl(duration: Duration) {
    use gloo_timers::future::sleep;
    sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_impl(duration: Duration) {
    use tokio::time::sleep;
    sleep(duration).await;
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn spawn_detached_runs_without_ambient_runtime() {
        let (tx, rx) = mpsc::channel();
        spawn_detached(async move {
            sleep(Duration::from_millis(1)).await;
            let _ = tx.send(42);
        });
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(42));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn spawn_detached_uses_current_runtime() {
        let (tx, rx) = futures::channel::oneshot::channel();
        spawn_detached(async move {
            let _ = tx.send("done");
        });
        assert_eq!(rx.await, Ok("done"));
    }
}
