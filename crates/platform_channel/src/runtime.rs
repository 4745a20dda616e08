use std::future::Future;

use once_cell::sync::OnceCell;
use tokio::runtime::{Handle, Runtime};

static FALLBACK_RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Builds the fallback runtime on first use.
fn fallback_runtime() -> &'static Runtime {
    FALLBACK_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("platform-channel")
            .build()
            .expect("failed to build fallback tokio runtime")
    })
}

/// Spawns `fut` on the ambient runtime, or on a lazily built fallback when
/// the caller is not inside one (transports are free to call in from plain
/// threads).
pub fn spawn_detached<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(fut);
        }
        Err(_) => {
            fallback_runtime().spawn(fut);
        }
    }
}
