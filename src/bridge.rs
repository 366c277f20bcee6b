//! Running async work from synchronous code.

use std::future::Future;

use thiserror::Error;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to start a runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("blocking bridge called from inside an async context")]
    InsideRuntime,

    #[error("task was dropped before completing")]
    Cancelled,
}

/// How a synchronous caller reaches async collaborators.
///
/// The caller picks the case explicitly; both return the future's output
/// unchanged.
#[derive(Debug, Clone)]
pub enum BlockingBridge {
    /// No runtime exists: run the future to completion on a throwaway
    /// current-thread runtime.
    Standalone,
    /// A runtime is already running elsewhere in the process: schedule onto it
    /// and park the calling thread until the result comes back.
    Attached(Handle),
}

impl BlockingBridge {
    pub fn run<F>(&self, future: F) -> Result<F::Output, BridgeError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        // Blocking a runtime worker would stall (or panic) the runtime itself.
        if Handle::try_current().is_ok() {
            return Err(BridgeError::InsideRuntime);
        }

        match self {
            BlockingBridge::Standalone => {
                let runtime = Builder::new_current_thread().enable_all().build()?;
                Ok(runtime.block_on(future))
            }
            BlockingBridge::Attached(handle) => {
                let (tx, rx) = oneshot::channel();
                handle.spawn(async move {
                    let _ = tx.send(future.await);
                });
                rx.blocking_recv().map_err(|_| BridgeError::Cancelled)
            }
        }
    }
}
