//! Whole-module usage collection on a background thread.
//!
//! The task holds a read lock on the module for as long as it runs. There is
//! no way to cancel it; a writer waiting on the lock waits for the pass to
//! finish.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::debug;

use crate::graph::Module;

use super::{UsageError, UsageMap, collect_usage};

/// Handle on a running [`spawn_usage_collection`] pass. Delivers exactly one
/// result.
#[derive(Debug)]
pub struct UsageTask {
    receiver: oneshot::Receiver<Result<UsageMap, UsageError>>,
}

impl UsageTask {
    /// Block until the pass finishes.
    ///
    /// Must not be called from within an async runtime; poll or `.await` the
    /// receiver through [`UsageTask::into_receiver`] there instead.
    pub fn wait(self) -> Result<UsageMap, UsageError> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(UsageError::TaskDropped))
    }

    /// The result, if the pass has finished. Returns `None` while it runs.
    /// Once a result has been returned the task is spent and further polls
    /// report [`UsageError::TaskDropped`].
    pub fn poll(&mut self) -> Option<Result<UsageMap, UsageError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(UsageError::TaskDropped)),
        }
    }

    pub fn into_receiver(self) -> oneshot::Receiver<Result<UsageMap, UsageError>> {
        self.receiver
    }
}

/// Collect usage for every symbol of `module` on the rayon pool.
pub fn spawn_usage_collection(module: Arc<RwLock<Module>>) -> UsageTask {
    let (sender, receiver) = oneshot::channel();
    rayon::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let guard = module.read();
            collect_usage(&guard)
        }))
        .map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            UsageError::Panicked(message)
        });
        if sender.send(result).is_err() {
            debug!("[USAGE] background result dropped: receiver gone");
        }
    });
    UsageTask { receiver }
}
