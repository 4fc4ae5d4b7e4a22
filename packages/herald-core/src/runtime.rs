//! Task spawning abstraction for runtime independence.
//!
//! Deferred dispatch schedules each listener invocation onto a task queue
//! instead of running it inline. The [`TaskSpawner`] trait keeps the emitter
//! independent of any particular async runtime: hosts with their own
//! scheduler implement the trait, while tokio hosts use [`TokioSpawner`].

use futures::future::BoxFuture;

use crate::error::{HeraldError, HeraldResult};

/// Abstraction for scheduling background work.
///
/// Implementations must run each submitted future to completion exactly once.
/// There is no cancellation or join surface; once scheduled, an invocation
/// always eventually runs (or fails) on its own.
///
/// # Example
///
/// ```ignore
/// let emitter = EventEmitter::deferred(Arc::new(MySpawner));
/// ```
pub trait TaskSpawner: Send + Sync {
    /// Schedules a future as an independent background task.
    fn spawn(&self, future: BoxFuture<'static, ()>);
}

/// Tokio-based spawner, the stock implementation for tokio hosts.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    /// Creates a spawner for the given runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Creates a spawner for the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Runtime`] when called outside of a tokio
    /// runtime context.
    pub fn current() -> HeraldResult<Self> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| HeraldError::Runtime(e.to_string()))?;
        Ok(Self { handle })
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self.handle.spawn(future);
    }
}
