//! Listener invocation policies.
//!
//! The emitter itself is a passive data structure; the only concurrency
//! question is how listener invocation is scheduled relative to `emit`'s
//! caller. Both policies run listeners in registration order and are chosen
//! at construction time.

use std::fmt;
use std::sync::Arc;

use tracing::error;

use super::listener::Listener;
use crate::error::{HeraldError, HeraldResult};
use crate::runtime::TaskSpawner;

/// How `emit` runs listeners relative to its caller.
#[derive(Clone)]
pub enum DispatchMode {
    /// Every listener runs inline, in the calling task, before `emit`
    /// returns. The first failing listener aborts the remaining fan-out and
    /// its error surfaces from `emit`.
    Inline,
    /// Every listener invocation is scheduled onto the spawner as its own
    /// task (one scheduling operation per listener); `emit` returns after
    /// scheduling without waiting for any listener to run. A failing
    /// listener is logged and isolated from its siblings and from the
    /// caller of `emit`.
    Deferred(Arc<dyn TaskSpawner>),
}

impl fmt::Debug for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("Inline"),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl DispatchMode {
    /// Runs `batch` in order with clones of `payload`.
    ///
    /// Returns how many listeners were invoked (inline) or scheduled
    /// (deferred).
    pub(crate) fn run<P>(
        &self,
        event: &str,
        batch: Vec<Listener<P>>,
        payload: &P,
    ) -> HeraldResult<usize>
    where
        P: Clone + Send + 'static,
    {
        match self {
            Self::Inline => run_inline(event, batch, payload),
            Self::Deferred(spawner) => Ok(run_deferred(spawner.as_ref(), event, batch, payload)),
        }
    }
}

fn run_inline<P: Clone>(
    event: &str,
    batch: Vec<Listener<P>>,
    payload: &P,
) -> HeraldResult<usize> {
    let mut count = 0;
    for listener in batch {
        listener
            .call(payload.clone())
            .map_err(|source| HeraldError::Listener {
                event: event.to_string(),
                source,
            })?;
        count += 1;
    }
    Ok(count)
}

fn run_deferred<P>(
    spawner: &dyn TaskSpawner,
    event: &str,
    batch: Vec<Listener<P>>,
    payload: &P,
) -> usize
where
    P: Clone + Send + 'static,
{
    let count = batch.len();
    for listener in batch {
        let payload = payload.clone();
        let event = event.to_string();
        spawner.spawn(Box::pin(async move {
            if let Err(err) = listener.call(payload) {
                error!(event = %event, error = %err, "deferred listener failed");
            }
        }));
    }
    count
}
