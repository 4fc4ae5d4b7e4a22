//! Listener handles and their identity semantics.

use std::fmt;
use std::sync::Arc;

use crate::error::ListenerError;

type ListenerFn<P> = dyn Fn(P) -> Result<(), ListenerError> + Send + Sync;

/// A unit of behavior registered against an event name.
///
/// `Listener` is a cheap cloneable handle; clones share identity, and removal
/// via [`EventEmitter::off`](crate::EventEmitter::off) matches on that
/// identity. Keep a clone of the handle if you intend to detach the listener
/// later. Two handles built from identical closures are distinct listeners,
/// just as two separate function expressions are in other emitter APIs.
pub struct Listener<P> {
    callback: Arc<ListenerFn<P>>,
}

impl<P> Listener<P> {
    /// Wraps an infallible callback.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(P) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(move |payload| {
                f(payload);
                Ok(())
            }),
        }
    }

    /// Wraps a callback that may fail.
    ///
    /// Under inline dispatch the error aborts the remaining fan-out and
    /// surfaces from `emit`; under deferred dispatch it is logged and the
    /// failure stays isolated to this listener.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(P) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(f),
        }
    }

    /// Invokes the callback with the given payload.
    pub(crate) fn call(&self, payload: P) -> Result<(), ListenerError> {
        (self.callback)(payload)
    }

    /// Whether two handles refer to the same registered value.
    pub(crate) fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}
