//! The event emitter: listener registration, dispatch, and removal.
//!
//! This module provides:
//! - [`EventEmitter`] owning all listener state for a single instance
//! - [`Listener`] cloneable handles with per-registration identity
//! - [`DispatchMode`] selecting inline or deferred invocation
//! - [`EmitterConfig`] for the leak-warning threshold

mod dispatch;
mod listener;
mod registry;

pub use self::dispatch::DispatchMode;
pub use self::listener::Listener;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::HeraldResult;
use crate::runtime::{TaskSpawner, TokioSpawner};
use self::registry::{ListenerKind, Registry, DEFAULT_MAX_LISTENERS};

/// Configuration for emitter diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Leak-warning threshold per event name; `0` disables the check.
    ///
    /// Exceeding the threshold only logs a warning, it never alters
    /// behavior. The default of 10 is a useful aid for spotting accidental
    /// unbounded listener accumulation; raise it for emitters that
    /// legitimately fan out wider.
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

/// In-process publish/subscribe primitive over named events.
///
/// Independent pieces of code register interest in string-named events and
/// are notified, in registration order, when those events are emitted. The
/// emitter is an explicitly owned value: each subsystem holds its own
/// instance or receives one by injection; there is no ambient singleton.
///
/// Cloning is cheap and clones share listener state, so an emitter can be
/// handed to producers and consumers alike.
///
/// The payload is a single generic value per event (use a tuple when an
/// event carries several); listeners receive their own clone of it.
///
/// # Example
///
/// ```
/// use herald_core::{EventEmitter, Listener};
///
/// let emitter: EventEmitter<String> = EventEmitter::new();
/// emitter.on("greeting", Listener::new(|who: String| {
///     println!("hello {who}");
/// }));
/// let had_listeners = emitter.emit("greeting", "world".to_string())?;
/// assert!(had_listeners);
/// # Ok::<(), herald_core::HeraldError>(())
/// ```
pub struct EventEmitter<P> {
    registry: Arc<Mutex<Registry<P>>>,
    dispatch: DispatchMode,
}

impl<P> Clone for EventEmitter<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<P> fmt::Debug for EventEmitter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}

impl<P: Clone + Send + 'static> Default for EventEmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + Send + 'static> EventEmitter<P> {
    /// Creates an emitter that runs listeners inline during [`emit`](Self::emit).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an inline emitter with a custom configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self::with_dispatch(config, DispatchMode::Inline)
    }

    /// Creates an emitter that schedules each listener invocation onto
    /// `spawner` instead of running it inline.
    #[must_use]
    pub fn deferred(spawner: Arc<dyn TaskSpawner>) -> Self {
        Self::deferred_with_config(EmitterConfig::default(), spawner)
    }

    /// Creates a deferred emitter with a custom configuration.
    #[must_use]
    pub fn deferred_with_config(config: EmitterConfig, spawner: Arc<dyn TaskSpawner>) -> Self {
        Self::with_dispatch(config, DispatchMode::Deferred(spawner))
    }

    /// Creates a deferred emitter scheduling onto the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Runtime`](crate::HeraldError::Runtime) when
    /// called outside of a tokio runtime context; no partial emitter is
    /// returned.
    pub fn deferred_current() -> HeraldResult<Self> {
        Ok(Self::deferred(Arc::new(TokioSpawner::current()?)))
    }

    /// Creates an emitter with an explicit dispatch policy.
    #[must_use]
    pub fn with_dispatch(config: EmitterConfig, dispatch: DispatchMode) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new(config.max_listeners))),
            dispatch,
        }
    }

    /// Replaces the leak-warning threshold; `0` disables the check.
    pub fn set_max_listeners(&self, n: usize) {
        self.registry.lock().set_max_listeners(n);
    }

    /// Appends `listener` to the persistent list for `event`.
    ///
    /// Duplicate registrations of the same handle are independent entries;
    /// no deduplication happens. Returns the emitter for chaining.
    pub fn on(&self, event: &str, listener: Listener<P>) -> &Self {
        self.add(ListenerKind::Persistent, event, listener)
    }

    /// Appends `listener` to the once-list for `event`.
    ///
    /// The listener fires on the next matching emission and is removed
    /// before it runs. Returns the emitter for chaining.
    pub fn once(&self, event: &str, listener: Listener<P>) -> &Self {
        self.add(ListenerKind::Once, event, listener)
    }

    fn add(&self, kind: ListenerKind, event: &str, listener: Listener<P>) -> &Self {
        let warning = self.registry.lock().add(kind, event, listener);
        if let Some(message) = warning {
            warn!("{message}");
        }
        self
    }

    /// Announces `event` with `payload`, dispatching per the emitter's mode.
    ///
    /// The once-list for `event` is consumed atomically before any listener
    /// runs, and the persistent list is snapshotted at the same instant:
    /// listeners registered during dispatch fire on the next emission, and a
    /// once-listener re-registering itself is not part of the in-flight
    /// batch. Persistent listeners run first, then the captured
    /// once-listeners, each group in registration order.
    ///
    /// Returns whether any listener was invoked (inline) or scheduled
    /// (deferred).
    ///
    /// # Errors
    ///
    /// Under [`DispatchMode::Inline`], the first listener failure surfaces
    /// here and the remaining fan-out for this call is skipped.
    pub fn emit(&self, event: &str, payload: P) -> HeraldResult<bool> {
        let batch = {
            let mut registry = self.registry.lock();
            let mut batch = registry.snapshot_on(event);
            batch.extend(registry.take_once(event));
            batch
        };
        // Lock released: listeners may freely re-enter the emitter.
        let count = self.dispatch.run(event, batch, &payload)?;
        Ok(count > 0)
    }

    /// Removes at most one occurrence of `listener` from each of the
    /// persistent and once lists for `event` (first match in order).
    ///
    /// Removal is per-registration, not per-value: a handle registered
    /// twice needs two calls to detach fully.
    pub fn off(&self, event: &str, listener: &Listener<P>) {
        self.registry.lock().remove_one(event, listener);
    }

    /// Removes every listener for `event`, persistent and once alike.
    /// Other events are unaffected.
    pub fn off_event(&self, event: &str) {
        self.registry.lock().clear_event(event);
    }

    /// Removes every listener for every event.
    pub fn off_all(&self) {
        self.registry.lock().clear_all();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Aliases (pure naming, for hosts used to the wider emitter vocabulary)
    // ─────────────────────────────────────────────────────────────────────

    /// Alias for [`on`](Self::on).
    pub fn add_listener(&self, event: &str, listener: Listener<P>) -> &Self {
        self.on(event, listener)
    }

    /// Alias for [`once`](Self::once).
    pub fn one(&self, event: &str, listener: Listener<P>) -> &Self {
        self.once(event, listener)
    }

    /// Alias for [`emit`](Self::emit).
    ///
    /// # Errors
    ///
    /// Same as [`emit`](Self::emit).
    pub fn trigger(&self, event: &str, payload: P) -> HeraldResult<bool> {
        self.emit(event, payload)
    }

    /// Alias for [`off`](Self::off).
    pub fn remove_listener(&self, event: &str, listener: &Listener<P>) {
        self.off(event, listener);
    }

    /// Removes all listeners for `event`, or for every event when `None`.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        match event {
            Some(event) => self.off_event(event),
            None => self.off_all(),
        }
    }
}
