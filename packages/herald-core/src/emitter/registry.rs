//! Per-event listener bookkeeping.
//!
//! The registry owns both listener lists and the leak-warning threshold.
//! It never invokes listeners; dispatch works on snapshots taken from here
//! so no lock is held while listener code runs.

use std::collections::HashMap;
use std::mem;

use super::listener::Listener;

/// Default leak-warning threshold per event name.
pub(crate) const DEFAULT_MAX_LISTENERS: usize = 10;

/// Which of the two listener lists an operation targets.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ListenerKind {
    /// Survives every emission until removed.
    Persistent,
    /// Consumed by the first matching emission.
    Once,
}

pub(crate) struct Registry<P> {
    on: HashMap<String, Vec<Listener<P>>>,
    once: HashMap<String, Vec<Listener<P>>>,
    max_listeners: usize,
}

impl<P> Registry<P> {
    pub(crate) fn new(max_listeners: usize) -> Self {
        Self {
            on: HashMap::new(),
            once: HashMap::new(),
            max_listeners,
        }
    }

    pub(crate) fn set_max_listeners(&mut self, n: usize) {
        self.max_listeners = n;
    }

    /// Appends a listener, creating the list lazily.
    ///
    /// Duplicate handles are kept as independent entries. Returns the leak
    /// warning to log if the new list length tripped the threshold.
    pub(crate) fn add(
        &mut self,
        kind: ListenerKind,
        event: &str,
        listener: Listener<P>,
    ) -> Option<String> {
        let map = match kind {
            ListenerKind::Persistent => &mut self.on,
            ListenerKind::Once => &mut self.once,
        };
        let list = map.entry(event.to_string()).or_default();
        list.push(listener);
        leak_warning(event, list.len(), self.max_listeners)
    }

    /// Removes at most one occurrence of `listener` from each of the
    /// persistent and once lists for `event`, scanning in insertion order.
    pub(crate) fn remove_one(&mut self, event: &str, listener: &Listener<P>) {
        for map in [&mut self.on, &mut self.once] {
            if let Some(list) = map.get_mut(event) {
                if let Some(pos) = list.iter().position(|l| l.same_handle(listener)) {
                    list.remove(pos);
                }
            }
        }
    }

    /// Clears both lists for `event`; other events are untouched.
    pub(crate) fn clear_event(&mut self, event: &str) {
        self.on.remove(event);
        self.once.remove(event);
    }

    /// Clears every listener for every event.
    pub(crate) fn clear_all(&mut self) {
        self.on.clear();
        self.once.clear();
    }

    /// Clones the persistent list for `event` as of now.
    ///
    /// Listeners registered after this point fire on the next emission, not
    /// the one in flight.
    pub(crate) fn snapshot_on(&self, event: &str) -> Vec<Listener<P>> {
        self.on.get(event).cloned().unwrap_or_default()
    }

    /// Takes the entire once-list for `event`, leaving it empty.
    ///
    /// The swap happens before any listener runs, so a once-listener
    /// re-registered during its own execution lands in the fresh list.
    pub(crate) fn take_once(&mut self, event: &str) -> Vec<Listener<P>> {
        self.once.get_mut(event).map(mem::take).unwrap_or_default()
    }
}

/// Builds the advisory leak warning when `count` exceeds a positive threshold.
///
/// Purely diagnostic; a high listener count on one event name usually means
/// a registration inside a loop or a repeatedly-invoked setup path.
fn leak_warning(event: &str, count: usize, max_listeners: usize) -> Option<String> {
    (max_listeners > 0 && count > max_listeners).then(|| {
        format!(
            "possible EventEmitter memory leak detected: {count} listeners added on event \
             \"{event}\". Use set_max_listeners() to increase limit ({max_listeners})"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn noop() -> Listener<u32> {
        Listener::new(|_| {})
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for tag in 0..4 {
            let order = order.clone();
            registry.add(
                ListenerKind::Persistent,
                "test",
                Listener::new(move |_| order.lock().push(tag)),
            );
        }

        for listener in registry.snapshot_on("test") {
            listener.call(0).unwrap();
        }
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn duplicate_handles_are_independent_entries() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        let listener = noop();
        registry.add(ListenerKind::Persistent, "test", listener.clone());
        registry.add(ListenerKind::Persistent, "test", listener.clone());
        registry.add(ListenerKind::Persistent, "test", listener.clone());
        assert_eq!(registry.snapshot_on("test").len(), 3);
    }

    #[test]
    fn remove_one_takes_a_single_occurrence_from_each_list() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        let known = noop();
        for _ in 0..3 {
            registry.add(ListenerKind::Persistent, "test", known.clone());
            registry.add(ListenerKind::Once, "test", known.clone());
        }

        registry.remove_one("test", &known);
        assert_eq!(registry.snapshot_on("test").len(), 2);
        assert_eq!(registry.take_once("test").len(), 2);
    }

    #[test]
    fn remove_one_ignores_unknown_handles() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        registry.add(ListenerKind::Persistent, "test", noop());
        registry.remove_one("test", &noop());
        assert_eq!(registry.snapshot_on("test").len(), 1);
    }

    #[test]
    fn clear_event_leaves_other_events_alone() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        registry.add(ListenerKind::Persistent, "a", noop());
        registry.add(ListenerKind::Once, "a", noop());
        registry.add(ListenerKind::Persistent, "b", noop());

        registry.clear_event("a");
        assert!(registry.snapshot_on("a").is_empty());
        assert!(registry.take_once("a").is_empty());
        assert_eq!(registry.snapshot_on("b").len(), 1);
    }

    #[test]
    fn clear_all_resets_both_maps() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        registry.add(ListenerKind::Persistent, "a", noop());
        registry.add(ListenerKind::Once, "b", noop());

        registry.clear_all();
        assert!(registry.snapshot_on("a").is_empty());
        assert!(registry.take_once("b").is_empty());
    }

    #[test]
    fn take_once_empties_the_list() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        registry.add(
            ListenerKind::Once,
            "test",
            Listener::new(move |_| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let taken = registry.take_once("test");
        assert_eq!(taken.len(), 1);
        assert!(registry.take_once("test").is_empty());
        for listener in taken {
            listener.call(0).unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn leak_warning_fires_exactly_past_the_threshold() {
        let mut registry: Registry<u32> = Registry::new(DEFAULT_MAX_LISTENERS);
        let mut warnings = 0;
        for _ in 0..11 {
            if registry.add(ListenerKind::Persistent, "test", noop()).is_some() {
                warnings += 1;
            }
        }
        // Only the 11th registration trips the default threshold of 10.
        assert_eq!(warnings, 1);
    }

    #[test]
    fn leak_warning_names_event_count_and_limit() {
        let message = leak_warning("volume", 11, 10).expect("over threshold");
        assert!(message.contains("\"volume\""));
        assert!(message.contains("11"));
        assert!(message.contains("(10)"));
    }

    #[test]
    fn zero_threshold_disables_the_warning() {
        let mut registry: Registry<u32> = Registry::new(0);
        for _ in 0..50 {
            assert!(registry.add(ListenerKind::Once, "test", noop()).is_none());
        }
    }

    #[test]
    fn threshold_applies_per_list() {
        let mut registry: Registry<u32> = Registry::new(2);
        registry.add(ListenerKind::Persistent, "test", noop());
        registry.add(ListenerKind::Persistent, "test", noop());
        // The once-list has its own count; two persistent listeners do not
        // push the first once registration over the limit.
        assert!(registry.add(ListenerKind::Once, "test", noop()).is_none());
        assert!(registry.add(ListenerKind::Persistent, "test", noop()).is_some());
    }
}
