//! Centralized error types for the Herald core library.
//!
//! This module provides the crate-wide error handling system:
//! - Structured error types using `thiserror`
//! - Machine-readable error codes for host log integration
//! - The [`HeraldResult`] alias used across the crate

use thiserror::Error;

/// Error surfaced by a listener during dispatch.
///
/// Boxed so listeners can fail with any error type without the emitter
/// taking a dependency on it.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Application-facing error type for emitter operations.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Deferred dispatch was requested without a scheduler to run it.
    ///
    /// Raised by [`EventEmitter::deferred_current`](crate::EventEmitter::deferred_current)
    /// and [`TokioSpawner::current`](crate::TokioSpawner::current) when no
    /// tokio runtime is ambient. No partial emitter is returned.
    #[error("no async runtime available for deferred dispatch: {0}")]
    Runtime(String),

    /// A listener failed during inline dispatch.
    ///
    /// Remaining listeners in the same batch were not invoked; once-listeners
    /// captured for the batch were already consumed.
    #[error("listener for event \"{event}\" failed: {source}")]
    Listener {
        /// Event name being dispatched when the listener failed.
        event: String,
        /// The error the listener surfaced.
        source: ListenerError,
    },
}

impl HeraldError {
    /// Returns a machine-readable error code for host logs and diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Runtime(_) => "runtime_unavailable",
            Self::Listener { .. } => "listener_failed",
        }
    }
}

/// Convenient Result alias for emitter operations.
pub type HeraldResult<T> = Result<T, HeraldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_returns_correct_code() {
        let err = HeraldError::Runtime("no reactor".into());
        assert_eq!(err.code(), "runtime_unavailable");
        assert!(err.to_string().contains("no reactor"));
    }

    #[test]
    fn listener_error_names_the_event() {
        let err = HeraldError::Listener {
            event: "topology".into(),
            source: "boom".into(),
        };
        assert_eq!(err.code(), "listener_failed");
        assert!(err.to_string().contains("\"topology\""));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn listener_error_exposes_source() {
        let err = HeraldError::Listener {
            event: "x".into(),
            source: "inner".into(),
        };
        let source = std::error::Error::source(&err).expect("source present");
        assert_eq!(source.to_string(), "inner");
    }
}
