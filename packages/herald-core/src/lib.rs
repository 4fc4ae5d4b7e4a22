//! Herald Core - embeddable publish/subscribe primitive.
//!
//! This crate provides [`EventEmitter`], a decoupling mechanism for host
//! applications: independent pieces of code register interest in named
//! events and are notified, in order, when those events occur, without the
//! publisher and subscribers knowing about each other.
//!
//! # Architecture
//!
//! The crate is organized into a few modules:
//!
//! - [`emitter`]: Listener registration, dispatch, and removal
//! - [`runtime`]: Task spawning abstraction for the deferred dispatch policy
//! - [`error`]: Centralized error types
//!
//! # Dispatch Policies
//!
//! How listener invocation is scheduled relative to `emit`'s caller is
//! chosen at construction time via [`DispatchMode`]:
//!
//! - **Inline** ([`EventEmitter::new`]): listeners run in the calling task
//!   before `emit` returns; a failing listener aborts the remaining fan-out
//!   and surfaces from `emit`.
//! - **Deferred** ([`EventEmitter::deferred`]): each invocation is scheduled
//!   onto a [`TaskSpawner`] and `emit` returns immediately; failures are
//!   logged and isolated per listener.
//!
//! # Diagnostics
//!
//! Registering more listeners than [`EmitterConfig::max_listeners`] on one
//! event name logs an advisory `tracing` warning. It is a leak-detection
//! aid and never alters behavior.

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod emitter;
pub mod error;
pub mod runtime;

// Re-export commonly used types at the crate root
pub use emitter::{DispatchMode, EmitterConfig, EventEmitter, Listener};
pub use error::{HeraldError, HeraldResult, ListenerError};
pub use runtime::{TaskSpawner, TokioSpawner};
