//! Generic remote-data controller for the Scan-AI and ERP frontends.
//!
//! One [`Fetcher`] instance binds a single API operation and owns the
//! loading/error state for it, the way a data-fetching hook does in a
//! component tree. On top of the plain call it layers:
//!
//! - optional per-instance response caching with TTL expiry,
//! - bounded fixed-delay retry that never retries auth failures,
//! - cooperative cancellation: starting a new call, `cancel()`, or
//!   `unmount()` strips the in-flight call of its ability to write state.
//!
//! The controller is single-threaded (`Rc`/`RefCell` state, matching the
//! browser event-loop model) and framework-agnostic; a component hook
//! wires `mount`/`unmount` to its own lifecycle.

mod cache;
pub mod error;
mod hook;
mod lifecycle;
mod platform;
pub mod retry;
pub mod state;
pub mod time;

pub use error::{ErrorKind, FetchError};
pub use hook::{FetchOptions, Fetcher};
pub use retry::RetryPolicy;
pub use state::{RequestState, StateHandle};
