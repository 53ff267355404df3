//! Core abstractions for Murmur.
//!
//! Murmur's conversation state machine never touches a clock, an RNG or a
//! disk directly. This crate defines the seams it goes through instead:
//!
//! - [`Environment`]: monotonic time, wall-clock time and randomness. The
//!   production [`SystemEnv`] uses the OS; simulations plug in a virtual clock
//!   and a seeded RNG.
//! - [`storage::KeyValueStore`]: a small synchronous key-value store holding
//!   JSON-serialized values, with in-memory, file-backed and fault-injecting
//!   implementations.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod storage;
mod system_env;

pub use env::Environment;
pub use storage::{KeyValueStore, StorageError};
pub use system_env::SystemEnv;
