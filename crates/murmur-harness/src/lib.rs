//! Deterministic simulation harness for Murmur.
//!
//! Virtual-clock [`SimEnv`] and scripted [`SimDriver`] let the production
//! [`murmur_app::Runtime`] run reproducibly in tests.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of the
//! conversation bookkeeping. [`Operation`]s are applied to both the model and
//! the real app, and their observable states compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module verifies WHAT must be true across all execution
//! paths, not specific scenarios. Use [`InvariantRegistry::standard()`] for
//! every standard check.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod operation;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    ContactReferencesKnown, Invariant, InvariantRegistry, InvariantResult, MessageIdsIncreasing,
    NotificationIdsIncreasing, SelectedContactKnown, SelectedHasNoUnread, StatusMonotonicity,
    StatusOnlyForSent, SystemSnapshot, Violation,
};
pub use model::{ModelWorld, ObservableState};
pub use operation::{Operation, SmallText};
pub use sim_driver::{SimDriver, SimDriverError, SimProbe};
pub use sim_env::{SIM_EPOCH_MILLIS, SimEnv, SimInstant};
