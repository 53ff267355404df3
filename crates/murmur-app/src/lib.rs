//! Application layer for Murmur
//!
//! Pure state machine and generic runtime for a single-user messaging front
//! end, enabling deterministic simulation testing with the same code that runs
//! in production.
//!
//! # Components
//!
//! - [`App`]: conversation state machine (messages, delivery, unread counts,
//!   favorites, typing, notifications, routes)
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using a Driver and a store
//! - [`persist`]: mapping between app state and the key-value store

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod driver;
mod event;
pub mod notifications;
pub mod persist;
pub mod route;
mod runtime;
pub mod search;
mod state;
pub mod timers;
pub mod typing;

pub use action::{AppAction, StoreKey};
pub use app::App;
pub use config::{AppConfig, ConfigError, Seed};
pub use driver::Driver;
pub use event::AppEvent;
pub use route::Route;
pub use runtime::Runtime;
pub use search::{ContactSummary, SortMode};
pub use state::{
    AppState, Contact, ContactId, DeliveryPhase, DeliveryStatus, Message, MessageId, Notification,
    NotificationKind, Sender, UserSettings, display_timestamp,
};
