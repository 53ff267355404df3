//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from a specific
//! front end. Each front end implements it to provide input and rendering,
//! while the generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use murmur_core::Environment;

use crate::{App, AppEvent, route::Route, state::ContactId};

/// Abstracts I/O operations for the application runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm for input, ratatui for drawing
/// - **Simulation**: scripted events and virtual time
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for input and translate it into app events.
    ///
    /// `app` is the current state, for input that depends on it (the open
    /// conversation, the visible contact order). Returns an empty vector if
    /// nothing arrived before the driver's poll timeout.
    fn poll_event<E: Environment>(
        &mut self,
        app: &App<E>,
    ) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error>;

    /// The local user started or stopped typing. Default: ignored.
    fn typing_changed(&mut self, contact_id: ContactId, typing: bool) {
        let _ = (contact_id, typing);
    }

    /// Navigation landed somewhere other than the requested path, e.g. a
    /// front end showing an address bar should now show `route`. Default:
    /// ignored.
    fn redirected(&mut self, route: Route) {
        let _ = route;
    }

    /// Release resources before exit.
    fn stop(&mut self);
}
