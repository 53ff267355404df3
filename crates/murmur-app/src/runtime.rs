//! Generic runtime for application orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`App`]: conversation state machine
//! - [`Driver`]: platform-specific input and rendering
//! - [`KeyValueStore`]: persisted state

use murmur_core::{Environment, KeyValueStore};

use crate::{App, AppAction, AppEvent, Driver, persist};

/// Generic runtime that orchestrates App, Driver and store.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time and randomness
/// - `S`: Store for persisted state
pub struct Runtime<D, E, S>
where
    D: Driver,
    E: Environment,
    S: KeyValueStore,
{
    driver: D,
    app: App<E>,
    store: S,
}

impl<D, E, S> Runtime<D, E, S>
where
    D: Driver,
    E: Environment,
    S: KeyValueStore,
{
    /// Create a runtime, restoring persisted state from `store` into `app`.
    pub fn new(driver: D, mut app: App<E>, store: S) -> Self {
        app.begin_loading();
        let snapshot = persist::load(&store, app.snapshot());
        app.restore(snapshot);
        Self { driver, app, store }
    }

    /// Run the main event loop until the app quits.
    ///
    /// Each cycle:
    /// 1. Polls the driver for input events and feeds them to the app
    /// 2. Feeds a `Tick` so due timers fire
    /// 3. Executes the resulting actions
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App<E>, D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(self.app)
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let events = self.driver.poll_event(&self.app).await?;
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                return Ok(true);
            }
        }

        let actions = self.app.handle(AppEvent::Tick);
        self.process_actions(actions)
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Persist(key) => {
                        if let Err(e) = persist::write(&self.app, &self.store, key) {
                            let event = AppEvent::StorageFailed { key, reason: e.to_string() };
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                    AppAction::Redirect(route) => {
                        tracing::debug!("redirected to {route}");
                        self.driver.redirected(route);
                    },
                    AppAction::LocalTyping { contact_id, typing } => {
                        self.driver.typing_changed(contact_id, typing);
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<E> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<E> {
        &mut self.app
    }

    /// Get a reference to the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a reference to the store
    pub fn store(&self) -> &S {
        &self.store
    }
}
