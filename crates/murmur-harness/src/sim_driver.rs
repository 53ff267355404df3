//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`murmur_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use murmur_app::{App, AppEvent, ContactId, Driver, Route};
use murmur_core::Environment;

use crate::{
    SimEnv,
    invariants::{InvariantRegistry, SystemSnapshot},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Scripted input.
#[derive(Debug, Clone)]
enum SimInput {
    Event(AppEvent),
    Wait(Duration),
}

/// Shared state for injection and inspection.
///
/// This allows access from outside async contexts, after the runtime has
/// taken ownership of the driver.
#[derive(Debug, Default)]
struct SharedState {
    pending: VecDeque<SimInput>,
    renders: usize,
    typing_events: Vec<(ContactId, bool)>,
    redirects: Vec<Route>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Inputs are consumed one per poll. Once the script is exhausted the
/// driver yields [`AppEvent::Shutdown`], so a runtime always terminates.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    env: Option<SimEnv>,
    invariants: Option<InvariantRegistry>,
    last_snapshot: Option<SystemSnapshot>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            env: None,
            invariants: None,
            last_snapshot: None,
        }
    }

    /// Let [`SimDriver::inject_wait`] advance `env`.
    #[must_use]
    pub fn with_clock(mut self, env: SimEnv) -> Self {
        self.env = Some(env);
        self
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending.push_back(SimInput::Event(event));
    }

    /// Inject a pause: virtual time advances by `duration` and the poll
    /// returns no event, so the runtime only ticks.
    pub fn inject_wait(&self, duration: Duration) {
        self.lock().pending.push_back(SimInput::Wait(duration));
    }

    /// Probe that stays valid after the runtime takes the driver.
    pub fn probe(&self) -> SimProbe {
        SimProbe { state: Arc::clone(&self.state) }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_events(&mut self) -> Result<Vec<AppEvent>, SimDriverError> {
        let input = self.lock().pending.pop_front();
        match input {
            Some(SimInput::Event(event)) => Ok(vec![event]),
            Some(SimInput::Wait(duration)) => {
                let env = self
                    .env
                    .as_ref()
                    .ok_or_else(|| SimDriverError("wait injected without a clock".to_string()))?;
                env.advance(duration);
                Ok(Vec::new())
            },
            None => {
                tracing::debug!("script exhausted, shutting down");
                Ok(vec![AppEvent::Shutdown])
            },
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    fn poll_event<E: Environment>(
        &mut self,
        _app: &App<E>,
    ) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send {
        std::future::ready(self.next_events())
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        let renders = {
            let mut state = self.lock();
            state.renders += 1;
            state.renders
        };

        if let Some(registry) = &self.invariants {
            let snapshot = SystemSnapshot::capture(app, self.last_snapshot.as_ref());
            registry.assert_all(&snapshot, &format!("at render {renders}"));
            self.last_snapshot = Some(snapshot);
        }
        Ok(())
    }

    fn typing_changed(&mut self, contact_id: ContactId, typing: bool) {
        self.lock().typing_events.push((contact_id, typing));
    }

    fn redirected(&mut self, route: Route) {
        self.lock().redirects.push(route);
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}

/// Read-only view of a [`SimDriver`]'s recorded effects.
#[derive(Debug, Clone)]
pub struct SimProbe {
    state: Arc<Mutex<SharedState>>,
}

impl SimProbe {
    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// Local typing start/stop notifications, in order.
    pub fn typing_events(&self) -> Vec<(ContactId, bool)> {
        self.lock().typing_events.clone()
    }

    /// Redirect targets reported by the runtime, in order.
    pub fn redirects(&self) -> Vec<Route> {
        self.lock().redirects.clone()
    }

    /// Whether the driver was stopped.
    pub fn stopped(&self) -> bool {
        self.lock().stopped
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
