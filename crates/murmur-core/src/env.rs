//! Environment abstraction for deterministic testing.
//!
//! Decouples the conversation state machine from system resources (time,
//! randomness). Enables deterministic simulation (virtual clock, seeded RNG)
//! and production use with real system resources.

use std::{
    fmt::Debug,
    ops::{Add, Sub},
    time::Duration,
};

/// Abstract environment providing time, randomness, and async primitives.
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - `random_bytes()` is reproducible for a given seed in simulation
/// - Methods are infallible except in exceptional circumstances (e.g., OS
///   entropy exhaustion)
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`, simulation uses a virtual
    /// instant that only moves when the test advances it.
    type Instant: Copy
        + Ord
        + Debug
        + Send
        + Sync
        + Add<Duration, Output = Self::Instant>
        + Sub<Output = Duration>;

    /// Current time (monotonic).
    ///
    /// # Invariants
    ///
    /// - Subsequent calls return times >= previous calls.
    fn now(&self) -> Self::Instant;

    /// Wall-clock time in milliseconds since the Unix epoch.
    ///
    /// Used for display timestamps and notification ids, never for
    /// scheduling.
    fn wall_clock_millis(&self) -> u64;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code awaits this; the state machine never sleeps.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn random_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.random_u64() % len as u64) as usize
    }

    /// Uniform float in `[0.0, 1.0)`.
    fn random_unit(&self) -> f64 {
        // 53 high bits fill an f64 mantissa exactly
        (self.random_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Environment doubles for unit tests in this and dependent crates.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use std::{
        collections::VecDeque,
        ops::{Add, Sub},
        sync::{Arc, Mutex, PoisonError},
        time::Duration,
    };

    use super::Environment;

    /// Virtual instant: time elapsed since the mock environment was created.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct MockInstant(pub Duration);

    impl Add<Duration> for MockInstant {
        type Output = Self;

        fn add(self, rhs: Duration) -> Self {
            Self(self.0.saturating_add(rhs))
        }
    }

    impl Sub for MockInstant {
        type Output = Duration;

        fn sub(self, rhs: Self) -> Duration {
            self.0.saturating_sub(rhs.0)
        }
    }

    #[derive(Debug)]
    struct MockState {
        elapsed: Duration,
        wall_base_millis: u64,
        scripted: VecDeque<u64>,
        rng: u64,
    }

    /// Manually driven environment.
    ///
    /// Time only moves through [`MockEnv::advance`]. Random values come from
    /// a script first (see [`MockEnv::script_random`]) and fall back to a
    /// xorshift sequence. Clones share state.
    #[derive(Debug, Clone)]
    pub struct MockEnv {
        state: Arc<Mutex<MockState>>,
    }

    impl Default for MockEnv {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockEnv {
        /// Environment at virtual time zero, wall clock at the Unix epoch.
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(MockState {
                    elapsed: Duration::ZERO,
                    wall_base_millis: 0,
                    scripted: VecDeque::new(),
                    rng: 0x9E37_79B9_7F4A_7C15,
                })),
            }
        }

        /// Move virtual time forward.
        pub fn advance(&self, by: Duration) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.elapsed = state.elapsed.saturating_add(by);
        }

        /// Queue values returned by the next `random_u64` calls.
        pub fn script_random(&self, values: impl IntoIterator<Item = u64>) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.scripted.extend(values);
        }

        /// Set the wall clock reading at virtual time zero.
        pub fn set_wall_clock_base(&self, millis: u64) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.wall_base_millis = millis;
        }
    }

    impl Environment for MockEnv {
        type Instant = MockInstant;

        fn now(&self) -> MockInstant {
            MockInstant(self.state.lock().unwrap_or_else(PoisonError::into_inner).elapsed)
        }

        fn wall_clock_millis(&self) -> u64 {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.wall_base_millis + state.elapsed.as_millis() as u64
        }

        fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            self.advance(duration);
            std::future::ready(())
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            for chunk in buffer.chunks_mut(8) {
                let value = self.random_u64().to_be_bytes();
                chunk.copy_from_slice(&value[..chunk.len()]);
            }
        }

        fn random_u64(&self) -> u64 {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(value) = state.scripted.pop_front() {
                return value;
            }
            let mut x = state.rng;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            state.rng = x;
            x
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_utils::MockEnv, *};

    #[test]
    fn mock_time_only_moves_when_advanced() {
        let env = MockEnv::new();
        let t0 = env.now();
        assert_eq!(env.now(), t0);

        env.advance(Duration::from_millis(250));
        assert_eq!(env.now() - t0, Duration::from_millis(250));
        assert_eq!(env.wall_clock_millis(), 250);
    }

    #[test]
    fn scripted_values_come_first() {
        let env = MockEnv::new();
        env.script_random([7, 11]);

        assert_eq!(env.random_u64(), 7);
        assert_eq!(env.random_u64(), 11);
        assert_ne!(env.random_u64(), 11);
    }

    #[test]
    fn random_index_stays_in_range() {
        let env = MockEnv::new();
        for _ in 0..1000 {
            assert!(env.random_index(7) < 7);
        }
        assert_eq!(env.random_index(0), 0);
    }

    #[test]
    fn random_unit_is_half_open() {
        let env = MockEnv::new();
        env.script_random([0, u64::MAX]);

        assert_eq!(env.random_unit(), 0.0);
        assert!(env.random_unit() < 1.0);
    }
}
