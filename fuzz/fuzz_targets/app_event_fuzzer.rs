//! Fuzz target for the App state machine
//!
//! Decodes a seed and a sequence of [`Operation`]s and applies them to an app
//! seeded with the demo conversations, checking every standard invariant
//! after each step.
//!
//! # Invariants
//!
//! - The App NEVER panics on any event sequence
//! - Selection only ever points at a known contact, with zero unread
//! - Message ids strictly increase within each conversation
//! - Statuses exist only for sent messages and never regress
//! - Notification ids strictly increase

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use murmur_app::{App, AppConfig, Seed};
use murmur_harness::{InvariantRegistry, Operation, SIM_EPOCH_MILLIS, SimEnv, SystemSnapshot};

#[derive(Debug, Arbitrary)]
struct Scenario {
    seed: u64,
    demo: bool,
    operations: Vec<Operation>,
}

fuzz_target!(|scenario: Scenario| {
    let seed = if scenario.demo { Seed::demo(SIM_EPOCH_MILLIS) } else { Seed::contacts_only() };
    let Ok(mut app) = App::with_seed(SimEnv::with_seed(scenario.seed), AppConfig::default(), seed)
    else {
        return;
    };

    let invariants = InvariantRegistry::standard();
    let mut snapshot = SystemSnapshot::from_app(&app);
    invariants.assert_all(&snapshot, "initially");

    for (i, op) in scenario.operations.iter().enumerate() {
        op.apply(&mut app);
        snapshot = SystemSnapshot::capture(&app, Some(&snapshot));
        invariants.assert_all(&snapshot, &format!("after op {i}: {op:?}"));
    }
});
