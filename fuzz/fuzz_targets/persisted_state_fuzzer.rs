//! Fuzz target for loading persisted state
//!
//! Arbitrary values are stored under the persisted keys and loaded back into
//! an app.
//!
//! # Invariants
//!
//! - Loading NEVER panics, whatever the stored text
//! - Restored state satisfies every standard invariant
//! - The app keeps running normally after a restore

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use murmur_app::{App, AppConfig, AppEvent, Seed, StoreKey, persist};
use murmur_core::{KeyValueStore, storage::MemoryStore};
use murmur_harness::{InvariantRegistry, SIM_EPOCH_MILLIS, SimEnv, SystemSnapshot};

#[derive(Debug, Arbitrary)]
struct StoredValues {
    values: Vec<(u8, String)>,
}

fuzz_target!(|input: StoredValues| {
    let store = MemoryStore::new();
    for (slot, value) in &input.values {
        let key = StoreKey::ALL[usize::from(*slot) % StoreKey::ALL.len()];
        let _ = store.set(key.as_str(), value);
    }

    let env = SimEnv::with_seed(0);
    let Ok(mut app) =
        App::with_seed(env.clone(), AppConfig::default(), Seed::demo(SIM_EPOCH_MILLIS))
    else {
        return;
    };
    let snapshot = persist::load(&store, app.snapshot());
    app.restore(snapshot);

    let invariants = InvariantRegistry::standard();
    invariants.assert_all(&SystemSnapshot::from_app(&app), "after restore");

    app.handle(AppEvent::SendMessage { contact_id: 1, text: "hola".to_string() });
    env.advance(Duration::from_secs(5));
    app.handle(AppEvent::Tick);
    invariants.assert_all(&SystemSnapshot::from_app(&app), "after send");
});
