//! Property-based tests for the App state machine.
//!
//! Tests verify that invariants hold under arbitrary operation sequences, and
//! that the bookkeeping agrees with the reference model.

use std::time::Duration;

use arbitrary::{Arbitrary, Unstructured};
use murmur_app::{
    App, AppAction, AppConfig, AppEvent, DeliveryPhase, Seed, Sender, StoreKey, UserSettings,
};
use murmur_harness::{
    InvariantRegistry, ModelWorld, ObservableState, Operation, SimEnv, SystemSnapshot,
};
use proptest::prelude::*;

/// Decode operations from raw bytes, the same way the fuzz targets do.
fn operations() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(any::<u8>(), 0..600).prop_map(|bytes| {
        let mut u = Unstructured::new(&bytes);
        let mut ops = Vec::new();
        while !u.is_empty() {
            match Operation::arbitrary(&mut u) {
                Ok(op) => ops.push(op),
                Err(_) => break,
            }
        }
        ops
    })
}

fn demo_app(seed: u64) -> App<SimEnv> {
    let env = SimEnv::with_seed(seed);
    let seed = Seed::demo(0);
    App::with_seed(env, AppConfig::default(), seed).unwrap()
}

fn quiet_app() -> App<SimEnv> {
    let mut app = App::with_seed(SimEnv::with_seed(0), AppConfig::default(), Seed::contacts_only())
        .unwrap();
    app.handle(AppEvent::UpdateSettings(UserSettings {
        simulate_typing: false,
        ..UserSettings::default()
    }));
    app
}

proptest! {
    /// App invariants hold under arbitrary operation sequences.
    #[test]
    fn prop_app_invariants_hold(seed in any::<u64>(), ops in operations()) {
        let mut app = demo_app(seed);
        let invariants = InvariantRegistry::standard();
        let mut snapshot = SystemSnapshot::from_app(&app);
        invariants.assert_all(&snapshot, "initially");

        for (i, op) in ops.iter().enumerate() {
            op.apply(&mut app);
            snapshot = SystemSnapshot::capture(&app, Some(&snapshot));
            invariants.assert_all(&snapshot, &format!("after op {i}: {op:?}"));
        }
    }

    /// Bookkeeping matches the reference model.
    #[test]
    fn prop_app_matches_model(seed in any::<u64>(), ops in operations()) {
        let mut app = demo_app(seed);
        let contacts: Vec<_> = app.contacts().iter().map(|c| c.id).collect();
        let mut model = ModelWorld::new(contacts, ObservableState::from_app(&app));

        for op in ops.iter().filter(|op| ModelWorld::covers(op)) {
            op.apply(&mut app);
            model.apply(op);
            prop_assert_eq!(&ObservableState::from_app(&app), model.observable(), "after {:?}", op);
        }
    }

    /// Sending N valid messages yields ids 1..=N in order.
    #[test]
    fn prop_sent_ids_are_sequential(texts in prop::collection::vec("[a-z]{1,12}", 1..30)) {
        let mut app = quiet_app();

        for text in &texts {
            app.handle(AppEvent::SendMessage { contact_id: 4, text: text.clone() });
        }

        let ids: Vec<u64> = app.conversation(4).iter().map(|m| m.id).collect();
        let expected: Vec<u64> = (1..=texts.len() as u64).collect();
        prop_assert_eq!(ids, expected);
        prop_assert!(app.conversation(4).iter().all(|m| m.sender == Sender::Sent));
    }

    /// Toggling a favorite twice restores the set.
    #[test]
    fn prop_favorite_toggle_twice_restores(initial in prop::collection::btree_set(1u64..=7, 0..7), id in 0u64..10) {
        let mut app = quiet_app();
        for fav in &initial {
            app.handle(AppEvent::ToggleFavorite { contact_id: *fav });
        }
        let before = app.favorites().clone();

        app.handle(AppEvent::ToggleFavorite { contact_id: id });
        app.handle(AppEvent::ToggleFavorite { contact_id: id });

        prop_assert_eq!(app.favorites(), &before);
    }

    /// Selection always zeroes the unread count in the same update.
    #[test]
    fn prop_select_zeroes_unread(received in 1usize..20) {
        let mut app = quiet_app();
        for _ in 0..received {
            app.handle(AppEvent::MessageReceived { contact_id: 2, text: "hola".to_string() });
        }
        prop_assert_eq!(app.unread_count(2), received as u32);

        let actions = app.handle(AppEvent::SelectConversation { contact_id: 2 });

        prop_assert_eq!(app.unread_count(2), 0);
        prop_assert!(actions.contains(&AppAction::Persist(StoreKey::UnreadCounts)));
    }

    /// Delivery walks pending, delivered, read without skipping, whatever
    /// the step size.
    #[test]
    fn prop_delivery_never_skips(step_ms in 1u64..900) {
        let mut app = quiet_app();
        app.handle(AppEvent::SendMessage { contact_id: 1, text: "hi".to_string() });

        let mut phases = vec![DeliveryPhase::Pending];
        while phases.last() != Some(&DeliveryPhase::Read) {
            app.env().advance(Duration::from_millis(step_ms));
            app.handle(AppEvent::Tick);
            let phase = app.status(1, 1).map(|s| s.phase());
            prop_assert!(phase.is_some());
            if let Some(phase) = phase && phases.last() != Some(&phase) {
                phases.push(phase);
            }
        }

        prop_assert_eq!(
            phases,
            vec![DeliveryPhase::Pending, DeliveryPhase::Delivered, DeliveryPhase::Read]
        );
    }
}

#[test]
fn same_seed_same_typing() {
    let run = |seed| {
        let mut app = demo_app(seed);
        let mut observed = Vec::new();
        for _ in 0..20 {
            app.env().advance(Duration::from_secs(3));
            app.handle(AppEvent::Tick);
            observed.push(app.state().typing.clone());
        }
        observed
    };

    assert_eq!(run(11), run(11));
}
