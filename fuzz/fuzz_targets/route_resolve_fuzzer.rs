//! Fuzz target for route resolution
//!
//! Arbitrary strings go through `route::resolve` and the navigate handler.
//!
//! # Invariants
//!
//! - Resolution NEVER panics
//! - A matched route's canonical path resolves back to the same route
//! - Redirects always land on the home screen
//! - After navigating, the app's route is never a chat with an unknown contact

#![no_main]

use libfuzzer_sys::fuzz_target;
use murmur_app::{
    App, AppConfig, AppEvent, Seed,
    route::{self, Resolution, Route},
};
use murmur_harness::SimEnv;

fuzz_target!(|path: &str| {
    match route::resolve(path) {
        Resolution::Matched(r) => {
            assert_eq!(route::resolve(&r.path()), Resolution::Matched(r));
        },
        Resolution::Redirect { to, .. } => assert_eq!(to, Route::Home),
        Resolution::InvalidContact(_) => {},
    }

    let Ok(mut app) =
        App::with_seed(SimEnv::with_seed(0), AppConfig::default(), Seed::contacts_only())
    else {
        return;
    };
    app.handle(AppEvent::Navigate { path: path.to_string() });
    if let Route::Chat(id) = app.route() {
        assert!(app.contact(id).is_some(), "routed to unknown contact {id}");
        assert_eq!(app.selected(), Some(id));
    }
});
