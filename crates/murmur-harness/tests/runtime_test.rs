//! Runtime loop behavior with the scripted driver.

use std::time::Duration;

use murmur_app::{App, AppConfig, AppEvent, Route, Runtime, Seed, UserSettings};
use murmur_core::storage::MemoryStore;
use murmur_harness::{InvariantRegistry, SimDriver, SimEnv};

fn quiet_settings() -> AppEvent {
    AppEvent::UpdateSettings(UserSettings { simulate_typing: false, ..UserSettings::default() })
}

#[tokio::test]
async fn local_typing_reaches_the_driver() {
    let env = SimEnv::with_seed(1);
    let driver = SimDriver::new().with_clock(env.clone());
    driver.inject_event(quiet_settings());
    driver.inject_event(AppEvent::SelectConversation { contact_id: 3 });
    driver.inject_event(AppEvent::DraftChanged { text: "h".to_string() });
    driver.inject_event(AppEvent::DraftChanged { text: "ho".to_string() });
    driver.inject_wait(Duration::from_secs(2));
    driver.inject_event(AppEvent::DraftChanged { text: "hola".to_string() });
    driver.inject_event(AppEvent::SendMessage { contact_id: 3, text: "hola".to_string() });
    let probe = driver.probe();

    let app = App::with_seed(env, AppConfig::default(), Seed::contacts_only()).unwrap();
    Runtime::new(driver, app, MemoryStore::new()).run().await.unwrap();

    assert_eq!(probe.typing_events(), vec![(3, true), (3, false), (3, true), (3, false)]);
}

#[tokio::test]
async fn shutdown_stops_typing_and_the_driver() {
    let env = SimEnv::with_seed(2);
    let driver = SimDriver::new()
        .with_clock(env.clone())
        .with_invariants(InvariantRegistry::standard());
    driver.inject_event(AppEvent::SelectConversation { contact_id: 1 });
    driver.inject_event(AppEvent::DraftChanged { text: "casi".to_string() });
    driver.inject_event(AppEvent::Shutdown);
    driver.inject_event(AppEvent::ToggleDarkMode);
    let probe = driver.probe();

    let app = App::with_seed(env, AppConfig::default(), Seed::contacts_only()).unwrap();
    let app = Runtime::new(driver, app, MemoryStore::new()).run().await.unwrap();

    assert!(probe.stopped());
    assert_eq!(probe.typing_events(), vec![(1, true), (1, false)]);
    assert!(!app.dark_mode(), "events after shutdown are not processed");
}

#[tokio::test]
async fn delivery_progresses_with_virtual_time() {
    let env = SimEnv::with_seed(3);
    let driver = SimDriver::new().with_clock(env.clone());
    driver.inject_event(quiet_settings());
    driver.inject_event(AppEvent::SendMessage { contact_id: 5, text: "¿llegó?".to_string() });
    for _ in 0..4 {
        driver.inject_wait(Duration::from_millis(900));
    }

    let app = App::with_seed(env, AppConfig::default(), Seed::contacts_only()).unwrap();
    let app = Runtime::new(driver, app, MemoryStore::new()).run().await.unwrap();

    assert!(app.status(5, 1).is_some_and(|s| s.read));
    assert!(app.state().typing.is_empty());
}

#[tokio::test]
async fn redirects_reach_the_driver() {
    let env = SimEnv::with_seed(4);
    let driver = SimDriver::new().with_clock(env.clone());
    driver.inject_event(quiet_settings());
    driver.inject_event(AppEvent::Navigate { path: "/settings".to_string() });
    driver.inject_event(AppEvent::Navigate { path: "/home".to_string() });
    driver.inject_event(AppEvent::Navigate { path: "/chat/abc".to_string() });
    let probe = driver.probe();

    let app = App::with_seed(env, AppConfig::default(), Seed::contacts_only()).unwrap();
    let app = Runtime::new(driver, app, MemoryStore::new()).run().await.unwrap();

    assert_eq!(probe.redirects(), vec![Route::Home, Route::Home]);
    assert_eq!(app.route(), Route::Home);
}
