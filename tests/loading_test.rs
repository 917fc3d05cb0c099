mod common;

use admin_console::pipeline::{ApiRequest, Pipeline, RedirectFlag};
use admin_console::{AdminApi, ApiError, LoadingSignal, Session};
use common::{RecordingObserver, ScriptedTransport, ok, status};
use std::sync::Arc;

fn observed() -> (LoadingSignal, Arc<RecordingObserver>) {
    let signal = LoadingSignal::new();
    let observer = Arc::new(RecordingObserver::default());
    signal.register(observer.clone());
    observer.clear();
    (signal, observer)
}

#[test]
fn balanced_calls_end_hidden() {
    let (signal, observer) = observed();

    signal.increment();
    signal.increment();
    signal.decrement();
    assert!(signal.is_busy());
    assert_eq!(observer.count("hide"), 0);
    println!("✓ still shown while one operation is in flight");

    signal.decrement();
    assert_eq!(signal.count(), 0);
    assert_eq!(observer.events(), vec!["show", "show", "hide"]);
    println!("✓ hidden exactly once when the last one finishes");
}

#[test]
fn extra_decrement_is_ignored() {
    let (signal, observer) = observed();

    signal.decrement();
    assert_eq!(signal.count(), 0);
    assert!(observer.events().is_empty());

    signal.increment();
    assert_eq!(signal.count(), 1);
    assert_eq!(observer.events(), vec!["show"]);
    println!("✓ counter never goes negative and recovers normally");
}

#[test]
fn force_reset_always_hides() {
    let (signal, observer) = observed();

    signal.increment();
    signal.increment();
    signal.increment();
    signal.force_reset();
    assert_eq!(signal.count(), 0);
    assert_eq!(observer.events().last(), Some(&"hide"));

    observer.clear();
    signal.force_reset();
    assert_eq!(observer.events(), vec!["hide"]);
    println!("✓ reset hides with or without operations in flight");
}

#[test]
fn late_registration_catches_up() {
    let signal = LoadingSignal::new();
    signal.increment();

    let observer = Arc::new(RecordingObserver::default());
    signal.register(observer.clone());
    assert_eq!(observer.events(), vec!["show"]);
    println!("✓ observer registered mid-operation is shown immediately");

    signal.decrement();
    assert_eq!(observer.events(), vec!["show", "hide"]);

    let idle = Arc::new(RecordingObserver::default());
    signal.register(idle.clone());
    assert_eq!(idle.events(), vec!["hide"]);
    println!("✓ observer registered while idle is hidden");
}

#[test]
fn unregistered_signal_keeps_counting() {
    let (signal, observer) = observed();

    signal.unregister();
    assert!(!signal.is_registered());
    signal.increment();
    signal.increment();
    assert_eq!(signal.count(), 2);
    assert!(observer.events().is_empty());

    signal.register(observer.clone());
    assert_eq!(observer.events(), vec!["show"]);
    println!("✓ counting continues without an observer");
}

#[test]
fn clones_share_the_counter() {
    let (signal, observer) = observed();
    let other = signal.clone();

    signal.increment();
    other.decrement();
    assert_eq!(signal.count(), 0);
    assert_eq!(observer.events(), vec!["show", "hide"]);
    println!("✓ clones observe one counter");
}

#[tokio::test]
async fn guard_releases_on_error_path() {
    let (signal, observer) = observed();

    let result: Result<(), &str> = signal.track(async { Err("boom") }).await;
    assert!(result.is_err());
    assert_eq!(signal.count(), 0);
    assert_eq!(observer.events(), vec!["show", "hide"]);
    println!("✓ tracked future releases its count on failure");
}

#[tokio::test]
async fn api_calls_balance_the_signal() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ok(r#"{"data":[],"meta":{"totalPage":1}}"#),
        status(500, r#"{"message":"Server exploded"}"#),
    ]));
    let pipeline = Arc::new(Pipeline::new(
        "http://api.test",
        transport,
        Session::in_memory(),
        Arc::new(RedirectFlag::new()),
    ));
    let (signal, observer) = observed();
    let api = AdminApi::new(pipeline, signal.clone());

    api.call::<serde_json::Value>(ApiRequest::get("/admin/user/user"))
        .await
        .unwrap();
    let err = api.call_unit(ApiRequest::get("/admin/user/user")).await.unwrap_err();

    assert_eq!(err, ApiError::Status { status: 500, message: "Server exploded".to_string() });
    assert_eq!(signal.count(), 0);
    assert_eq!(observer.events(), vec!["show", "hide", "show", "hide"]);
    println!("✓ success and failure both end hidden");
}

#[tokio::test]
async fn concurrent_calls_hide_once() {
    let transport = Arc::new(ScriptedTransport::new(vec![ok("{}"), ok("{}"), ok("{}")]));
    let pipeline = Arc::new(Pipeline::new(
        "http://api.test",
        transport,
        Session::in_memory(),
        Arc::new(RedirectFlag::new()),
    ));
    let (signal, observer) = observed();
    let api = AdminApi::new(pipeline, signal.clone());

    let outer = signal.guard();
    let (a, b) = tokio::join!(
        api.call_unit(ApiRequest::get("/a")),
        api.call_unit(ApiRequest::get("/b"))
    );
    a.unwrap();
    b.unwrap();
    assert_eq!(observer.count("hide"), 0);
    drop(outer);

    assert_eq!(observer.count("hide"), 1);
    assert_eq!(signal.count(), 0);
    println!("✓ overlapping operations hide once at the end");
}
