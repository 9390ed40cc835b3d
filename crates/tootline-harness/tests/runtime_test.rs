//! End-to-end tests of the production Runtime against simulated
//! collaborators.
//!
//! The runtime and a test script run concurrently on one task; the script
//! observes rendered frames through a [`SimHandle`] and steers the session
//! signal and the scripted API. Every render is checked against the standard
//! invariants.

use std::{future::Future, sync::Arc, time::Duration};

use tootline_app::{AppEvent, Runtime, RuntimeError, ScreenKind, SessionSignal};
use tootline_client::{ApiError, Cursor, Session, SessionError};
use tootline_harness::{
    InvariantRegistry, MemorySessionStore, ScriptedApi, SimDriver, SimTimelineApi,
};

fn session(token: &str) -> Session {
    Session::new("example.social", token).unwrap()
}

fn driver() -> SimDriver {
    SimDriver::new().with_invariants(InvariantRegistry::standard()).with_auto_load()
}

/// Run `runtime` alongside `script`, failing the test if either hangs.
async fn drive<R, S>(runtime: R, script: S) -> R::Output
where
    R: Future,
    S: Future<Output = ()>,
{
    let both = async { tokio::join!(runtime, script).0 };
    tokio::time::timeout(Duration::from_secs(5), both).await.expect("scenario timed out")
}

#[tokio::test]
async fn restored_session_loads_and_pages() {
    let api = SimTimelineApi::with_posts(20).with_page_size(10);
    let driver = driver();
    let mut handle = driver.handle();
    let runtime =
        Runtime::new(driver, api.clone(), MemorySessionStore::with_session(session("a")));

    let result = drive(runtime.run(), async {
        let frame = handle.wait_for_render(|f| f.post_ids().len() == 10).await;
        assert_eq!(frame.post_ids().first(), Some(&"20"));

        handle.inject(AppEvent::LoadNextPage);
        let frame = handle.wait_for_render(|f| f.post_ids().len() == 20).await;
        assert_eq!(frame.post_ids().last(), Some(&"1"));

        handle.inject(AppEvent::Quit);
    })
    .await;

    assert!(result.is_ok());
    assert!(handle.is_stopped());

    let cursors: Vec<Cursor> = api.calls().into_iter().map(|c| c.cursor).collect();
    assert_eq!(cursors.len(), 2);
    assert!(cursors[0].is_head());
    assert_eq!(cursors[1].until.as_ref().map(|id| id.as_str()), Some("11"));
}

#[tokio::test]
async fn starting_screen_is_shown_until_restore() {
    let driver = driver();
    let mut handle = driver.handle();
    let runtime = Runtime::new(driver, SimTimelineApi::with_posts(1), MemorySessionStore::empty());

    drive(runtime.run(), async {
        handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;
        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();

    let renders = handle.renders();
    assert_eq!(renders[0].screen, ScreenKind::Starting);
}

#[tokio::test]
async fn store_failure_falls_back_to_onboarding() {
    let driver = driver();
    let mut handle = driver.handle();
    let store = MemorySessionStore::failing(SessionError::Unavailable("keyring locked".into()));
    let runtime = Runtime::new(driver, SimTimelineApi::with_posts(1), store);

    drive(runtime.run(), async {
        let frame = handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;
        assert!(frame.restored);
        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn login_after_onboarding_shows_timeline() {
    let api = SimTimelineApi::with_posts(3);
    let sessions = SessionSignal::new();
    let driver = driver();
    let mut handle = driver.handle();
    let runtime =
        Runtime::with_signal(driver, api, MemorySessionStore::empty(), sessions.clone());

    drive(runtime.run(), async {
        handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;

        sessions.replace(Some(session("a")));
        let frame = handle.wait_for_render(|f| f.post_ids().len() == 3).await;
        assert_eq!(frame.screen, ScreenKind::Timeline);

        handle.inject(AppEvent::Logout);
        handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;
        assert!(sessions.current().is_none());

        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn relogin_with_same_session_builds_fresh_timeline() {
    let api = SimTimelineApi::with_posts(3);
    let sessions = SessionSignal::new();
    let driver = driver();
    let mut handle = driver.handle();
    let runtime = Runtime::with_signal(
        driver,
        api.clone(),
        MemorySessionStore::with_session(session("a")),
        sessions.clone(),
    );

    drive(runtime.run(), async {
        let frame = handle.wait_for_render(|f| f.post_ids().len() == 3).await;
        let first_engine = frame.engine();
        assert!(first_engine.is_some());

        sessions.replace(None);
        sessions.replace(Some(session("a")));

        handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;
        let frame = handle
            .wait_for_render(|f| f.engine().is_some() && f.engine() != first_engine)
            .await;
        assert!(frame.post_ids().is_empty(), "new engine starts without the old posts");

        let frame = handle.wait_for_render(|f| f.post_ids().len() == 3).await;
        assert_ne!(frame.engine(), first_engine);

        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();

    assert_eq!(api.calls().len(), 2);
    assert!(api.calls().iter().all(|call| call.cursor.is_head()));
}

#[tokio::test]
async fn auth_failure_reports_and_logs_out() {
    let api = SimTimelineApi::with_posts(5);
    api.revoke(&session("expired"));
    let driver = driver();
    let mut handle = driver.handle();
    let runtime =
        Runtime::new(driver, api, MemorySessionStore::with_session(session("expired")));

    drive(runtime.run(), async {
        handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;
        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();

    assert_eq!(handle.errors(), vec![ApiError::Auth { status: 401 }]);
    assert!(handle.renders().iter().all(|f| f.post_ids().is_empty()));
}

#[tokio::test]
async fn transport_failure_is_reported_and_retryable() {
    let api = SimTimelineApi::with_posts(5);
    api.fail_next(ApiError::Transport("timeout".into()), 1);
    let driver = driver();
    let mut handle = driver.handle();
    let runtime =
        Runtime::new(driver, api.clone(), MemorySessionStore::with_session(session("a")));

    drive(runtime.run(), async {
        let frame = handle.wait_for_render(|f| f.status.is_some()).await;
        assert_eq!(frame.screen, ScreenKind::Timeline);
        assert!(frame.post_ids().is_empty());

        handle.inject(AppEvent::LoadTimeline);
        let frame = handle.wait_for_render(|f| f.post_ids().len() == 5).await;
        assert!(frame.status.is_none());

        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();

    assert_eq!(handle.errors(), vec![ApiError::Transport("timeout".into())]);
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn completion_from_replaced_session_is_dropped() {
    let api = ScriptedApi::new();
    let sessions = SessionSignal::new();
    let driver = driver();
    let mut handle = driver.handle();
    let runtime = Runtime::with_signal(
        driver,
        api.clone(),
        MemorySessionStore::with_session(session("a")),
        sessions.clone(),
    );

    let stale_posts = SimTimelineApi::with_posts(3).page(&Cursor::head());
    let fresh_posts = SimTimelineApi::with_posts(2).page(&Cursor::head());

    drive(runtime.run(), async {
        let a_fetch = api.next_fetch().await;
        assert_eq!(a_fetch.session, session("a"));

        sessions.replace(Some(session("b")));
        let b_fetch = api.next_fetch().await;
        assert_eq!(b_fetch.session, session("b"));

        a_fetch.resolve(Ok(stale_posts));
        b_fetch.resolve(Ok(fresh_posts));

        let frame = handle.wait_for_render(|f| !f.post_ids().is_empty()).await;
        assert_eq!(frame.post_ids(), ["2", "1"]);
        assert_eq!(frame.timeline.as_ref().map(|t| Arc::clone(&t.session)), sessions.current());

        handle.inject(AppEvent::Quit);
    })
    .await
    .unwrap();

    assert!(handle.renders().iter().all(|f| !f.post_ids().contains(&"3")));
}

#[tokio::test]
async fn render_failure_stops_runtime() {
    let driver = driver();
    let handle = driver.handle();
    handle.fail_next_render("terminal gone");
    let runtime = Runtime::new(driver, SimTimelineApi::with_posts(1), MemorySessionStore::empty());

    let result = runtime.run().await;

    assert!(matches!(result, Err(RuntimeError::Driver(_))));
    assert!(handle.is_stopped());
    assert!(handle.renders().is_empty());
}
