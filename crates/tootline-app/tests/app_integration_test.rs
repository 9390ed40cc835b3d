//! Integration tests for App and TimelineEngine behavior.
//!
//! # Oracle Pattern
//!
//! Tests drive the pure App directly, execute its fetch actions against an
//! in-memory timeline, and end with oracle checks that verify:
//! - The screen reflects the latest session
//! - The post list matches the pages served, in order
//! - Invariants hold after every step

use std::sync::Arc;

use tootline_app::{App, AppAction, AppEvent, FetchPhase, FetchRequest, ScreenKind};
use tootline_client::{ApiError, Cursor, PostId, Session};
use tootline_harness::{InvariantRegistry, SimTimelineApi, SystemSnapshot};

fn session(token: &str) -> Arc<Session> {
    Arc::new(Session::new("example.social", token).unwrap())
}

/// App past startup with the given session.
fn started_app(session: Option<Arc<Session>>) -> App {
    let mut app = App::new();
    app.start();
    app.handle(AppEvent::SessionChanged(session));
    app.handle(AppEvent::RestoreFinished);
    app
}

fn fetches(actions: &[AppAction]) -> Vec<FetchRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            AppAction::Fetch(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

/// Answer `request` from `api` and feed the result back.
fn serve(app: &mut App, api: &SimTimelineApi, request: &FetchRequest) -> Vec<AppAction> {
    let page = api.page(&request.cursor);
    app.handle(AppEvent::FetchCompleted(request.complete(Ok(page))))
}

fn ids(app: &App) -> Vec<String> {
    app.timeline().map(|t| t.posts().iter().map(|p| p.id.to_string()).collect()).unwrap_or_default()
}

fn expected(range: impl DoubleEndedIterator<Item = u64>) -> Vec<String> {
    range.rev().map(|i| i.to_string()).collect()
}

struct Checked {
    registry: InvariantRegistry,
    snapshot: SystemSnapshot,
}

impl Checked {
    fn new() -> Self {
        Self { registry: InvariantRegistry::standard(), snapshot: SystemSnapshot::empty() }
    }

    fn check(&mut self, app: &App, context: &str) {
        self.snapshot.observe(app);
        self.registry.assert_all(&self.snapshot, context);
    }
}

#[test]
fn two_pages_accumulate_in_server_order() {
    let api = SimTimelineApi::with_posts(20).with_page_size(10);
    let mut app = started_app(Some(session("a")));
    let mut checked = Checked::new();

    let first = fetches(&app.handle(AppEvent::LoadTimeline));
    assert_eq!(first.len(), 1);
    assert!(first[0].cursor.is_head());
    checked.check(&app, "after load");

    serve(&mut app, &api, &first[0]);
    assert_eq!(ids(&app), expected(11..=20));
    assert_eq!(app.timeline().unwrap().phase(), FetchPhase::Loaded);
    checked.check(&app, "after first page");

    let next = fetches(&app.handle(AppEvent::LoadNextPage));
    assert_eq!(next[0].cursor, Cursor::older_than(PostId::from("11")));

    // Concurrent request while the first is outstanding is a no-op.
    assert!(app.handle(AppEvent::LoadNextPage).is_empty());
    checked.check(&app, "while loading next page");

    serve(&mut app, &api, &next[0]);
    assert_eq!(ids(&app), expected(1..=20));
    assert_eq!(app.timeline().unwrap().phase(), FetchPhase::Loaded);
    checked.check(&app, "after second page");
}

#[test]
fn load_when_not_empty_is_noop() {
    let api = SimTimelineApi::with_posts(5);
    let mut app = started_app(Some(session("a")));

    let first = fetches(&app.handle(AppEvent::LoadTimeline));
    assert!(app.handle(AppEvent::LoadTimeline).is_empty(), "loading");

    serve(&mut app, &api, &first[0]);
    let before = ids(&app);
    assert!(app.handle(AppEvent::LoadTimeline).is_empty(), "loaded");
    assert_eq!(ids(&app), before);
}

#[test]
fn failing_next_page_keeps_list_and_recovers() {
    let api = SimTimelineApi::with_posts(20).with_page_size(10);
    let mut app = started_app(Some(session("a")));
    let mut checked = Checked::new();

    let first = fetches(&app.handle(AppEvent::LoadTimeline));
    serve(&mut app, &api, &first[0]);
    let next = fetches(&app.handle(AppEvent::LoadNextPage));

    let actions = app.handle(AppEvent::FetchCompleted(
        next[0].complete(Err(ApiError::Transport("connection reset".into()))),
    ));

    assert!(actions.contains(&AppAction::ReportError(ApiError::Transport(
        "connection reset".into()
    ))));
    assert_eq!(ids(&app), expected(11..=20));
    assert_eq!(app.timeline().unwrap().phase(), FetchPhase::Loaded);
    checked.check(&app, "after failed page");

    // Retry goes to the same cursor.
    let retry = fetches(&app.handle(AppEvent::LoadNextPage));
    assert_eq!(retry[0].cursor, next[0].cursor);
}

#[test]
fn failing_first_load_returns_to_empty() {
    let mut app = started_app(Some(session("a")));
    let first = fetches(&app.handle(AppEvent::LoadTimeline));

    app.handle(AppEvent::FetchCompleted(
        first[0].complete(Err(ApiError::Decoding("expected array".into()))),
    ));

    assert_eq!(app.timeline().unwrap().phase(), FetchPhase::Empty);
    assert_eq!(fetches(&app.handle(AppEvent::LoadTimeline)).len(), 1);
}

#[test]
fn stale_completion_after_session_swap_is_ignored() {
    let api = SimTimelineApi::with_posts(20).with_page_size(10);
    let mut app = started_app(Some(session("a")));
    let mut checked = Checked::new();

    let first = fetches(&app.handle(AppEvent::LoadTimeline));
    serve(&mut app, &api, &first[0]);
    let in_flight = fetches(&app.handle(AppEvent::LoadNextPage));

    app.handle(AppEvent::SessionChanged(Some(session("b"))));
    let b_engine = app.timeline().unwrap().id();
    checked.check(&app, "after swap");

    let actions = serve(&mut app, &api, &in_flight[0]);

    assert!(actions.is_empty());
    let timeline = app.timeline().unwrap();
    assert_eq!(timeline.id(), b_engine);
    assert!(timeline.posts().is_empty());
    assert_eq!(timeline.phase(), FetchPhase::Empty);
    checked.check(&app, "after stale completion");
}

#[test]
fn screen_follows_every_session_emission() {
    let mut app = started_app(None);
    let mut checked = Checked::new();
    assert_eq!(app.screen().kind(), ScreenKind::Onboarding);

    let emissions = [Some(session("a")), None, Some(session("b")), Some(session("c")), None];
    for emission in emissions {
        app.handle(AppEvent::SessionChanged(emission.clone()));
        match &emission {
            None => assert_eq!(app.screen().kind(), ScreenKind::Onboarding),
            Some(s) => assert_eq!(app.timeline().unwrap().session(), s),
        }
        checked.check(&app, "after emission");
    }
}

#[test]
fn auth_failure_asks_to_invalidate_session() {
    let mut app = started_app(Some(session("a")));
    let first = fetches(&app.handle(AppEvent::LoadTimeline));

    let actions =
        app.handle(AppEvent::FetchCompleted(first[0].complete(Err(ApiError::Auth { status: 401 }))));

    assert!(actions.contains(&AppAction::InvalidateSession { session: session("a") }));
    assert_eq!(app.screen().kind(), ScreenKind::Timeline, "screen changes only via the signal");
}

#[test]
fn end_of_timeline_stops_paging() {
    let api = SimTimelineApi::with_posts(10).with_page_size(10);
    let mut app = started_app(Some(session("a")));

    let first = fetches(&app.handle(AppEvent::LoadTimeline));
    serve(&mut app, &api, &first[0]);
    let next = fetches(&app.handle(AppEvent::LoadNextPage));
    serve(&mut app, &api, &next[0]);

    assert!(app.timeline().unwrap().is_exhausted());
    assert!(app.handle(AppEvent::LoadNextPage).is_empty());
    assert_eq!(ids(&app), expected(1..=10));
}
