use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;
use tower::ServiceExt;

use panic_guard::web::{self, recovery::INTERNAL_SERVER_ERROR_BODY};

static INSTALL_LOGGER: Once = Once::new();
static LOGGER: CaptureLogger = CaptureLogger;

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records log output of the current thread; `#[tokio::test]` polls the
/// handlers on the test thread.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let _ = RECORDS.try_with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

fn start_capture() {
    INSTALL_LOGGER.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

fn captured() -> Vec<(Level, String)> {
    RECORDS.with(|records| records.take())
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn sync_panic() -> &'static str {
    panic!("handler blew up")
}

#[inline(never)]
fn corrupt_session_table() {
    panic!("session table corrupted");
}

async fn logged_panic() -> &'static str {
    corrupt_session_table();
    "never"
}

async fn late_panic() -> &'static str {
    tokio::task::yield_now().await;
    panic_guard::on_false(false, "state must be ready");
    "never"
}

fn app() -> Router {
    Router::new()
        .route("/ok", get(|| async { "fine" }))
        .route("/sync-panic", get(sync_panic))
        .route("/late-panic", get(late_panic))
        .route("/logged-panic", get(logged_panic))
        .layer(web::recovery_layer())
}

#[tokio::test]
async fn panicking_handler_gets_fixed_500() {
    let response = app().oneshot(get_request("/sync-panic")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_text(response).await, INTERNAL_SERVER_ERROR_BODY);
}

#[tokio::test]
async fn panic_after_await_is_caught() {
    let response = app().oneshot(get_request("/late-panic")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, INTERNAL_SERVER_ERROR_BODY);
}

#[tokio::test]
async fn follow_up_request_is_served_normally() {
    let app = app();

    let failed = app.clone().oneshot(get_request("/sync-panic")).await.unwrap();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.oneshot(get_request("/ok")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "fine");
}

#[tokio::test]
async fn panic_is_logged_with_panic_site_trace() {
    start_capture();
    let response = app().oneshot(get_request("/logged-panic")).await.unwrap();
    let records = captured();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let errors: Vec<&String> = records
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, text)| text)
        .collect();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], "Recovered from panic: session table corrupted");
    assert!(errors[1].starts_with("Stacktrace: "));
    assert!(errors[1].contains("corrupt_session_table"));
}

#[tokio::test]
async fn successful_request_logs_no_error() {
    start_capture();
    let response = app().oneshot(get_request("/ok")).await.unwrap();
    let records = captured();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(records.iter().all(|(level, _)| *level != Level::Error));
}
