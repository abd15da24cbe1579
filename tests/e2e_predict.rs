// AnomalyDash - tests/e2e_predict.rs
//
// End-to-end tests for the submission pipeline.
//
// A throwaway HTTP server on a loopback port plays the inference service,
// so these tests exercise the real multipart encoding, the real blocking
// HTTP client, the worker thread, and the uploader/history state. No mocks
// inside the crate.

use anomalydash::app::api::{ApiClient, ApiConfig};
use anomalydash::app::detect::{DetectionManager, DetectionProgress};
use anomalydash::app::state::AppState;
use anomalydash::core::model::{DetectionResult, ModelId, Verdict};
use anomalydash::core::uploader::SelectedImage;
use anomalydash::platform::config::AppConfig;
use anomalydash::platform::fs::probe_image;
use anomalydash::ui::panels::uploader::ResultView;
use anomalydash::ui::theme::ResultStyle;
use anomalydash::util::error::{FailureKind, PredictError};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// =============================================================================
// Helpers
// =============================================================================

/// Write a tiny PNG-signed file and return it as a selected image.
fn sample_image(dir: &TempDir) -> SelectedImage {
    let path = dir.path().join("part.png");
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(b"pixels");
    std::fs::write(&path, bytes).unwrap();
    let probe = probe_image(&path, 1024).unwrap();
    SelectedImage::new(path, probe.mime_type, probe.size_bytes)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read one HTTP request (headers plus body) from `stream`.
fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = find(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_start = end + 4;
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            match content_length {
                Some(len) if buf.len() >= body_start + len => break,
                Some(_) => {}
                None if headers.contains("transfer-encoding: chunked") => {
                    if buf.ends_with(b"0\r\n\r\n") {
                        break;
                    }
                }
                None => break,
            }
        }
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    buf
}

/// Serve `count` requests with the same canned response; the join handle
/// yields the raw requests received.
fn serve(count: usize, status: &'static str, body: &'static str) -> (String, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for _ in 0..count {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(10)))
                .unwrap();
            requests.push(read_request(&mut stream));
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
        requests
    });
    (format!("http://{addr}"), handle)
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: Some(10),
        ..Default::default()
    })
    .unwrap()
}

/// A loopback URL with nothing listening on it.
fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// API client
// =============================================================================

/// A good verdict is returned verbatim and the request carries both fields.
#[test]
fn e2e_good_response_and_multipart_fields() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let (url, server) = serve(1, "200 OK", r#"{"result":"good","score":0.12}"#);

    let result = client_for(&url).predict_image(&image, ModelId::UniNet);
    assert_eq!(
        result,
        DetectionResult {
            result: Verdict::Good,
            score: 0.12
        }
    );

    let requests = server.join().unwrap();
    let raw = &requests[0];
    let text = String::from_utf8_lossy(raw);
    assert!(text.starts_with("POST /predict "), "request line: {text}");
    assert!(text.to_lowercase().contains("content-type: multipart/form-data"));
    assert!(text.contains("name=\"image\""));
    assert!(text.contains("filename=\"part.png\""));
    assert!(text.contains("image/png"));
    assert!(text.contains("name=\"model\""));
    assert!(text.contains("uninet"));
    assert!(find(raw, PNG_MAGIC).is_some(), "image bytes missing from body");
}

/// Connection refused never panics or errors out of `predict_image`.
#[test]
fn e2e_connection_refused_yields_sentinel() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let client = client_for(&refused_url());

    assert_eq!(
        client.predict_image(&image, ModelId::Padim),
        DetectionResult::error_sentinel()
    );
    let err = client.try_predict_image(&image, ModelId::Padim).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);
}

/// Non-2xx statuses are reported as server failures.
#[test]
fn e2e_server_error_status() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let (url, server) = serve(1, "500 Internal Server Error", r#"{"detail":"model crashed"}"#);

    let err = client_for(&url)
        .try_predict_image(&image, ModelId::Padim)
        .unwrap_err();
    server.join().unwrap();

    assert_eq!(err.kind(), FailureKind::Server);
    match err {
        PredictError::Server { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("model crashed"));
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

/// A 2xx body that is not JSON is a parse failure.
#[test]
fn e2e_malformed_body_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let (url, server) = serve(1, "200 OK", "<html>oops</html>");

    let err = client_for(&url)
        .try_predict_image(&image, ModelId::Padim)
        .unwrap_err();
    server.join().unwrap();
    assert_eq!(err.kind(), FailureKind::Parse);
}

/// A verdict outside defect/good is a parse failure, not a pass-through.
#[test]
fn e2e_unknown_verdict_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let (url, server) = serve(1, "200 OK", r#"{"result":"maybe","score":0.5}"#);

    let err = client_for(&url)
        .try_predict_image(&image, ModelId::Padim)
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, PredictError::InvalidResponse { .. }));
}

// =============================================================================
// Full pipeline: state -> worker -> state
// =============================================================================

/// Drive one submit through the worker and fold the outcome back into state.
fn submit_and_wait(state: &mut AppState, manager: &DetectionManager) {
    start_submit(state, manager);
    wait_for_outcome(state, manager);
}

fn start_submit(state: &mut AppState, manager: &DetectionManager) {
    state.request_submit = true;
    let request = state.take_submit().expect("submit should start");
    manager.start(request);
}

fn wait_for_outcome(state: &mut AppState, manager: &DetectionManager) {
    let deadline = Instant::now() + Duration::from_secs(15);
    loop {
        if let Some(DetectionProgress::Completed { ticket, outcome }) =
            manager.poll_progress().into_iter().next()
        {
            state.apply_outcome(ticket, outcome, chrono::Local::now());
            return;
        }
        assert!(Instant::now() < deadline, "detection never completed");
        thread::sleep(Duration::from_millis(10));
    }
}

fn fresh_state() -> AppState {
    AppState::new(&AppConfig::default(), true, String::new())
}

/// Simulated backend answering good/0.12: the panel shows "0.12" with
/// success styling and the chart gets a non-anomalous point.
#[test]
fn e2e_submission_renders_good_result() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let (url, server) = serve(1, "200 OK", r#"{"result":"good","score":0.12}"#);
    let manager = DetectionManager::new(client_for(&url));

    let mut state = fresh_state();
    state.pick_image(&image.path);
    submit_and_wait(&mut state, &manager);
    server.join().unwrap();

    let view = ResultView::from_outcome(state.uploader.last_outcome().unwrap());
    assert_eq!(view.score, "0.12");
    assert_eq!(view.style, ResultStyle::Success);
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history.anomaly_count(), 0);
}

/// A refused connection lands in the panel as a distinct failure, and the
/// chart records a zero, non-anomalous point.
#[test]
fn e2e_submission_failure_is_displayed_as_failure() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let manager = DetectionManager::new(client_for(&refused_url()));

    let mut state = fresh_state();
    state.pick_image(&image.path);
    submit_and_wait(&mut state, &manager);

    let view = ResultView::from_outcome(state.uploader.last_outcome().unwrap());
    assert_eq!(view.headline, "Detection Failed");
    assert_eq!(view.style, ResultStyle::Warning);
    assert_eq!(view.score, "0.00");
    let point = state.history.iter().next().unwrap();
    assert_eq!(point.value, 0.0);
    assert!(!point.anomaly);
}

/// Eleven defect submissions leave ten points, all anomalies.
#[test]
fn e2e_eleven_submissions_keep_last_ten() {
    let dir = TempDir::new().unwrap();
    let image = sample_image(&dir);
    let (url, server) = serve(11, "200 OK", r#"{"result":"defect","score":0.9}"#);
    let manager = DetectionManager::new(client_for(&url));

    let mut state = fresh_state();
    state.pick_image(&image.path);
    for _ in 0..11 {
        submit_and_wait(&mut state, &manager);
    }
    server.join().unwrap();

    assert_eq!(state.history.len(), 10);
    assert_eq!(state.history.anomaly_count(), 10);
    assert!(state
        .history
        .iter()
        .all(|p| (p.value - 90.0).abs() < 1e-9));
}

/// Picking another image mid-request keeps the panel clean for the new
/// file, but the finished request still lands on the chart.
#[test]
fn e2e_image_replaced_mid_request_is_charted_not_displayed() {
    let dir = TempDir::new().unwrap();
    let first = sample_image(&dir);
    let second = dir.path().join("second.png");
    std::fs::copy(&first.path, &second).unwrap();
    let (url, server) = serve(1, "200 OK", r#"{"result":"defect","score":0.9}"#);
    let manager = DetectionManager::new(client_for(&url));

    let mut state = fresh_state();
    state.pick_image(&first.path);
    start_submit(&mut state, &manager);
    state.pick_image(&second);
    wait_for_outcome(&mut state, &manager);
    server.join().unwrap();

    assert!(state.uploader.last_outcome().is_none());
    assert_eq!(state.uploader.image().unwrap().name, "second.png");
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history.anomaly_count(), 1);
}
