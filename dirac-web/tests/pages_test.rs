use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use dirac_mock::{ApplianceState, MockAppliance};
use dirac_web::config::WebConfig;
use dirac_web::state::AppState;

fn config_for(base_url: &str) -> WebConfig {
    WebConfig {
        name: "Living Room".to_string(),
        dirac_url: base_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        camilla_url: Some("http://camilla.local:5005".to_string()),
        uvmeter_url: None,
        timeout: None,
    }
}

async fn state_for(mock: &MockAppliance) -> Arc<AppState> {
    AppState::new(config_for(&mock.base_url())).unwrap()
}

/// Make a request against a fresh router and return status, headers and body text.
async fn send(
    state: &Arc<AppState>,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let app = dirac_web::build_router(state.clone());
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_index_renders_processor_state() {
    let mut initial = ApplianceState::default();
    initial.active_slot = 1;
    initial.gain = -6.5;
    initial.enabled = 0;
    let mock = MockAppliance::with_state(initial).await.unwrap();
    let state = state_for(&mock).await;

    let (status, headers, body) = send(&state, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(body.contains("<h1>Living Room</h1>"));
    assert!(body.contains("Ojas1"));
    assert!(body.contains("Movies"));
    assert!(body.contains(
        "class=\"slot active\"><input type=\"hidden\" name=\"slot_index\" value=\"1\">"
    ));
    assert!(body.contains("-6.5 dB"));
    assert!(body.contains(">Disabled</strong>"));
    assert!(body.contains("href=\"http://camilla.local:5005\""));

    let endpoints: Vec<String> = mock
        .requests()
        .await
        .into_iter()
        .map(|r| r.endpoint)
        .collect();
    assert_eq!(endpoints, vec!["list-slots", "active-slot", "speaker", "filtering"]);
}

#[tokio::test]
async fn test_index_renders_error_when_processor_fails() {
    let mock = MockAppliance::start().await.unwrap();
    mock.update(|s| s.fail_with = Some(dirac_mock::StatusCode::INTERNAL_SERVER_ERROR))
        .await;
    let state = state_for(&mock).await;

    let (status, _, body) = send(&state, get("/")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("An error occurred:"));
    assert!(body.contains("list-slots"));
    // The first failure aborts the page; nothing else is fetched.
    assert_eq!(mock.requests().await.len(), 1);
}

#[tokio::test]
async fn test_index_renders_error_on_malformed_response() {
    let mock = MockAppliance::start().await.unwrap();
    mock.update(|s| {
        s.raw_bodies
            .insert("speaker".to_string(), "not json".to_string());
    })
    .await;
    let state = state_for(&mock).await;

    let (status, _, body) = send(&state, get("/")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("An error occurred: Invalid response from &#39;speaker&#39;"));
}

#[tokio::test]
async fn test_set_slot_updates_processor_and_redirects() {
    let mock = MockAppliance::start().await.unwrap();
    let state = state_for(&mock).await;

    let (status, headers, _) = send(&state, form_post("/set-slot", "slot_index=1")).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
    assert_eq!(mock.state().await.active_slot, 1);
}

#[tokio::test]
async fn test_set_slot_rejects_bad_form_without_contacting_processor() {
    let mock = MockAppliance::start().await.unwrap();
    let state = state_for(&mock).await;

    let (status, _, _) = send(&state, form_post("/set-slot", "slot_index=first")).await;

    assert!(status.is_client_error());
    assert!(mock.requests().await.is_empty());
}

#[tokio::test]
async fn test_reset_gain_sets_zero() {
    let mut initial = ApplianceState::default();
    initial.gain = -12.0;
    let mock = MockAppliance::with_state(initial).await.unwrap();
    let state = state_for(&mock).await;

    let (status, headers, _) = send(&state, form_post("/reset-gain", "")).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
    assert_eq!(mock.state().await.gain, 0.0);
}

#[tokio::test]
async fn test_set_filter_state_true_enables() {
    let mut initial = ApplianceState::default();
    initial.enabled = 0;
    let mock = MockAppliance::with_state(initial).await.unwrap();
    let state = state_for(&mock).await;

    let (status, _, _) = send(&state, form_post("/set-filter-state", "filter_state=true")).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(mock.state().await.enabled, 1);
}

#[tokio::test]
async fn test_set_filter_state_anything_else_disables() {
    for body in ["filter_state=false", "filter_state=TRUE", "filter_state=1", ""] {
        let mock = MockAppliance::start().await.unwrap();
        let state = state_for(&mock).await;

        let (status, _, _) = send(&state, form_post("/set-filter-state", body)).await;

        assert_eq!(status, StatusCode::SEE_OTHER, "body {:?}", body);
        assert_eq!(mock.state().await.enabled, 0, "body {:?}", body);
    }
}

#[tokio::test]
async fn test_write_failure_renders_error_instead_of_redirect() {
    let mock = MockAppliance::start().await.unwrap();
    mock.update(|s| s.fail_with = Some(dirac_mock::StatusCode::SERVICE_UNAVAILABLE))
        .await;
    let state = state_for(&mock).await;

    let (status, headers, body) = send(&state, form_post("/reset-gain", "")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(headers.get(header::LOCATION).is_none());
    assert!(body.contains("An error occurred:"));
}

#[tokio::test]
async fn test_api_status_snapshot() {
    let mock = MockAppliance::start().await.unwrap();
    let state = state_for(&mock).await;

    let (status, _, body) = send(&state, get("/api/status")).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["slots"].as_array().unwrap().len(), 2);
    assert_eq!(json["slots"][0]["name"], "Ojas1");
    assert_eq!(json["active_slot"], 0);
    assert_eq!(json["speaker_gain"], 0.0);
    assert_eq!(json["filter_state"], true);
    assert_eq!(json["speaker_limits"]["min"], -50.0);
}

#[tokio::test]
async fn test_api_status_reports_processor_error() {
    let mock = MockAppliance::start().await.unwrap();
    mock.update(|s| s.fail_with = Some(dirac_mock::StatusCode::NOT_FOUND))
        .await;
    let state = state_for(&mock).await;

    let (status, _, body) = send(&state, get("/api/status")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("list-slots"));
}
