// tests/api_http.rs
//
// HTTP-level tests for the report Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET figure routes (landscape, tension, trajectory, fingerprints, quotes, breakdown, sources)
// - GET /schema (export headers)
// - POST /schema (accept + both rejection kinds, previous report kept)
// - POST /schema/reset
// - GET /spec-preview
// - falsy required fields rejected, pasted text exported verbatim
// - tension settle does not hold the runtime thread

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use narrative_landscape::config::DEFAULT_LANDSCAPE_CONFIG_PATH;
use narrative_landscape::defaults::DEFAULT_SCHEMA_JSON;
use narrative_landscape::{build_app, AppState, LayoutConfig, ReportSession};

const BODY_LIMIT: usize = 1024 * 1024;

const SCENARIO: &str = r#"{"themes":[{"name":"A","count":10,"percentage":50,"sentiment":{"positive":90,"negative":5,"neutral":5}},{"name":"B","count":10,"percentage":50,"sentiment":{"positive":5,"negative":90,"neutral":5}}],"sentiment_overall":{"positive":40,"negative":40,"neutral":20}}"#;

/// Fresh router over the demo document and built-in layout defaults.
fn test_router() -> Router {
    let session = ReportSession::with_default().expect("demo schema");
    build_app(AppState::new(
        session,
        LayoutConfig::default(),
        DEFAULT_LANDSCAPE_CONFIG_PATH.into(),
    ))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn get_json(app: &Router, uri: &str) -> Json {
    let (status, bytes) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn post_schema(app: &Router, raw: &str) -> (StatusCode, Json) {
    let req = Request::post("/schema")
        .header("content-type", "text/plain")
        .body(Body::from(raw.to_string()))
        .unwrap();
    let (status, bytes) = send(app, req).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_router();
    let (status, bytes) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), "ok");
}

#[tokio::test]
async fn demo_figures_are_served() {
    let app = test_router();

    let land = get_json(&app, "/landscape").await;
    assert_eq!(land["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(land["axis"]["negative_caption"], "← NEGATIVE / FRICTION");

    let arc = get_json(&app, "/trajectory").await;
    assert_eq!(arc["kind"], "friction");
    assert_eq!(arc["points"].as_array().unwrap().len(), 5);

    let fps = get_json(&app, "/fingerprints").await;
    assert_eq!(fps[0]["axes"].as_array().unwrap().len(), 5);
    assert_eq!(fps[0]["axes"][4]["placeholder"], true);

    let quotes = get_json(&app, "/quotes").await;
    assert_eq!(quotes.as_array().unwrap().len(), 4);

    let rows = get_json(&app, "/breakdown").await;
    assert_eq!(rows[0]["classification"], "Positive Driver");

    let sources = get_json(&app, "/sources").await;
    assert_eq!(sources[1]["hostname"], "androidauthority.com");

    let tension = get_json(&app, "/tension").await;
    assert_eq!(tension["nodes"].as_array().unwrap().len(), 4);
    assert!(tension["ticks"].as_u64().unwrap() > 0);
    assert!(tension["nodes"][0]["x"].is_number());
}

#[tokio::test]
async fn full_report_bundles_every_figure() {
    let app = test_router();
    let r = get_json(&app, "/report").await;
    for key in [
        "meta",
        "sentiment_overall",
        "landscape",
        "tension",
        "trajectory",
        "fingerprints",
        "breakdown",
        "quotes",
        "sources",
    ] {
        assert!(r.get(key).is_some(), "missing {key}");
    }
    assert_eq!(r["meta"]["topic"], "NotebookLM");
}

#[tokio::test]
async fn export_sets_download_headers() {
    let app = test_router();
    let resp = app
        .clone()
        .oneshot(Request::get("/schema").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"narrative_schema_v2.json\""
    );
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), DEFAULT_SCHEMA_JSON.trim_end());
}

#[tokio::test]
async fn import_replaces_every_figure() {
    let app = test_router();
    let (status, v) = post_schema(&app, SCENARIO).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["generation"], 1);
    assert_eq!(v["themes"], 2);

    let land = get_json(&app, "/landscape").await;
    assert_eq!(land["nodes"].as_array().unwrap().len(), 2);
    let tension = get_json(&app, "/tension").await;
    assert_eq!(tension["links"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_import_is_rejected_and_previous_report_kept() {
    let app = test_router();
    let (status, v) = post_schema(&app, "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "malformed_input");
    assert!(v["message"].as_str().unwrap().starts_with("Invalid JSON format"));

    let land = get_json(&app, "/landscape").await;
    assert_eq!(land["nodes"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn schema_violation_is_rejected_and_export_unchanged() {
    let app = test_router();
    let (status, v) = post_schema(&app, r#"{"themes":[]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "schema_violation");
    assert_eq!(
        v["message"],
        "Invalid Narrative Schema V2.0: Missing themes or sentiment_overall."
    );

    let (_, bytes) = send(&app, Request::get("/schema").body(Body::empty()).unwrap()).await;
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), DEFAULT_SCHEMA_JSON.trim_end());
}

#[tokio::test]
async fn reset_restores_demo_document() {
    let app = test_router();
    post_schema(&app, SCENARIO).await;

    let (status, bytes) = send(&app, Request::post("/schema/reset").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["generation"], 2);
    assert_eq!(v["themes"], 4);
    assert_eq!(v["sources"], 4);
}

#[tokio::test]
async fn spec_preview_is_vega_lite() {
    let app = test_router();
    post_schema(&app, SCENARIO).await;
    let spec = get_json(&app, "/spec-preview").await;
    assert_eq!(spec["$schema"], "https://vega.github.io/schema/vega-lite/v5.json");
    assert_eq!(spec["mark"], "circle");
    assert_eq!(spec["data"]["values"][1]["name"], "B");
}

#[tokio::test]
async fn falsy_required_fields_are_rejected() {
    let app = test_router();
    for raw in [
        r#"{"themes":false,"sentiment_overall":{}}"#,
        r#"{"themes":0,"sentiment_overall":{}}"#,
        r#"{"themes":[],"sentiment_overall":""}"#,
    ] {
        let (status, v) = post_schema(&app, raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_eq!(v["error"], "schema_violation");
    }
}

#[tokio::test]
async fn export_keeps_pasted_number_and_escape_spelling() {
    let app = test_router();
    let raw = r#"{"meta":{"topic":"caf\u00e9 \/ x"},"themes":[],"sentiment_overall":{"positive":1e2,"negative":1E+2,"neutral":0}}"#;
    let (status, _) = post_schema(&app, raw).await;
    assert_eq!(status, StatusCode::OK);

    let (_, bytes) = send(&app, Request::get("/schema").body(Body::empty()).unwrap()).await;
    let out = String::from_utf8(bytes).unwrap();
    assert!(out.contains(r#""topic": "caf\u00e9 \/ x""#), "{out}");
    assert!(out.contains(r#""positive": 1e2"#), "{out}");
    assert!(out.contains(r#""negative": 1E+2"#), "{out}");
}

/// Wide document of like-minded themes: no links, but charge is still pairwise.
fn wide_schema(n: usize) -> String {
    let themes: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"name":"T{i}","count":1,"percentage":1,"sentiment":{{"positive":90,"negative":5,"neutral":5}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"themes":[{}],"sentiment_overall":{{"positive":40,"negative":40,"neutral":20}}}}"#,
        themes.join(",")
    )
}

#[tokio::test(flavor = "current_thread")]
async fn tension_settle_leaves_runtime_responsive() {
    let app = test_router();
    let (status, _) = post_schema(&app, &wide_schema(400)).await;
    assert_eq!(status, StatusCode::OK);

    let settling = tokio::spawn({
        let app = app.clone();
        async move { send(&app, Request::get("/tension").body(Body::empty()).unwrap()).await }
    });
    // let the settle start on the single runtime thread
    tokio::task::yield_now().await;

    let (status, bytes) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"ok");
    assert!(!settling.is_finished(), "health answered only after the settle finished");

    let (status, bytes) = settling.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let frame: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(frame["nodes"].as_array().unwrap().len(), 400);
}
