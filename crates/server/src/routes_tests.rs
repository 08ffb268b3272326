// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use mx_core::FakeClock;
use mx_engine::{Registry, Router as TriggerRouter, Scheduler};
use mx_executor::FakeInstrumentExecutor;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

const CAST_YAML: &str = r#"
name: cast
desc: a cast
version: "1"
drivers: ["i1"]
schedule:
  run_date: "now"
blocks:
  - label: mission
    sequence:
      - sleep: 0.001
"#;

fn test_app() -> (tempfile::TempDir, Arc<AppState<FakeClock>>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let store = Arc::new(mx_store::Store::open_with_clock(dir.path().join("wal.jsonl"), clock.clone()).expect("open store"));
    let executor = Arc::new(FakeInstrumentExecutor::new());
    let scheduler = Arc::new(Scheduler::with_clock(DEFAULT_CONCURRENCY_FOR_TESTS, clock));
    let router = Arc::new(TriggerRouter::new());
    let registry = Arc::new(Registry::new(store.clone(), executor, scheduler, router));
    (dir, Arc::new(AppState::new(registry, store)))
}

const DEFAULT_CONCURRENCY_FOR_TESTS: usize = 4;

async fn settle() {
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (_dir, state) = test_app();
    let app = build_router(state);
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn missions_schema_reflects_the_mission_type() {
    let (_dir, state) = test_app();
    let app = build_router(state);
    let response = app
        .oneshot(Request::builder().uri("/missions/schema").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let schema = body_json(response).await;
    assert!(schema.get("properties").is_some());
}

#[tokio::test]
async fn create_mission_then_fetch_full_projection() {
    let (_dir, state) = test_app();
    let app = build_router(state);

    let create = app
        .clone()
        .oneshot(Request::builder().method("POST").uri("/missions").body(Body::from(CAST_YAML)).expect("request"))
        .await
        .expect("response");
    assert_eq!(create.status(), StatusCode::OK);
    let created = body_json(create).await;
    assert_eq!(created["name"], "cast");
    assert_eq!(created["version"], "1");
    assert_eq!(created["script"], CAST_YAML);

    let get = app
        .clone()
        .oneshot(Request::builder().uri("/missions/cast").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(get.status(), StatusCode::OK);
    assert_eq!(body_json(get).await["id"], "cast");
}

#[tokio::test]
async fn duplicate_upload_with_different_body_is_rejected() {
    let (_dir, state) = test_app();
    let app = build_router(state);

    let first = app
        .clone()
        .oneshot(Request::builder().method("POST").uri("/missions").body(Body::from(CAST_YAML)).expect("request"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let different = CAST_YAML.replace("0.001", "0.002");
    let second = app
        .oneshot(Request::builder().method("POST").uri("/missions").body(Body::from(different)).expect("request"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn activate_runs_the_mission_and_deactivates_when_one_shot() {
    let (_dir, state) = test_app();
    let app = build_router(state.clone());

    app.clone()
        .oneshot(Request::builder().method("POST").uri("/missions").body(Body::from(CAST_YAML)).expect("request"))
        .await
        .expect("create response");

    let activate = app
        .clone()
        .oneshot(Request::builder().uri("/missions/cast/activate").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(activate.status(), StatusCode::OK);

    state.registry.tick();
    settle().await;

    let get = app
        .oneshot(Request::builder().uri("/missions/cast").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let projection = body_json(get).await;
    assert_eq!(projection["active"], false);
    assert_eq!(projection["run_count"], 1);
    let events = projection["events"].as_array().expect("events array");
    let kinds: Vec<&str> = events.iter().map(|e| e[1].as_str().expect("kind string")).collect();
    assert_eq!(kinds, vec!["start", "lock", "step", "unlock", "completion"]);
}

#[tokio::test]
async fn unknown_mission_is_a_bad_request() {
    let (_dir, state) = test_app();
    let app = build_router(state);
    let response = app
        .oneshot(Request::builder().uri("/missions/nope").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validate_endpoint_rejects_a_document_with_no_blocks() {
    let (_dir, state) = test_app();
    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/missions/validate")
                .body(Body::from("name: cast\nversion: \"1\"\n"))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
