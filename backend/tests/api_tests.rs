//! HTTP API tests
//!
//! Drive the full router in-process with `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shared::{default_zone_seeds, EngineOptions, ZoneSimulationEngine};
use smartirrig_server::{
    create_app, services::ReadingSource, AppState, Config, SimulationService,
};
use tower::ServiceExt;

fn app() -> (Router, AppState) {
    let engine = ZoneSimulationEngine::new(
        &default_zone_seeds(),
        EngineOptions {
            seed_history: true,
            rng_seed: Some(2024),
            ..EngineOptions::default()
        },
    );
    let simulation =
        SimulationService::new(engine, ReadingSource::Simulated, Duration::from_millis(3000));
    let state = AppState::new(simulation, Config::default());
    (create_app(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

// ============================================================================
// Read endpoints
// ============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let (app, _) = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("SmartIrrig API v1.0".into()));

    let (status, body) = get(&app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mode"], "simulated");
    assert_eq!(body["running"], false);
    assert_eq!(body["environment"], Config::default().environment);
}

#[tokio::test]
async fn test_dashboard() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zones"].as_array().unwrap().len(), 4);
    assert_eq!(body["weather"]["condition"], "Sunny");
    assert_eq!(body["weather"]["ambientTemp"], 25.0);
    assert_eq!(body["running"], false);
}

#[tokio::test]
async fn test_zone_wire_format() {
    let (app, _) = app();
    let (status, zone) = get(&app, "/api/v1/zones/greenhouse").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zone["id"], "greenhouse");
    assert_eq!(zone["cropType"], "Tomato");
    assert_eq!(zone["isValveOpen"], false);
    assert!(zone["currentReading"]["soilMoisture10cm"].is_number());
    assert!(["OPTIMAL", "WARNING", "CRITICAL"].contains(&zone["status"].as_str().unwrap()));

    let (status, history) = get(&app, "/api/v1/zones/greenhouse/history").await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 24);
    assert_eq!(history.last().unwrap(), &zone["currentReading"]);
}

#[tokio::test]
async fn test_unknown_zone_is_404() {
    let (app, _) = app();
    for uri in [
        "/api/v1/zones/nowhere",
        "/api/v1/zones/nowhere/history",
        "/api/v1/zones/nowhere/advice",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body["error"]["message_fr"].as_str().unwrap().contains("introuvable"));
    }

    let (status, _) = send(&app, Method::POST, "/api/v1/zones/nowhere/valve/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advice() {
    let (app, _) = app();
    let (status, advice) = get(&app, "/api/v1/zones/field1/advice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(advice["zone_id"], "field1");
    assert!(advice["message"].as_str().is_some_and(|m| !m.is_empty()));
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test]
async fn test_toggle_valve() {
    let (app, _) = app();
    let (status, zone) = send(&app, Method::POST, "/api/v1/zones/field2/valve/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zone["isValveOpen"], true);

    let (_, zone) = get(&app, "/api/v1/zones/field2").await;
    assert_eq!(zone["isValveOpen"], true);

    let (_, zone) = send(&app, Method::POST, "/api/v1/zones/field2/valve/toggle", None).await;
    assert_eq!(zone["isValveOpen"], false);
}

#[tokio::test]
async fn test_set_weather() {
    let (app, _) = app();
    let (status, weather) = send(
        &app,
        Method::PUT,
        "/api/v1/weather",
        Some(json!({ "condition": "rainy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(weather, json!({ "condition": "Rainy", "ambientTemp": 20.0 }));

    let (_, weather) = get(&app, "/api/v1/weather").await;
    assert_eq!(weather["condition"], "Rainy");
}

#[tokio::test]
async fn test_set_weather_rejects_unknown() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/weather",
        Some(json!({ "condition": "Snowy" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "condition");
}

#[tokio::test]
async fn test_manual_tick() {
    let (app, _) = app();
    let (_, before) = get(&app, "/api/v1/zones/field1").await;

    let (status, body) = send(&app, Method::POST, "/api/v1/simulation/tick", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (_, after) = get(&app, "/api/v1/zones/field1").await;
    assert_ne!(before["currentReading"], after["currentReading"]);
    assert_eq!(after["sensorHistory"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_start_stop_via_api() {
    let (app, state) = app();

    let (status, body) = send(&app, Method::POST, "/api/v1/simulation/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert_eq!(body["status"]["running"], true);
    assert_eq!(body["status"]["tick_interval_ms"], 3000);
    assert!(state.simulation.is_running());

    let (_, body) = send(&app, Method::POST, "/api/v1/simulation/start", None).await;
    assert_eq!(body["changed"], false);

    let (_, body) = send(&app, Method::POST, "/api/v1/simulation/stop", None).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["status"]["running"], false);

    let (_, body) = get(&app, "/api/v1/simulation").await;
    assert_eq!(body["running"], false);
    assert_eq!(body["mode"], "simulated");
    assert_eq!(body["history_limit"], 24);
}
