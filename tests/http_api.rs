//! End-to-end tests of the HTTP surface against unreachable databases.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::Value;

use market_gateway::health::NodeStatus;
use market_gateway::http::X_REQUEST_ID;

mod common;

#[tokio::test]
async fn test_health_reports_every_host_down_in_order() {
    let port = common::closed_port().await;
    let (addr, shutdown) = common::start_gateway(common::local_config(port)).await;

    let res = common::client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(res.status(), StatusCode::OK);

    let statuses: Vec<NodeStatus> = res.json().await.unwrap();
    assert_eq!(
        statuses,
        vec![
            NodeStatus::down("127.0.0.1"),
            NodeStatus::down("localhost"),
            NodeStatus::down("127.0.0.1"),
        ]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_probes_time_out_concurrently() {
    let silent = common::start_silent_backend().await;
    let mut config = common::local_config(silent.port());
    config.health_check.secondary1_host = "127.0.0.1".into();
    config.health_check.timeout_ms = 600;
    let (addr, shutdown) = common::start_gateway(config).await;

    let start = Instant::now();
    let res = common::client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    let elapsed = start.elapsed();

    let body: Value = res.json().await.unwrap();
    let statuses = body.as_array().unwrap();
    assert_eq!(statuses.len(), 3);
    for status in statuses {
        assert_eq!(status["up"], false);
        assert_eq!(status["latency_ms"], Value::Null);
    }
    // three 600ms timeouts in sequence would take 1.8s
    assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");

    shutdown.trigger();
}

#[tokio::test]
async fn test_data_rejects_bad_limits() {
    let port = common::closed_port().await;
    let (addr, shutdown) = common::start_gateway(common::local_config(port)).await;
    let client = common::client();

    for query in ["limit=0", "limit=-5", "limit=10001", "limit=abc"] {
        let res = client
            .get(format!("http://{addr}/data?{query}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{query}");

        let body: Value = res.json().await.unwrap();
        assert!(body["detail"].is_string(), "{query}: {body}");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_data_fails_when_replica_is_down() {
    let port = common::closed_port().await;
    let (addr, shutdown) = common::start_gateway(common::local_config(port)).await;

    let res = common::client()
        .get(format!("http://{addr}/data?limit=3"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "failed to fetch market data");

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let port = common::closed_port().await;
    let (addr, shutdown) = common::start_gateway(common::local_config(port)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/data?limit=0"))
        .send()
        .await
        .unwrap();
    let generated = res.headers().get(X_REQUEST_ID).expect("missing request id");
    assert!(!generated.is_empty());

    let res = client
        .get(format!("http://{addr}/data?limit=0"))
        .header(X_REQUEST_ID, "client-chosen-id")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[X_REQUEST_ID], "client-chosen-id");

    shutdown.trigger();
}
