mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use todo_service::config::{BackendConfig, Config, PoolConfig};
use todo_service::daemon::run_with_shutdown;

use common::{failing_app, memory_app, send};

#[tokio::test]
async fn add_edit_delete_round() {
    let app = memory_app();

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "POST", "/add-item", Some(json!({"text": "buy milk"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Item added successfully"}));

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"ID": 1, "itemDescription": "buy milk"}]));

    let (status, body) = send(
        &app,
        "PUT",
        "/edit-item",
        Some(json!({"ID": 1, "itemDescription": "buy bread"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Item updated successfully"}));

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(body, json!([{"ID": 1, "itemDescription": "buy bread"}]));

    let (status, body) = send(&app, "DELETE", "/delete-item/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Item deleted successfully"}));

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn add_item_requires_text() {
    let app = memory_app();

    for payload in [json!({}), json!({"text": ""}), json!({"text": null}), json!({"text": 5})] {
        let (status, body) = send(&app, "POST", "/add-item", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Text is required"}));
    }

    let (status, _) = send(&app, "POST", "/add-item", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/add-item")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn edit_item_requires_id_and_description() {
    let app = memory_app();
    send(&app, "POST", "/add-item", Some(json!({"text": "keep me"}))).await;

    let payloads = [
        json!({"itemDescription": "x"}),
        json!({"ID": 1}),
        json!({"ID": 1, "itemDescription": ""}),
        json!({"ID": 0, "itemDescription": "x"}),
        json!({"ID": "abc", "itemDescription": "x"}),
    ];
    for payload in payloads {
        let (status, body) = send(&app, "PUT", "/edit-item", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "ID and description required"}));
    }

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(body, json!([{"ID": 1, "itemDescription": "keep me"}]));
}

#[tokio::test]
async fn edit_accepts_string_id_and_leaves_other_rows() {
    let app = memory_app();
    send(&app, "POST", "/add-item", Some(json!({"text": "one"}))).await;
    send(&app, "POST", "/add-item", Some(json!({"text": "two"}))).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/edit-item",
        Some(json!({"ID": "2", "itemDescription": "deux"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(
        body,
        json!([
            {"ID": 1, "itemDescription": "one"},
            {"ID": 2, "itemDescription": "deux"}
        ])
    );
}

#[tokio::test]
async fn missing_ids_are_successful_no_ops() {
    let app = memory_app();
    send(&app, "POST", "/add-item", Some(json!({"text": "stay"}))).await;

    let (status, body) = send(&app, "DELETE", "/delete-item/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Item deleted successfully"}));

    let (status, _) = send(&app, "DELETE", "/delete-item/abc", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "PUT",
        "/edit-item",
        Some(json!({"ID": 42, "itemDescription": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Item updated successfully"}));

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(body, json!([{"ID": 1, "itemDescription": "stay"}]));
}

#[tokio::test]
async fn store_failures_collapse_to_database_error() {
    let app = failing_app();
    let expected = json!({"error": "Database error"});

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let (status, body) = send(&app, "POST", "/add-item", Some(json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let (status, body) = send(
        &app,
        "PUT",
        "/edit-item",
        Some(json!({"ID": 1, "itemDescription": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    let (status, body) = send(&app, "DELETE", "/delete-item/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, expected);

    // Validation still runs before the store is touched.
    let (status, _) = send(&app, "POST", "/add-item", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn allows_cross_origin_requests() {
    let app = memory_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn server_stops_on_shutdown_signal() {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        backend: BackendConfig::Memory,
        pool: PoolConfig::default(),
    };
    run_with_shutdown(&config, async {}).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_get_distinct_ids() {
    let app = memory_app();

    let mut handles = Vec::new();
    for n in 0..32 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            send(&app, "POST", "/add-item", Some(json!({"text": format!("task {n}")}))).await
        }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/", None).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 32);
    let mut ids: Vec<i64> = rows.iter().map(|row| row["ID"].as_i64().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids, (1..=32).collect::<Vec<i64>>());
}

#[tokio::test]
async fn edit_accepts_integral_float_id() {
    let app = memory_app();
    send(&app, "POST", "/add-item", Some(json!({"text": "draft"}))).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/edit-item",
        Some(json!({"ID": 1.0, "itemDescription": "final"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        "/edit-item",
        Some(json!({"ID": 1.5, "itemDescription": "half"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/", None).await;
    assert_eq!(body, json!([{"ID": 1, "itemDescription": "final"}]));
}
