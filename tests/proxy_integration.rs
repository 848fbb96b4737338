//! End-to-end tests: client → proxy → mock upstream.

use std::time::Duration;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use shortcut_proxy::lifecycle::Shutdown;

mod common;

const OK_RESPONSE: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}";

fn location_url() -> String {
    let payload = json!({
        "type": "ShortcutLocation",
        "id": "[#5e639]",
        "name": "",
        "waypoint": {"lat": 53.54, "lon": 9.98, "address": "Elbphilharmonie Hamburg"}
    });
    format!("https://maps.example/import/{}", STANDARD.encode(payload.to_string()))
}

fn route_url(extra: Option<(&str, &str)>) -> String {
    let mut payload = json!({
        "type": "ShortcutRoute",
        "id": "[#dd9f9]",
        "name": "",
        "waypoints": [{"lat": 53.55, "lon": 9.93}, {"lat": 53.55, "lon": 9.98}],
        "routeTimeText": "17 Min.",
        "routeLengthText": "4.8 km"
    });
    if let Some((key, value)) = extra {
        payload[key] = json!(value);
    }
    format!("https://maps.example/import/{}", STANDARD.encode(payload.to_string()))
}

#[tokio::test]
async fn test_get_is_forwarded_with_query() {
    let (backend, mut requests) = common::start_recording_backend(OK_RESPONSE).await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/abc123?domain=s.example"))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "{}");

    let seen = requests.recv().await.unwrap();
    assert_eq!(
        seen.request_line(),
        "GET /rest/v3/short-urls/abc123?domain=s.example HTTP/1.1"
    );
    assert_eq!(seen.header_values("host"), vec![backend.to_string()]);
    assert_eq!(seen.header_values("x-request-id").len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_query_dropped_when_disabled() {
    let (backend, mut requests) = common::start_recording_backend(OK_RESPONSE).await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy_with(backend, &shutdown, |config| {
        config.upstream.forward_query = false;
    })
    .await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/abc123?domain=s.example"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.request_line(), "GET /rest/v3/short-urls/abc123 HTTP/1.1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_valid_post_is_forwarded_unchanged() {
    let (backend, mut requests) = common::start_recording_backend(OK_RESPONSE).await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;

    // Key order and spacing must survive untouched.
    let body = format!(r#"{{ "tags": ["x"],  "longUrl": "{}" }}"#, location_url());

    let res = common::client()
        .post(format!("http://{proxy}/rest/v3/short-urls"))
        .header("content-type", "application/json")
        .header("x-api-key", "secret")
        .body(body.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.request_line(), "POST /rest/v3/short-urls HTTP/1.1");
    assert_eq!(seen.body, body.as_bytes());
    assert_eq!(seen.header_values("x-api-key"), vec!["secret"]);
    assert_eq!(seen.header_values("content-type"), vec!["application/json"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_route_shortcut_schema() {
    let (backend, mut requests) = common::start_recording_backend(OK_RESPONSE).await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;
    let client = common::client();
    let url = format!("http://{proxy}/rest/v3/short-urls");

    let res = client
        .post(&url)
        .json(&json!({ "longUrl": route_url(None) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(requests.recv().await.is_some());

    let res = client
        .post(&url)
        .json(&json!({ "longUrl": route_url(Some(("extra", "extra"))) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Invalid");

    // Nothing reached the backend for the rejected request.
    assert!(requests.try_recv().is_err());

    shutdown.trigger();
}

#[tokio::test]
async fn test_rejections_never_reach_upstream() {
    let (backend, mut requests) = common::start_recording_backend(OK_RESPONSE).await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;
    let client = common::client();
    let url = format!("http://{proxy}/rest/v3/short-urls");

    let cases = vec![
        client.get(format!("http://{proxy}/rest/v3/short-urls/")),
        client.get(format!("http://{proxy}/rest/v3/short-url/abc")),
        client.post(&url).header("content-type", "text/plain").body(r#"{"longUrl": "x"}"#),
        client.post(&url).header("content-type", "application/json"),
        client.post(&url).json(&json!({ "longUrl": null })),
        client.post(&url).json(&json!({ "longUrl": 42 })),
        client.post(&url).json(&json!({ "longUrl": "http://example.com/import/" })),
        client.post(&url).json(&json!({ "longUrl": "http://example.com/import/123" })),
    ];

    for request in cases {
        let res = request.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = client
        .put(format!("http://{proxy}/rest/v3/short-urls/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(requests.try_recv().is_err(), "no rejected request may be forwarded");

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_does_not_touch_upstream() {
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(common::closed_port().await, &shutdown).await;

    let res = common::client()
        .get(format!("http://{proxy}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_repeated_headers_both_directions() {
    let (backend, mut requests) = common::start_recording_backend(
        "HTTP/1.1 201 Created\r\nX-Multi: one\r\nX-Multi: two\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/abc"))
        .header("x-foo", "first")
        .header("x-foo", "second")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let values: Vec<_> = res
        .headers()
        .get_all("x-multi")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["one", "two"]);

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.header_values("x-foo"), vec!["first", "second"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirect_is_relayed_not_followed() {
    let (backend, mut requests) = common::start_recording_backend(
        "HTTP/1.1 302 Found\r\nLocation: http://elsewhere.example/target\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "http://elsewhere.example/target");

    assert!(requests.recv().await.is_some());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(requests.try_recv().is_err(), "proxy must not follow the redirect");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_status_relayed() {
    let (backend, _requests) = common::start_recording_backend(
        "HTTP/1.1 404 Not Found\r\nContent-Type: application/problem+json\r\nContent-Length: 14\r\nConnection: close\r\n\r\n{\"status\":404}",
    )
    .await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(backend, &shutdown).await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/missing"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["content-type"], "application/problem+json");
    assert_eq!(res.text().await.unwrap(), "{\"status\":404}");

    shutdown.trigger();
}

#[tokio::test]
async fn test_hung_upstream_times_out_as_500() {
    let backend = common::start_silent_backend().await;
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy_with(backend, &shutdown, |config| {
        config.timeouts.upstream_secs = 1;
        config.timeouts.request_secs = 3;
    })
    .await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/abc"))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Error performing request");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let shutdown = Shutdown::new();
    let proxy = common::start_proxy(common::closed_port().await, &shutdown).await;

    let res = common::client()
        .get(format!("http://{proxy}/rest/v3/short-urls/abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Error performing request");

    shutdown.trigger();
}
