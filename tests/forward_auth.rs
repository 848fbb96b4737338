//! Forward-auth service over a real socket.

use std::net::SocketAddr;

use axum::http::StatusCode;
use serde_json::{json, Value};
use shortcut_proxy::auth::{AuthServer, CredentialStore};
use shortcut_proxy::config::loader::split_list;
use shortcut_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

async fn start_auth(usernames: &str, passwords: &str, shutdown: &Shutdown) -> SocketAddr {
    let store = CredentialStore::from_lists(&split_list(usernames), &split_list(passwords));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = AuthServer::new(store).run(listener, signal).await;
    });
    addr
}

#[tokio::test]
async fn test_allow_and_deny() {
    let shutdown = Shutdown::new();
    let addr = start_auth("a,b", "p1,p2", &shutdown).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .post(format!("http://{addr}/auth"))
        .json(&json!({"username": "b", "password": "p2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"result": "allow", "is_superuser": false}));

    let res = client
        .post(format!("http://{addr}/auth"))
        .json(&json!({"username": "b", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"result": "deny", "is_superuser": false}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_root_path_and_malformed_body() {
    let shutdown = Shutdown::new();
    let addr = start_auth("a", "p1", &shutdown).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .post(format!("http://{addr}/"))
        .json(&json!({"username": "a", "password": "p1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("http://{addr}/auth"))
        .body("username=a&password=p1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(!res.text().await.unwrap().is_empty());

    let res = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}
