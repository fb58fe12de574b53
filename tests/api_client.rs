#![allow(clippy::unwrap_used)]

use coursedesk::{
    api::{ApiClient, ClientConfig, ClientError, MultipartBody},
    session::{EncryptedStore, SessionStore, StoreKey},
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn store_with(access: Option<&str>, refresh: Option<&str>) -> Arc<EncryptedStore> {
    let store = Arc::new(EncryptedStore::in_memory(StoreKey::generate()));
    if let Some(access) = access {
        store.set_token(&SecretString::from(access)).unwrap();
    }
    if let Some(refresh) = refresh {
        store.set_refresh_token(&SecretString::from(refresh)).unwrap();
    }
    store
}

fn client(server: &MockServer, store: &Arc<EncryptedStore>) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.uri()), store.clone()).unwrap()
}

fn token(store: &EncryptedStore) -> Option<String> {
    store
        .get_token()
        .unwrap()
        .map(|t| t.expose_secret().to_string())
}

#[tokio::test]
async fn sends_bearer_token_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/course/all"))
        .and(header("authorization", "Bearer access-1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"courses": []})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("access-1"), None);
    let envelope = client(&server, &store).get("course/all").await.unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.data(), Some(&json!({"courses": []})));

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("coursedesk/"));
}

#[tokio::test]
async fn refreshes_once_and_replays_with_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "fresh", "refreshToken": "refresh-2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"), Some("refresh-1"));
    let envelope = client(&server, &store).get("user/me").await.unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.data(), Some(&json!({"id": "u1"})));
    assert_eq!(token(&store).as_deref(), Some("fresh"));
    assert_eq!(
        store
            .get_refresh_token()
            .unwrap()
            .map(|t| t.expose_secret().to_string())
            .as_deref(),
        Some("refresh-2")
    );

    // The refresh call itself must not carry the stale bearer token.
    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/user/refresh-token")
        .unwrap();
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn refresh_failure_returns_original_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "jwt expired", "code": "TOKEN_EXPIRED"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "revoked"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"), Some("refresh-1"));
    let envelope = client(&server, &store).get("user/me").await.unwrap();

    assert_eq!(envelope.status(), 401);
    let error = envelope.error().unwrap();
    assert_eq!(error.message, "jwt expired");
    assert_eq!(error.code.as_deref(), Some("TOKEN_EXPIRED"));

    // The client leaves the session alone; clearing is the gate's call.
    assert_eq!(token(&store).as_deref(), Some("stale"));
}

async fn assert_unusable_refresh_returns_original_401(refresh: ResponseTemplate) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .respond_with(refresh)
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"), Some("refresh-1"));
    let envelope = client(&server, &store).get("user/me").await.unwrap();

    assert_eq!(envelope.status(), 401);
    assert_eq!(envelope.error().unwrap().message, "jwt expired");
    assert_eq!(token(&store).as_deref(), Some("stale"));
    assert_eq!(
        store
            .get_refresh_token()
            .unwrap()
            .map(|t| t.expose_secret().to_string())
            .as_deref(),
        Some("refresh-1")
    );

    // One original call plus the refresh; nothing was replayed.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn refresh_with_non_json_body_returns_original_401() {
    assert_unusable_refresh_returns_original_401(
        ResponseTemplate::new(200).set_body_string("<html>gateway</html>"),
    )
    .await;
}

#[tokio::test]
async fn refresh_without_access_token_returns_original_401() {
    assert_unusable_refresh_returns_original_401(
        ResponseTemplate::new(200).set_body_json(json!({"refreshToken": "refresh-2"})),
    )
    .await;
}

#[tokio::test]
async fn missing_refresh_token_skips_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wishlist"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"), None);
    let envelope = client(&server, &store).get("wishlist").await.unwrap();

    assert_eq!(envelope.status(), 401);
    assert_eq!(
        envelope.error().unwrap().message,
        "Request failed with status 401"
    );
}

#[tokio::test]
async fn replayed_401_is_not_retried_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "fresh"}})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"), Some("refresh-1"));
    let envelope = client(&server, &store).get("admin/users").await.unwrap();

    assert_eq!(envelope.status(), 401);
    assert_eq!(envelope.error().unwrap().message, "nope");
    assert_eq!(token(&store).as_deref(), Some("fresh"));
}

#[tokio::test]
async fn non_json_body_raises() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/course/all"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let store = store_with(Some("t"), None);
    let err = client(&server, &store).get("course/all").await.unwrap_err();

    assert!(matches!(err, ClientError::FailedJsonParse { status: 502, .. }));
    assert_eq!(err.code(), "FAILED_JSON_PARSE");
}

#[tokio::test]
async fn empty_body_is_null_data() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/chapter/ch1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = store_with(Some("t"), None);
    let envelope = client(&server, &store).delete("chapter/ch1").await.unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.data(), Some(&serde_json::Value::Null));
}

#[tokio::test]
async fn anonymous_requests_carry_no_auth_and_never_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(Some("access"), Some("refresh"));
    let body = coursedesk::api::RequestBody::json(&json!({"email": "a@b.c", "password": "pw"})).unwrap();
    let envelope = client(&server, &store)
        .request(Method::POST, "user/login", Some(body), false)
        .await
        .unwrap();

    assert_eq!(envelope.status(), 401);
    assert_eq!(envelope.error().unwrap().message, "Invalid credentials");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn multipart_uses_form_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/image"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"url": "https://cdn/x.png"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("t"), None);
    let form = MultipartBody::new()
        .text("alt", "cover")
        .file("image", "x.png", vec![0x89, 0x50], Some("image/png"));
    let envelope = client(&server, &store)
        .post_file("upload/image", form)
        .await
        .unwrap();

    assert_eq!(envelope.status(), 201);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn multipart_is_rebuilt_for_replay() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(Some("stale"), Some("refresh"));
    let form = MultipartBody::new().file("file", "notes.txt", b"hello".to_vec(), None);
    let envelope = client(&server, &store)
        .post_file("upload/file", form)
        .await
        .unwrap();

    assert!(envelope.is_success());
}

#[tokio::test]
async fn application_errors_are_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/course/c1"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "Title is required", "code": 4221})),
        )
        .mount(&server)
        .await;

    let store = store_with(Some("t"), None);
    let envelope = client(&server, &store)
        .put("course/c1", &json!({"title": ""}))
        .await
        .unwrap();

    assert!(!envelope.is_success());
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "success": false,
            "data": null,
            "error": {"message": "Title is required", "code": "4221"}
        })
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let store = store_with(Some("t"), None);
    let client = ApiClient::new(&ClientConfig::new(uri), store).unwrap();
    let err = client.get("user/me").await.unwrap_err();

    assert_eq!(err.code(), "NETWORK");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/course/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(server.uri());
    config.timeout = Duration::from_millis(200);

    let store = store_with(Some("t"), None);
    let client = ApiClient::new(&config, store).unwrap();
    let err = client.get("course/all").await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout(_)));
}
