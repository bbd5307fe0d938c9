//! Enrollment against a mock device registry over HTTP.

mod common;

use common::{identity, server_key, FakePlatform};
use portal_push::codec::encode_key;
use portal_push::{FailureReason, HttpDeviceRegistry, SubscriptionManager, SubscriptionState};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_subscribe_posts_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/add"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "userData": {
                "userID": "user-42",
                "username": "Ada",
                "email": "ada@example.com"
            },
            "deviceData": {
                "pushEndpoint": "https://push.example.com/sub/1",
                "publicKey": encode_key(&[4u8; 65]),
                "authToken": encode_key(&[7u8; 16])
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let registry = HttpDeviceRegistry::new(format!("{}/api", server.uri())).unwrap();
    let mut manager = SubscriptionManager::new(FakePlatform::granted(), registry, server_key());

    let outcome = manager.subscribe(&identity()).await.unwrap();
    assert_eq!(outcome.endpoint, "https://push.example.com/sub/1");
    assert_eq!(manager.state(), SubscriptionState::Subscribed);
}

#[tokio::test]
async fn test_server_error_fails_registration_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/add"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let registry = HttpDeviceRegistry::new(format!("{}/api/", server.uri())).unwrap();
    let mut manager = SubscriptionManager::new(FakePlatform::granted(), registry, server_key());

    let err = manager.subscribe(&identity()).await.unwrap_err();

    assert_eq!(err.reason(), FailureReason::DeviceRegistrationFailed);
    assert!(err.to_string().contains("HTTP 500"));
    assert!(manager.subscription().is_some());
    assert_eq!(manager.platform().calls().unsubscribe, 0);
}

#[tokio::test]
async fn test_retry_after_server_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/add"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/add"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let registry = HttpDeviceRegistry::new(format!("{}/api", server.uri())).unwrap();
    let mut manager = SubscriptionManager::new(FakePlatform::granted(), registry, server_key());

    assert!(manager.subscribe(&identity()).await.is_err());
    let outcome = manager.retry_device_registration(&identity()).await.unwrap();

    assert!(outcome.reused_subscription);
    assert_eq!(manager.platform().calls().subscribe, 1);
}
