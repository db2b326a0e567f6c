//! Integration tests using wiremock to simulate the administrative API.

use ptt_admin::{
    types::{ChannelFilter, LocationQuery, UserAttributes, UserFilter},
    ApiRequest, Client, Error,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: &str) -> Client {
    Client::builder()
        .host(server.uri())
        .api_key(api_key)
        .build()
        .unwrap()
}

#[tokio::test]
async fn auth_handshake_stores_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "token": "T1",
            "sid": "S1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The login must carry the freshly issued sid and the digest
    // md5(md5("pw") + "T1" + "key").
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(query_param("sid", "S1"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains(
            "password=7e6f6867fda0f97baeb074690b3b02da",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, "key");
    client.auth("admin", "pw").await.unwrap();
    assert_eq!(client.session_id(), Some("S1"));
}

#[tokio::test]
async fn auth_propagates_gettoken_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/gettoken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut client = client_for(&server, "key");
    let err = client.auth("admin", "pw").await.unwrap_err();
    assert_eq!(err.code(), 1010);
    assert_eq!(client.session_id(), None);
}

#[tokio::test]
async fn auth_rejects_grant_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .mount(&server)
        .await;

    let mut client = client_for(&server, "key");
    let err = client.auth("admin", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn session_id_is_attached_to_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channel/get"))
        .and(query_param("sid", "S1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "channels": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .host(server.uri())
        .api_key("key")
        .session_id("S1")
        .build()
        .unwrap();
    client.get_channels(&ChannelFilter::default()).await.unwrap();
}

#[tokio::test]
async fn logout_clears_session_even_when_remote_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let mut client = Client::builder()
        .host(server.uri())
        .api_key("key")
        .session_id("S1")
        .build()
        .unwrap();

    assert!(client.logout().await.is_err());
    assert_eq!(client.session_id(), None);
}

#[tokio::test]
async fn logout_clears_session_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .mount(&server)
        .await;

    let mut client = Client::builder()
        .host(server.uri())
        .api_key("key")
        .session_id("S1")
        .build()
        .unwrap();

    client.logout().await.unwrap();
    assert_eq!(client.session_id(), None);
}

#[tokio::test]
async fn channel_get_without_filters_hits_bare_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channel/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "channels": [{ "name": "dispatch" }, { "name": "ops" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let response = client.get_channels(&ChannelFilter::default()).await.unwrap();
    let channels = response.field("channels").and_then(|v| v.as_array()).unwrap();
    assert_eq!(channels.len(), 2);
}

#[tokio::test]
async fn user_filters_become_path_segments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/get/login/alice/channel/ops/gateway/1/max/10/start/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "users": [{ "name": "alice" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let filter = UserFilter::default()
        .username("alice")
        .channel("ops")
        .gateways_only()
        .max(10)
        .start(5);
    let response = client.get_users(&filter).await.unwrap();
    assert!(response.field("users").is_some());
}

#[tokio::test]
async fn http_500_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let err = client.get_users(&UserFilter::default()).await.unwrap_err();

    assert_eq!(err.code(), 1010);
    assert!(err.to_string().contains("500"), "got: {err}");
    match err {
        Error::Transport { status, url, .. } => {
            assert_eq!(status.map(|s| s.as_u16()), Some(500));
            assert!(url.contains("/user/get?rnd="));
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_pass_through_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "not authorized",
            "code": 21,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let err = client.get_users(&UserFilter::default()).await.unwrap_err();

    assert_eq!(err.code(), 21);
    match err {
        Error::Api { code, status, .. } => {
            assert_eq!(code, 21);
            assert_eq!(status, "not authorized");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let err = client.get_channels(&ChannelFilter::default()).await.unwrap_err();
    assert_eq!(err.code(), 1010);

    // Same classification when the body is JSON but has no status field.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [] })))
        .mount(&server)
        .await;
    let client = client_for(&server, "key");
    let err = client.get_channels(&ChannelFilter::default()).await.unwrap_err();
    assert_eq!(err.code(), 1010);
}

#[tokio::test]
async fn save_user_posts_form_fields() {
    let server = MockServer::start().await;

    // "pw" hashes to 8fe4c11451281c094a6578e6ddbf5eed on the wire.
    Mock::given(method("POST"))
        .and(path("/user/save"))
        .and(body_string_contains("name=bob"))
        .and(body_string_contains("password=8fe4c11451281c094a6578e6ddbf5eed"))
        .and(body_string_contains("full_name=Bob+Jones"))
        .and(body_string_contains("admin=true"))
        .and(body_string_contains("gateway=false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let user = UserAttributes::new("bob")
        .password("pw")
        .full_name("Bob Jones")
        .admin(true)
        .gateway(false);
    client.save_user(&user).await.unwrap();
}

#[tokio::test]
async fn add_channel_spells_out_boolean_segments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channel/add/name/dispatch/shared/true/invisible/false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client.add_channel("dispatch", true, false).await.unwrap();
}

#[tokio::test]
async fn batch_operations_repeat_form_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/delete"))
        .and(body_string_contains("login%5B%5D=a&login%5B%5D=b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/addtochannels"))
        .and(body_string_contains("users%5B%5D=alice&users%5B%5D=bob"))
        .and(body_string_contains("channels%5B%5D=dispatch&channels%5B%5D=ops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client.delete_users(["a", "b"]).await.unwrap();
    client
        .add_to_channels(["dispatch", "ops"], ["alice", "bob"])
        .await
        .unwrap();
}

#[tokio::test]
async fn role_settings_are_json_encoded_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channel/saverole/channel/dispatch/name/drivers"))
        .and(body_string_contains(
            "settings=%7B%22listen_only%22%3Afalse%7D",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client
        .save_channel_role("dispatch", "drivers", json!({ "listen_only": false }))
        .await
        .unwrap();
}

#[tokio::test]
async fn locations_query_uses_get_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location/get"))
        .and(query_param("northeast[]", "-30.5"))
        .and(query_param("southwest[]", "-31"))
        .and(query_param("name", "truck-7"))
        .and(query_param("max", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "locations": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let query = LocationQuery::new([-30.5, -70.5], [-31.0, -71.0])
        .name("truck-7")
        .max(100);
    client.get_locations(&query).await.unwrap();
}

#[tokio::test]
async fn location_user_puts_timestamps_in_the_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location/get/login/tracker-1/from/1700000000/to/1700086400"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "locations": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client
        .location_user("tracker-1", 1_700_000_000, 1_700_086_400)
        .await
        .unwrap();
}

#[tokio::test]
async fn location_user_keeps_negative_timestamps_intact() {
    let server = MockServer::start().await;

    // Pre-epoch instants render with a plain minus sign, not encoded.
    Mock::given(method("GET"))
        .and(path("/location/get/login/tracker-1/from/-86400/to/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "locations": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client.location_user("tracker-1", -86_400, 0).await.unwrap();
}

#[tokio::test]
async fn channel_roles_addresses_the_channel_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channel/roleslist/name/dispatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "roles": [{ "name": "drivers" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let response = client.channel_roles("dispatch").await.unwrap();
    assert!(response.field("roles").is_some());
}

#[tokio::test]
async fn delete_channel_role_repeats_role_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channel/deleterole/channel/dispatch"))
        .and(body_string_contains("roles%5B%5D=drivers&roles%5B%5D=guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client
        .delete_channel_role("dispatch", ["drivers", "guests"])
        .await
        .unwrap();
}

#[tokio::test]
async fn add_to_channel_role_posts_logins_to_the_role_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channel/addtorole/channel/dispatch/name/drivers"))
        .and(body_string_contains("login%5B%5D=alice&login%5B%5D=bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    client
        .add_to_channel_role("dispatch", "drivers", ["alice", "bob"])
        .await
        .unwrap();
}

#[tokio::test]
async fn raw_mode_returns_the_unparsed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("PONG"))
        .mount(&server)
        .await;

    let client = client_for(&server, "key");
    let raw = client.call_raw(ApiRequest::new("status/ping")).await.unwrap();
    assert_eq!(raw, "PONG");
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Nothing is listening on this port.
    let client = Client::builder()
        .host("127.0.0.1:1")
        .api_key("key")
        .build()
        .unwrap();

    let err = client.get_users(&UserFilter::default()).await.unwrap_err();
    assert_eq!(err.code(), 1010);
    assert!(matches!(err, Error::Transport { status: None, .. }));
}
