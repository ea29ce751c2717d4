//! Unit tests for the HTTP adapter.

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{Authorization, GITHUB_DIFF, GITHUB_JSON, HttpClient};
use crate::http::{EndpointRequest, FetchResult};

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(server.uri())
        .expect("client should build")
        .with_accept(GITHUB_JSON)
}

#[rstest]
#[tokio::test]
async fn get_json_sends_token_and_accept_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .and(header("authorization", "token secret"))
        .and(header("accept", GITHUB_JSON))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"full_name": "octocat/hello"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server)
        .with_authorization(Some(Authorization::Token("secret".to_owned())));
    let result = client
        .get_json(&EndpointRequest::new("/repos/octocat/hello"))
        .await;

    assert_eq!(
        result,
        FetchResult::Success(json!({"full_name": "octocat/hello"}))
    );
}

#[rstest]
#[tokio::test]
async fn get_json_omits_authorization_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_json(&EndpointRequest::new("/repos/octocat/hello"))
        .await;
    assert!(result.is_success());

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let first = requests.first().expect("one request should be recorded");
    assert!(
        first.headers.get("authorization").is_none(),
        "authorization header must be absent"
    );
    assert!(first.headers.get("user-agent").is_some());
}

#[rstest]
#[tokio::test]
async fn not_found_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_json(&EndpointRequest::new("/repos/ghost/missing"))
        .await;

    assert_eq!(result, FetchResult::NotFound);
}

#[rstest]
#[case(403, "API rate limit exceeded")]
#[case(500, "Server Error")]
#[tokio::test]
async fn error_statuses_keep_code_and_message(#[case] status: u16, #[case] message: &str) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": message})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_json(&EndpointRequest::new("/repos/a/b"))
        .await;

    assert_eq!(
        result,
        FetchResult::StatusError {
            code: status,
            body: message.to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn invalid_json_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_json(&EndpointRequest::new("/repos/a/b"))
        .await;

    assert!(
        matches!(result, FetchResult::TransportError(ref message) if message.contains("not valid JSON")),
        "unexpected result: {result:?}"
    );
}

#[rstest]
#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let address = listener.local_addr().expect("listener should have an address");
    drop(listener);

    let client = HttpClient::new(format!("http://{address}")).expect("client should build");
    let result = client.get_json(&EndpointRequest::new("/anything")).await;

    assert!(
        matches!(result, FetchResult::TransportError(_)),
        "unexpected result: {result:?}"
    );
}

#[rstest]
#[tokio::test]
async fn get_text_overrides_accept_and_sends_page_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/commits/abc"))
        .and(header("accept", GITHUB_DIFF))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string("diff --git a/x b/x"))
        .mount(&server)
        .await;

    let request = EndpointRequest::new("/repos/a/b/commits/abc").paged(2, 10);
    let result = client_for(&server)
        .get_text(&request, Some(GITHUB_DIFF))
        .await;

    assert_eq!(result, FetchResult::Success("diff --git a/x b/x".to_owned()));
}

#[rstest]
#[tokio::test]
async fn post_json_sends_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri())
        .expect("client should build")
        .with_authorization(Some(Authorization::Bearer("key-123".to_owned())));
    let result = client
        .post_json(&EndpointRequest::new("/chat/completions"), &json!({"model": "m"}))
        .await;

    assert_eq!(result, FetchResult::Success(json!({"ok": true})));
}

#[rstest]
fn authorization_debug_redacts_secret() {
    let rendered = format!("{:?}", Authorization::Token("ghp_secret".to_owned()));
    assert!(!rendered.contains("ghp_secret"));
}
