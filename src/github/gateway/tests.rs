//! Tests for the REST gateway against a mock GitHub server.

use rstest::{fixture, rstest};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{RepositoryGateway, RestGateway};
use crate::github::locator::RepositorySlug;
use crate::github::models::TreeEntryKind;
use crate::github::pagination::PageLimits;
use crate::http::{FetchResult, GITHUB_DIFF};

#[fixture]
fn slug() -> RepositorySlug {
    RepositorySlug::parse("octocat/hello").expect("slug should parse")
}

fn gateway_for(server: &MockServer, token: Option<&str>) -> RestGateway {
    RestGateway::new(&server.uri(), &format!("{}/raw", server.uri()), token)
        .expect("gateway should build")
}

#[rstest]
#[tokio::test]
async fn list_pull_requests_requests_all_states_newest_first(slug: RepositorySlug) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/pulls"))
        .and(query_param("state", "all"))
        .and(query_param("sort", "updated"))
        .and(query_param("direction", "desc"))
        .and(query_param("per_page", "1"))
        .and(query_param("page", "1"))
        .and(header("authorization", "token ghp_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"number": 42, "title": "Speed up", "state": "open", "user": {"login": "ada"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("ghp_abc"));
    let pulls = gateway
        .list_pull_requests(&slug, PageLimits::bounded(1, 1))
        .await;

    assert_eq!(pulls.len(), 1);
    let first = pulls.first().expect("one pull request");
    assert_eq!(first.number, 42);
    assert_eq!(first.author.as_deref(), Some("ada"));
}

#[rstest]
#[tokio::test]
async fn pull_request_not_found_is_reported(slug: RepositorySlug) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/pulls/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, None);

    assert_eq!(gateway.pull_request(&slug, 9).await, FetchResult::NotFound);
}

#[rstest]
#[tokio::test]
async fn commit_diff_asks_for_diff_media_type(slug: RepositorySlug) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/commits/abc123"))
        .and(header("accept", GITHUB_DIFF))
        .respond_with(ResponseTemplate::new(200).set_body_string("+added line"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, None);

    assert_eq!(
        gateway.commit_diff(&slug, "abc123").await,
        FetchResult::Success("+added line".to_owned())
    );
}

#[rstest]
#[tokio::test]
async fn recent_events_decode_actor_and_payload(slug: RepositorySlug) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/events"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "type": "IssuesEvent",
                "actor": {"login": "grace"},
                "created_at": "2024-05-01T10:00:00Z",
                "payload": {"issue": {"number": 3, "title": "Crash"}}
            }
        ])))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, None);
    let events = gateway
        .recent_events(&slug, 50)
        .await
        .success()
        .expect("events should decode");

    let event = events.first().expect("one event");
    assert_eq!(event.kind, "IssuesEvent");
    assert_eq!(event.actor.as_deref(), Some("grace"));
    assert_eq!(event.payload["issue"]["number"], json!(3));
}

#[rstest]
#[tokio::test]
async fn tree_is_fetched_recursively(slug: RepositorySlug) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/git/trees/main"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "t1",
            "tree": [
                {"path": "src", "type": "tree"},
                {"path": "src/app.js", "type": "blob", "size": 120}
            ]
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, None);
    let entries = gateway
        .tree(&slug, "main")
        .await
        .success()
        .expect("tree should decode");

    assert_eq!(entries.len(), 2);
    assert!(
        entries
            .iter()
            .any(|entry| entry.kind == TreeEntryKind::Blob && entry.size == Some(120))
    );
}

#[rstest]
#[tokio::test]
async fn raw_file_reads_from_mirror_without_credentials(slug: RepositorySlug) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/octocat/hello/master/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Hello"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("ghp_abc"));
    let content = gateway.raw_file(&slug, "master", "README.md").await;

    assert_eq!(content, FetchResult::Success("# Hello".to_owned()));
    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    assert!(
        requests
            .iter()
            .all(|request| request.headers.get("authorization").is_none())
    );
}
