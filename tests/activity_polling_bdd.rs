//! Behavioural tests for the activity notifier.

#[path = "activity_polling_bdd/mod.rs"]
mod activity_polling_bdd_support;

use activity_polling_bdd_support::{
    ActivityState, issue_event, notification_log, poll_once, prepare,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const FIRST_ISSUE: &str = "2024-05-01T10:00:00Z";
const SECOND_ISSUE: &str = "2024-05-01T11:00:00Z";
const THIRD_ISSUE: &str = "2024-05-01T12:00:00Z";

#[fixture]
fn activity_state() -> ActivityState {
    ActivityState::default()
}

fn events_path(repo: &str) -> String {
    format!("/repos/{repo}/events")
}

fn serve_events(activity_state: &ActivityState, repo: &str, events: Vec<Value>) {
    let runtime = prepare(activity_state);
    let mock = Mock::given(method("GET"))
        .and(path(events_path(repo)))
        .respond_with(ResponseTemplate::new(200).set_body_json(events));

    activity_state
        .server
        .with_ref(|server| {
            runtime.block_on(async {
                server.reset().await;
                mock.mount(server).await;
            });
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

#[given("a mock GitHub API with 2 issue events for {repo}")]
fn seed_two_events(activity_state: &ActivityState, repo: String) {
    serve_events(
        activity_state,
        &repo,
        vec![issue_event(2, SECOND_ISSUE), issue_event(1, FIRST_ISSUE)],
    );
}

#[given("a mock GitHub API whose events feed fails for {repo}")]
fn seed_failing_feed(activity_state: &ActivityState, repo: String) {
    let runtime = prepare(activity_state);
    let mock = Mock::given(method("GET"))
        .and(path(events_path(&repo)))
        .respond_with(ResponseTemplate::new(502));

    activity_state
        .server
        .with_ref(|server| runtime.block_on(mock.mount(server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

#[when("a newer issue event is published")]
fn publish_newer_event(activity_state: &ActivityState) {
    serve_events(
        activity_state,
        "octocat/hello",
        vec![
            issue_event(3, THIRD_ISSUE),
            issue_event(2, SECOND_ISSUE),
            issue_event(1, FIRST_ISSUE),
        ],
    );
}

#[when("the activity notifier polls {repo}")]
fn poll(activity_state: &ActivityState, repo: String) {
    let records = poll_once(activity_state, &repo);
    activity_state.recorded.set(records);
}

#[then("{count:usize} notifications are recorded")]
fn assert_recorded(activity_state: &ActivityState, count: usize) {
    let actual = activity_state
        .recorded
        .with_ref(Vec::len)
        .unwrap_or_else(|| panic!("no poll has run"));

    assert_eq!(actual, count, "notification count mismatch");
}

#[then("the notification log holds {count:usize} records")]
fn assert_log_size(activity_state: &ActivityState, count: usize) {
    let records = notification_log(activity_state).load();

    assert_eq!(records.len(), count, "log size mismatch");
    let mut times: Vec<&str> = records.iter().map(|record| record.time.as_str()).collect();
    let in_order = times.clone();
    times.sort_unstable();
    assert_eq!(times, in_order, "records should be appended oldest first");
}

#[scenario(path = "tests/features/activity_polling.feature", index = 0)]
fn repeated_polls_record_each_event_once(activity_state: ActivityState) {
    let _ = activity_state;
}

#[scenario(path = "tests/features/activity_polling.feature", index = 1)]
fn failing_feed_records_nothing(activity_state: ActivityState) {
    let _ = activity_state;
}
