//! Scenario state for the activity polling BDD tests.

use std::cell::RefCell;
use std::rc::Rc;

use camino::Utf8PathBuf;
use repopulse::{ActivityPoller, NotificationLog, NotificationRecord, RepositorySlug, RestGateway};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::runtime::{Builder, Runtime};
use wiremock::MockServer;

/// Runtime shared between steps of one scenario.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct ActivityState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) directory: Slot<Rc<TempDir>>,
    pub(crate) poller: Slot<ActivityPoller>,
    pub(crate) recorded: Slot<Vec<NotificationRecord>>,
}

/// Starts the runtime and mock server and creates an empty log directory,
/// once per scenario.
pub(crate) fn prepare(state: &ActivityState) -> SharedRuntime {
    if state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        state.runtime.set(SharedRuntime(Rc::new(RefCell::new(runtime))));
    }
    let runtime = state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised after set"));

    if state.server.with_ref(|_| ()).is_none() {
        state.server.set(runtime.block_on(MockServer::start()));
    }
    if state.directory.with_ref(|_| ()).is_none() {
        let directory = TempDir::new()
            .unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"));
        state.directory.set(Rc::new(directory));
    }
    runtime
}

/// Notification log inside the scenario's temporary directory.
pub(crate) fn notification_log(state: &ActivityState) -> NotificationLog {
    let directory = state
        .directory
        .get()
        .unwrap_or_else(|| panic!("log directory not initialised"));
    let base = Utf8PathBuf::from_path_buf(directory.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temporary path is not UTF-8: {}", path.display()));
    NotificationLog::new(base.join("notifications.json"))
}

/// Feed entry for an issue opened at `time`.
pub(crate) fn issue_event(number: u64, time: &str) -> Value {
    json!({
        "type": "IssuesEvent",
        "actor": {"login": "grace"},
        "created_at": time,
        "payload": {"action": "opened", "issue": {"number": number, "title": format!("Bug {number}")}}
    })
}

/// Runs one poll for `repo` against the mock server, keeping the poller
/// between steps.
pub(crate) fn poll_once(state: &ActivityState, repo: &str) -> Vec<NotificationRecord> {
    let runtime = prepare(state);
    let uri = state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server not initialised"));
    let slug = RepositorySlug::parse(repo)
        .unwrap_or_else(|error| panic!("invalid repository in scenario: {error}"));
    let gateway = RestGateway::new(&uri, &uri, None)
        .unwrap_or_else(|error| panic!("failed to build gateway: {error}"));
    let log = notification_log(state);
    let mut poller = state
        .poller
        .take()
        .unwrap_or_else(|| ActivityPoller::new(slug));

    let records = runtime.block_on(poller.tick(&gateway, &log));
    state.poller.set(poller);
    records
}
