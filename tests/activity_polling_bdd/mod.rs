//! Support modules for the activity polling BDD tests.

pub(crate) mod state;

pub(crate) use state::{ActivityState, issue_event, notification_log, poll_once, prepare};
