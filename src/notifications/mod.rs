//! Repository activity notifications: the event poller and its log.

pub mod error;
pub mod event;
pub mod log;
pub mod poller;
pub mod record;

pub use error::NotificationLogError;
pub use event::{EventKind, change_label, describe_event};
pub use log::{DEFAULT_LOG_PATH, NotificationLog};
pub use poller::{
    ActivityPoller, DEFAULT_POLL_INTERVAL, EVENT_BATCH_SIZE, PollSummary, run_until_shutdown,
    write_notification,
};
pub use record::NotificationRecord;
